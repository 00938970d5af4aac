use async_trait::async_trait;
use common::store::{InsertOutcome, RecordPage, RecordStore, StoreError};
use common::{CertificateCategory, CertificateRecord};
use sea_orm::*;

use crate::entity::{certificate, certificate_upload};

/// Certificate records in the relational database.
#[derive(Clone)]
pub struct DbRecordStore {
    db: DatabaseConnection,
}

impl DbRecordStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn backend(err: DbErr) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn to_record(model: certificate::Model) -> Result<CertificateRecord, StoreError> {
    let fields = serde_json::from_str(&model.fields).map_err(|e| StoreError::Corrupt {
        id: model.id.clone(),
        reason: e.to_string(),
    })?;
    Ok(CertificateRecord {
        id: model.id,
        category: model.category,
        fields,
        qr_payload: model.qr_payload,
        qr_artifact: model.qr_artifact,
        barcode_artifact: model.barcode_artifact,
        integrity_tag: model.integrity_tag,
        status: model.status,
        created_at: model.created_at,
    })
}

#[async_trait]
impl RecordStore for DbRecordStore {
    async fn count(&self, category: CertificateCategory) -> Result<u64, StoreError> {
        certificate::Entity::find()
            .filter(certificate::Column::Category.eq(category))
            .count(&self.db)
            .await
            .map_err(backend)
    }

    async fn insert(&self, record: CertificateRecord) -> Result<InsertOutcome, StoreError> {
        let fields = serde_json::to_string(&record.fields).map_err(|e| StoreError::Corrupt {
            id: record.id.clone(),
            reason: e.to_string(),
        })?;
        let model = certificate::ActiveModel {
            id: Set(record.id),
            category: Set(record.category),
            fields: Set(fields),
            qr_payload: Set(record.qr_payload),
            qr_artifact: Set(record.qr_artifact),
            barcode_artifact: Set(record.barcode_artifact),
            integrity_tag: Set(record.integrity_tag),
            status: Set(record.status),
            created_at: Set(record.created_at),
            ..Default::default()
        };

        match certificate::Entity::insert(model).exec(&self.db).await {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(InsertOutcome::Conflict)
            }
            Err(e) => Err(backend(e)),
        }
    }

    async fn get(&self, id: &str) -> Result<Option<CertificateRecord>, StoreError> {
        certificate::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(backend)?
            .map(to_record)
            .transpose()
    }

    async fn list(
        &self,
        category: Option<CertificateCategory>,
        offset: u64,
        limit: u64,
    ) -> Result<RecordPage, StoreError> {
        let mut select = certificate::Entity::find();
        if let Some(category) = category {
            select = select.filter(certificate::Column::Category.eq(category));
        }

        let total = select.clone().count(&self.db).await.map_err(backend)?;
        let items = select
            .order_by_desc(certificate::Column::CreatedAt)
            .order_by_desc(certificate::Column::Id)
            .offset(Some(offset))
            .limit(Some(limit))
            .all(&self.db)
            .await
            .map_err(backend)?
            .into_iter()
            .map(to_record)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RecordPage { items, total })
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let txn = self.db.begin().await.map_err(backend)?;
        certificate_upload::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(backend)?;
        let deleted = certificate::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(backend)?;
        txn.commit().await.map_err(backend)?;
        Ok(deleted.rows_affected)
    }
}
