use std::sync::Arc;

use common::integrity::IntegrityKey;
use common::storage::filesystem::FilesystemUploadStore;
use common::storage::{StorageError, UploadStore};
use common::{Issuer, RecordStore, Verifier};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::store::DbRecordStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// Used directly for upload metadata; certificate rows go through `records`.
    pub db: DatabaseConnection,
    pub records: Arc<dyn RecordStore>,
    pub issuer: Arc<Issuer>,
    pub verifier: Arc<Verifier>,
    pub uploads: Arc<dyn UploadStore>,
}

impl AppState {
    /// Wire the issuer, verifier and upload store over a connected database.
    pub async fn new(config: AppConfig, db: DatabaseConnection) -> Result<Self, StorageError> {
        let records: Arc<dyn RecordStore> = Arc::new(DbRecordStore::new(db.clone()));
        let integrity = config.issuer.integrity_key.as_deref().map(IntegrityKey::new);
        let uploads = FilesystemUploadStore::new(
            config.storage.upload_dir.clone(),
            config.storage.max_upload_size,
        )
        .await?;

        Ok(Self {
            issuer: Arc::new(Issuer::new(records.clone(), &config.issuer)),
            verifier: Arc::new(Verifier::new(records.clone(), integrity)),
            uploads: Arc::new(uploads),
            records,
            db,
            config,
        })
    }
}
