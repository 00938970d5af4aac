use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::artifact::{ArtifactEncoder, StandardEncoder};
use crate::backoff::calculate_backoff;
use crate::category::{CertificateCategory, CertificateStatus};
use crate::certificate_id::allocate;
use crate::config::IssuerConfig;
use crate::fields::{CertificateFields, FieldError, Identity};
use crate::integrity::IntegrityKey;
use crate::payload::QrPayload;
use crate::record::CertificateRecord;
use crate::store::{InsertOutcome, RecordStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error(transparent)]
    Fields(#[from] FieldError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no free {category} certificate ID after {attempts} attempts")]
    AllocationExhausted {
        category: CertificateCategory,
        attempts: u8,
    },
}

/// Allocates IDs, renders artifacts and persists new certificates.
///
/// Count-then-insert runs under a per-category lock, so concurrent requests in
/// one process never race for the same sequence number. Other processes sharing
/// the store are caught by the unique ID and retried with a fresh count.
pub struct Issuer {
    store: Arc<dyn RecordStore>,
    encoder: Arc<dyn ArtifactEncoder>,
    integrity: Option<IntegrityKey>,
    issuer_name: String,
    verify_base_url: String,
    max_attempts: u8,
    retry_base_ms: u64,
    retry_max_ms: u64,
    locks: DashMap<CertificateCategory, Arc<Mutex<()>>>,
}

impl Issuer {
    pub fn new(store: Arc<dyn RecordStore>, config: &IssuerConfig) -> Self {
        let encoder = StandardEncoder::new(config.qr.clone(), config.barcode.clone());
        Self {
            store,
            encoder: Arc::new(encoder),
            integrity: config.integrity_key.as_deref().map(IntegrityKey::new),
            issuer_name: config.issuer_name.clone(),
            verify_base_url: config.verify_base_url.clone(),
            max_attempts: config.max_allocation_attempts.max(1),
            retry_base_ms: config.retry_base_ms,
            retry_max_ms: config.retry_max_ms,
            locks: DashMap::new(),
        }
    }

    pub fn with_encoder(mut self, encoder: Arc<dyn ArtifactEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub async fn issue(&self, fields: CertificateFields) -> Result<CertificateRecord, IssueError> {
        self.issue_at(fields, Utc::now()).await
    }

    /// Issue with an explicit clock; the ID year is taken from `now`.
    #[instrument(skip(self, fields, now), fields(category = %fields.category()))]
    pub async fn issue_at(
        &self,
        fields: CertificateFields,
        now: DateTime<Utc>,
    ) -> Result<CertificateRecord, IssueError> {
        let fields = fields.normalize()?;
        let category = fields.category();
        let identity = fields.identity();

        let lock = self.locks.entry(category).or_default().clone();
        let _guard = lock.lock().await;

        for attempt in 1..=self.max_attempts {
            let count = self.store.count(category).await?;
            let id = allocate(category, count, now.year()).to_string();
            let record = self.build_record(id, &fields, &identity, now);

            match self.store.insert(record.clone()).await? {
                InsertOutcome::Inserted => {
                    info!(
                        certificate_id = %record.id,
                        qr = record.qr_artifact.is_some(),
                        barcode = record.barcode_artifact.is_some(),
                        "Certificate issued"
                    );
                    return Ok(record);
                }
                InsertOutcome::Conflict => {
                    warn!(
                        certificate_id = %record.id,
                        attempt,
                        max_attempts = self.max_attempts,
                        "Certificate ID already taken, reallocating"
                    );
                    if attempt < self.max_attempts {
                        let delay =
                            calculate_backoff(attempt, self.retry_base_ms, self.retry_max_ms);
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(IssueError::AllocationExhausted {
            category,
            attempts: self.max_attempts,
        })
    }

    fn build_record(
        &self,
        id: String,
        fields: &CertificateFields,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> CertificateRecord {
        let category = fields.category();
        let mut payload = QrPayload::new(
            &id,
            category,
            &self.issuer_name,
            identity.clone(),
            &self.verify_base_url,
        );
        let integrity_tag = self
            .integrity
            .as_ref()
            .map(|key| key.tag(&id, category, identity));
        if let Some(tag) = &integrity_tag {
            payload = payload.with_integrity(tag.clone());
        }
        let text = payload.render();

        let qr_artifact = match self.encoder.encode_qr(&text) {
            Ok(png) => Some(png),
            Err(e) => {
                warn!(certificate_id = %id, error = %e, "QR generation failed, issuing without QR");
                None
            }
        };
        let barcode_artifact = match self.encoder.encode_barcode(&id) {
            Ok(png) => Some(png),
            Err(e) => {
                warn!(certificate_id = %id, error = %e, "Barcode generation failed, issuing without barcode");
                None
            }
        };

        CertificateRecord {
            qr_payload: qr_artifact.as_ref().map(|_| text),
            id,
            category,
            fields: fields.clone(),
            qr_artifact,
            barcode_artifact,
            integrity_tag,
            status: CertificateStatus::Completed,
            created_at: now,
        }
    }
}
