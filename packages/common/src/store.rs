use std::cmp::Reverse;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::category::CertificateCategory;
use crate::record::CertificateRecord;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record store backend error: {0}")]
    Backend(String),
    #[error("stored record {id} is unreadable: {reason}")]
    Corrupt { id: String, reason: String },
}

/// Result of an insert attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A record with the same ID already exists; nothing was written.
    Conflict,
}

#[derive(Debug, Clone, Default)]
pub struct RecordPage {
    pub items: Vec<CertificateRecord>,
    pub total: u64,
}

/// Durable keyed storage for issued certificates.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Number of records in `category`, across all years.
    async fn count(&self, category: CertificateCategory) -> Result<u64, StoreError>;

    async fn insert(&self, record: CertificateRecord) -> Result<InsertOutcome, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<CertificateRecord>, StoreError>;

    /// Newest first.
    async fn list(
        &self,
        category: Option<CertificateCategory>,
        offset: u64,
        limit: u64,
    ) -> Result<RecordPage, StoreError>;

    /// Remove every record. Returns how many were deleted.
    async fn delete_all(&self) -> Result<u64, StoreError>;
}

/// In-process store keyed by certificate ID.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: DashMap<String, CertificateRecord>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn count(&self, category: CertificateCategory) -> Result<u64, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.category == category)
            .count() as u64)
    }

    async fn insert(&self, record: CertificateRecord) -> Result<InsertOutcome, StoreError> {
        match self.records.entry(record.id.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<CertificateRecord>, StoreError> {
        Ok(self.records.get(id).map(|r| r.value().clone()))
    }

    async fn list(
        &self,
        category: Option<CertificateCategory>,
        offset: u64,
        limit: u64,
    ) -> Result<RecordPage, StoreError> {
        let mut matching: Vec<CertificateRecord> = self
            .records
            .iter()
            .filter(|r| category.is_none_or(|c| r.category == c))
            .map(|r| r.value().clone())
            .collect();
        matching.sort_by_key(|r| Reverse((r.created_at, r.id.clone())));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok(RecordPage { items, total })
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let n = self.records.len() as u64;
        self.records.clear();
        Ok(n)
    }
}
