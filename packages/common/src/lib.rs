pub mod artifact;
pub mod backoff;
pub mod category;
pub mod certificate_id;
pub mod config;
pub mod fields;
pub mod integrity;
pub mod issuer;
pub mod payload;
pub mod record;
pub mod storage;
pub mod store;
pub mod verify;

pub use category::{CertificateCategory, CertificateStatus};
pub use certificate_id::CertificateId;
pub use fields::CertificateFields;
pub use issuer::{IssueError, Issuer};
pub use record::CertificateRecord;
pub use store::{InsertOutcome, MemoryRecordStore, RecordPage, RecordStore, StoreError};
pub use verify::{Verification, Verifier};
