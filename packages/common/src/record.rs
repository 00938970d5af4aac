use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::{CertificateCategory, CertificateStatus};
use crate::fields::{CertificateFields, DISPLAY_DATE_FORMAT, Identity};

/// An issued certificate. Never modified after insertion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub id: String,
    pub category: CertificateCategory,
    pub fields: CertificateFields,
    /// Exact text encoded into the QR symbol; `None` when QR generation failed.
    pub qr_payload: Option<String>,
    /// Base64 PNG.
    pub qr_artifact: Option<String>,
    /// Base64 PNG.
    pub barcode_artifact: Option<String>,
    /// Hex HMAC over ID, category and identity. Set whenever an integrity key
    /// was configured at issue time, independent of QR rendering.
    pub integrity_tag: Option<String>,
    pub status: CertificateStatus,
    pub created_at: DateTime<Utc>,
}

impl CertificateRecord {
    pub fn identity(&self) -> Identity {
        self.fields.identity()
    }

    /// Issue date as `DD.MM.YYYY`.
    pub fn issued_on(&self) -> String {
        self.created_at.format(DISPLAY_DATE_FORMAT).to_string()
    }
}
