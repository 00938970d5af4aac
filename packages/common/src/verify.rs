//! Answers "is this certificate genuine?" for a presented ID or scanned payload.
//!
//! A certificate is valid when a record with its ID exists. With an integrity
//! key configured, the record's stored tag must also match its current
//! identity fields, and a scanned payload must carry a matching tag too.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::category::CertificateCategory;
use crate::certificate_id::CertificateId;
use crate::integrity::IntegrityKey;
use crate::payload::{PayloadError, QrPayload};
use crate::record::CertificateRecord;
use crate::store::{RecordStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    NotFound,
    /// Scanned name or DOB differs from the stored record.
    IdentityMismatch,
    IntegrityMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct VerifiedCertificate {
    pub certificate_id: String,
    pub category: CertificateCategory,
    pub full_name: String,
    pub date_of_birth: String,
    /// `DD.MM.YYYY`.
    pub issued_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Valid(VerifiedCertificate),
    Invalid {
        certificate_id: String,
        reason: InvalidReason,
    },
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn certificate_id(&self) -> &str {
        match self {
            Self::Valid(v) => &v.certificate_id,
            Self::Invalid { certificate_id, .. } => certificate_id,
        }
    }

    fn invalid(certificate_id: &str, reason: InvalidReason) -> Self {
        Self::Invalid {
            certificate_id: certificate_id.to_string(),
            reason,
        }
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(v) => write!(
                f,
                "Certificate {} is VALID.\nName: {}\nDOB: {}\nIssued: {}",
                v.certificate_id, v.full_name, v.date_of_birth, v.issued_at
            ),
            Self::Invalid { certificate_id, .. } => {
                write!(f, "Certificate {certificate_id} is INVALID or not found")
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("unreadable certificate payload: {0}")]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct Verifier {
    store: Arc<dyn RecordStore>,
    integrity: Option<IntegrityKey>,
}

impl Verifier {
    pub fn new(store: Arc<dyn RecordStore>, integrity: Option<IntegrityKey>) -> Self {
        Self { store, integrity }
    }

    /// Look up a certificate by ID. A missing or malformed ID is an
    /// [`Verification::Invalid`] result, not an error.
    #[instrument(skip(self))]
    pub async fn verify(&self, certificate_id: &str) -> Result<Verification, StoreError> {
        let certificate_id = certificate_id.trim();
        if let Err(e) = CertificateId::parse(certificate_id) {
            debug!(error = %e, "Malformed certificate ID");
            return Ok(Verification::invalid(certificate_id, InvalidReason::NotFound));
        }

        let Some(record) = self.store.get(certificate_id).await? else {
            debug!("Certificate not found");
            return Ok(Verification::invalid(certificate_id, InvalidReason::NotFound));
        };

        if !self.integrity_holds(&record) {
            warn!("Stored record does not match its integrity tag");
            return Ok(Verification::invalid(
                certificate_id,
                InvalidReason::IntegrityMismatch,
            ));
        }

        let identity = record.identity();
        Ok(Verification::Valid(VerifiedCertificate {
            certificate_id: record.id.clone(),
            category: record.category,
            full_name: identity.full_name,
            date_of_birth: identity.date_of_birth,
            issued_at: record.issued_on(),
        }))
    }

    /// Verify the text read from a QR code. Valid only when the ID resolves, the
    /// scanned name and DOB equal the stored ones and, with a key configured, the
    /// scanned integrity tag checks out.
    pub async fn verify_payload(&self, text: &str) -> Result<Verification, VerifyError> {
        let scanned = QrPayload::parse(text)?;
        let verification = self.verify(&scanned.certificate_id).await?;

        if let Verification::Valid(v) = &verification {
            if v.full_name != scanned.identity.full_name
                || v.date_of_birth != scanned.identity.date_of_birth
            {
                warn!(
                    certificate_id = %v.certificate_id,
                    "Scanned payload does not match the stored record"
                );
                return Ok(Verification::invalid(
                    &scanned.certificate_id,
                    InvalidReason::IdentityMismatch,
                ));
            }
            if !self.scanned_tag_holds(&scanned) {
                warn!(
                    certificate_id = %v.certificate_id,
                    "Scanned payload carries a missing or wrong integrity tag"
                );
                return Ok(Verification::invalid(
                    &scanned.certificate_id,
                    InvalidReason::IntegrityMismatch,
                ));
            }
        }
        Ok(verification)
    }

    fn scanned_tag_holds(&self, scanned: &QrPayload) -> bool {
        let Some(key) = &self.integrity else {
            return true;
        };
        scanned.integrity.as_deref().is_some_and(|tag| {
            key.check(
                &scanned.certificate_id,
                scanned.category,
                &scanned.identity,
                tag,
            )
        })
    }

    /// With a key configured, a record must carry a tag matching its current
    /// identity. A missing tag fails.
    fn integrity_holds(&self, record: &CertificateRecord) -> bool {
        let Some(key) = &self.integrity else {
            return true;
        };
        record.integrity_tag.as_deref().is_some_and(|tag| {
            key.check(&record.id, record.category, &record.identity(), tag)
        })
    }
}
