use common::CertificateCategory;
use common::verify::{InvalidReason, Verification};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct VerifyPayloadRequest {
    /// Full text read from a certificate's QR code.
    #[schema(example = "Certificate ID: BC-2025-007\nType: Birth Certificate\nIssued by: Embassy of Afghanistan Berlin\nName: Jane Doe\nDOB: 01.02.1990\nVerify at: https://consulate.example/verify/BC-2025-007")]
    pub payload: String,
}

/// Outcome of a verification. Identity fields are present only when `valid`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct VerifyResponse {
    pub valid: bool,
    #[schema(example = "BC-2025-007")]
    pub certificate_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<InvalidReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CertificateCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    /// Issue date as `DD.MM.YYYY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
}

impl From<Verification> for VerifyResponse {
    fn from(v: Verification) -> Self {
        match v {
            Verification::Valid(c) => Self {
                valid: true,
                certificate_id: c.certificate_id,
                reason: None,
                category: Some(c.category),
                full_name: Some(c.full_name),
                date_of_birth: Some(c.date_of_birth),
                issued_at: Some(c.issued_at),
            },
            Verification::Invalid {
                certificate_id,
                reason,
            } => Self {
                valid: false,
                certificate_id,
                reason: Some(reason),
                category: None,
                full_name: None,
                date_of_birth: None,
                issued_at: None,
            },
        }
    }
}
