//! The multi-line text carried by a certificate's QR code.
//!
//! ```text
//! Certificate ID: BC-2025-007
//! Type: Birth Certificate
//! Issued by: Embassy of Afghanistan Berlin
//! Name: Jane Doe
//! DOB: 01.02.1990
//! Verify at: https://consulate.example/verify/BC-2025-007
//! Integrity: 3f1c...            (only when an integrity key is configured)
//! ```
//!
//! Every line is always present. A missing value renders as an empty segment.

use crate::category::CertificateCategory;
use crate::fields::Identity;

const ID_LABEL: &str = "Certificate ID: ";
const TYPE_LABEL: &str = "Type: ";
const ISSUER_LABEL: &str = "Issued by: ";
const NAME_LABEL: &str = "Name: ";
const DOB_LABEL: &str = "DOB: ";
const VERIFY_LABEL: &str = "Verify at: ";
const INTEGRITY_LABEL: &str = "Integrity: ";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("payload line {line} should start with '{expected}'")]
    UnexpectedLine { line: usize, expected: &'static str },
    #[error("payload ends before line {0}")]
    Truncated(usize),
    #[error("unknown document type '{0}'")]
    DocumentType(String),
    #[error("unexpected trailing content after line {0}")]
    Trailing(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    pub certificate_id: String,
    pub category: CertificateCategory,
    pub issuer: String,
    pub identity: Identity,
    pub verify_url: String,
    pub integrity: Option<String>,
}

impl QrPayload {
    /// Build the payload for a freshly allocated certificate.
    pub fn new(
        certificate_id: &str,
        category: CertificateCategory,
        issuer: &str,
        identity: Identity,
        verify_base_url: &str,
    ) -> Self {
        Self {
            certificate_id: certificate_id.to_string(),
            category,
            issuer: issuer.to_string(),
            identity,
            verify_url: verification_url(verify_base_url, certificate_id),
            integrity: None,
        }
    }

    pub fn with_integrity(mut self, tag: String) -> Self {
        self.integrity = Some(tag);
        self
    }

    pub fn render(&self) -> String {
        let mut text = format!(
            "{ID_LABEL}{}\n{TYPE_LABEL}{}\n{ISSUER_LABEL}{}\n{NAME_LABEL}{}\n{DOB_LABEL}{}\n{VERIFY_LABEL}{}",
            self.certificate_id,
            self.category.document_type(),
            self.issuer,
            self.identity.full_name,
            self.identity.date_of_birth,
            self.verify_url,
        );
        if let Some(tag) = &self.integrity {
            text.push('\n');
            text.push_str(INTEGRITY_LABEL);
            text.push_str(tag);
        }
        text
    }

    /// Parse text produced by [`render`](Self::render), e.g. a scanned QR code.
    pub fn parse(text: &str) -> Result<Self, PayloadError> {
        let mut lines = text.lines().map(|l| l.trim_end_matches('\r'));
        let mut next = |line: usize, label: &'static str| -> Result<String, PayloadError> {
            let raw = lines.next().ok_or(PayloadError::Truncated(line))?;
            raw.strip_prefix(label)
                // Trailing blanks after an empty value may be trimmed by scanners.
                .or_else(|| (raw == label.trim_end()).then_some(""))
                .map(str::to_string)
                .ok_or(PayloadError::UnexpectedLine {
                    line,
                    expected: label.trim_end(),
                })
        };

        let certificate_id = next(1, ID_LABEL)?;
        let document_type = next(2, TYPE_LABEL)?;
        let category = CertificateCategory::ALL
            .into_iter()
            .find(|c| c.document_type() == document_type)
            .ok_or(PayloadError::DocumentType(document_type))?;
        let issuer = next(3, ISSUER_LABEL)?;
        let full_name = next(4, NAME_LABEL)?;
        let date_of_birth = next(5, DOB_LABEL)?;
        let verify_url = next(6, VERIFY_LABEL)?;
        let integrity = match next(7, INTEGRITY_LABEL) {
            Ok(tag) => Some(tag),
            Err(PayloadError::Truncated(_)) => None,
            Err(e) => return Err(e),
        };
        if next(8, "").is_ok() {
            return Err(PayloadError::Trailing(7));
        }

        Ok(Self {
            certificate_id,
            category,
            issuer,
            identity: Identity {
                full_name,
                date_of_birth,
            },
            verify_url,
            integrity,
        })
    }
}

/// `{base}/{id}`, tolerating a trailing slash on the base URL.
pub fn verification_url(base: &str, certificate_id: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), certificate_id)
}
