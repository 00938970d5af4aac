use serde::Deserialize;

use crate::artifact::{BarcodeOptions, QrOptions};

/// Issuing-office configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct IssuerConfig {
    /// Printed on the `Issued by:` line of every QR payload.
    /// Default: "Embassy of Afghanistan Berlin".
    #[serde(default = "default_issuer_name")]
    pub issuer_name: String,
    /// Public verification base URL; the certificate ID is appended.
    /// Default: "http://localhost:3000/verify".
    #[serde(default = "default_verify_base_url")]
    pub verify_base_url: String,
    /// How many times to retry allocation after a primary-key conflict. Default: 5.
    #[serde(default = "default_max_allocation_attempts")]
    pub max_allocation_attempts: u8,
    /// Base delay for conflict backoff in milliseconds. Default: 20.
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,
    /// Upper bound on a single backoff delay in milliseconds. Default: 500.
    #[serde(default = "default_retry_max_ms")]
    pub retry_max_ms: u64,
    /// HMAC key for the QR integrity tag. No tag is emitted when unset.
    #[serde(default)]
    pub integrity_key: Option<String>,
    #[serde(default)]
    pub qr: QrOptions,
    #[serde(default)]
    pub barcode: BarcodeOptions,
}

fn default_issuer_name() -> String {
    "Embassy of Afghanistan Berlin".into()
}
fn default_verify_base_url() -> String {
    "http://localhost:3000/verify".into()
}
fn default_max_allocation_attempts() -> u8 {
    5
}
fn default_retry_base_ms() -> u64 {
    20
}
fn default_retry_max_ms() -> u64 {
    500
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            issuer_name: default_issuer_name(),
            verify_base_url: default_verify_base_url(),
            max_allocation_attempts: default_max_allocation_attempts(),
            retry_base_ms: default_retry_base_ms(),
            retry_max_ms: default_retry_max_ms(),
            integrity_key: None,
            qr: QrOptions::default(),
            barcode: BarcodeOptions::default(),
        }
    }
}
