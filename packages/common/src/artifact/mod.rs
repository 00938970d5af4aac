//! Scannable artifacts embedded in an issued certificate.
//!
//! Both artifacts are PNG images carried base64-encoded inside the record.

mod caption;

pub mod barcode;
pub mod qr;

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, GrayImage, ImageFormat};

pub use barcode::BarcodeOptions;
pub use qr::QrOptions;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("QR encoding failed: {0}")]
    Qr(String),
    #[error("barcode encoding failed: {0}")]
    Barcode(String),
    #[error("invalid rendering options: {0}")]
    InvalidOptions(&'static str),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),
}

/// Produces the two certificate artifacts as base64 PNG strings.
pub trait ArtifactEncoder: Send + Sync {
    /// QR symbol carrying the rendered payload text.
    fn encode_qr(&self, payload: &str) -> Result<String, ArtifactError>;

    /// Code128 barcode of the certificate ID.
    fn encode_barcode(&self, certificate_id: &str) -> Result<String, ArtifactError>;
}

/// Renders artifacts with the configured QR and barcode options.
#[derive(Debug, Clone, Default)]
pub struct StandardEncoder {
    qr: QrOptions,
    barcode: BarcodeOptions,
}

impl StandardEncoder {
    pub fn new(qr: QrOptions, barcode: BarcodeOptions) -> Self {
        Self { qr, barcode }
    }
}

impl ArtifactEncoder for StandardEncoder {
    fn encode_qr(&self, payload: &str) -> Result<String, ArtifactError> {
        let img = qr::render_qr(payload, &self.qr)?;
        Ok(STANDARD.encode(encode_png(img)?))
    }

    fn encode_barcode(&self, certificate_id: &str) -> Result<String, ArtifactError> {
        let img = barcode::render_barcode(certificate_id, &self.barcode)?;
        Ok(STANDARD.encode(encode_png(img)?))
    }
}

pub fn encode_png(img: GrayImage) -> Result<Vec<u8>, ArtifactError> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(img).write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Decode a base64 PNG artifact back into a greyscale bitmap.
pub fn decode_artifact(encoded: &str) -> Option<GrayImage> {
    let bytes = STANDARD.decode(encoded).ok()?;
    let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png).ok()?;
    Some(img.to_luma8())
}
