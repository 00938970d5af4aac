use image::{GrayImage, Luma};
use qrcode::{EcLevel, QrCode};
use serde::Deserialize;

use super::ArtifactError;

/// Rendering options for the QR symbol. Error correction is always level L.
#[derive(Debug, Deserialize, Clone)]
pub struct QrOptions {
    /// Edge length of one module in pixels. Default: 10.
    #[serde(default = "default_module_size")]
    pub module_size: u32,
    /// Whether to draw the standard 4-module quiet zone. Default: true.
    #[serde(default = "default_quiet_zone")]
    pub quiet_zone: bool,
}

fn default_module_size() -> u32 {
    10
}
fn default_quiet_zone() -> bool {
    true
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            module_size: default_module_size(),
            quiet_zone: default_quiet_zone(),
        }
    }
}

/// Render `payload` as a black-on-white QR symbol. The smallest version that fits
/// is chosen automatically.
pub fn render_qr(payload: &str, options: &QrOptions) -> Result<GrayImage, ArtifactError> {
    if options.module_size == 0 {
        return Err(ArtifactError::InvalidOptions("module_size must be > 0"));
    }
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L)
        .map_err(|e| ArtifactError::Qr(e.to_string()))?;

    Ok(code
        .render::<Luma<u8>>()
        .module_dimensions(options.module_size, options.module_size)
        .quiet_zone(options.quiet_zone)
        .dark_color(Luma([0]))
        .light_color(Luma([255]))
        .build())
}
