use barcoders::sym::code128::Code128;
use image::{GrayImage, Luma};
use serde::Deserialize;

use super::ArtifactError;
use super::caption::{self, GLYPH_HEIGHT};

/// Code128 start character selecting code set B (printable ASCII).
const CODE_SET_B: char = 'Ɓ';

/// Print-size tuning for the linear barcode. All lengths are pixels.
#[derive(Debug, Deserialize, Clone)]
pub struct BarcodeOptions {
    /// Width of the narrowest bar. Default: 4.
    #[serde(default = "default_module_width")]
    pub module_width: u32,
    /// Height of the bars. Default: 80.
    #[serde(default = "default_bar_height")]
    pub bar_height: u32,
    /// Blank margin on every side. Default: 20.
    #[serde(default = "default_quiet_zone")]
    pub quiet_zone: u32,
    /// Gap between the bars and the caption. Default: 20.
    #[serde(default = "default_text_distance")]
    pub text_distance: u32,
    /// Caption font scale (1 = 5x7 pixel glyphs); 0 disables the caption. Default: 4.
    #[serde(default = "default_font_scale")]
    pub font_scale: u32,
}

fn default_module_width() -> u32 {
    4
}
fn default_bar_height() -> u32 {
    80
}
fn default_quiet_zone() -> u32 {
    20
}
fn default_text_distance() -> u32 {
    20
}
fn default_font_scale() -> u32 {
    4
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self {
            module_width: default_module_width(),
            bar_height: default_bar_height(),
            quiet_zone: default_quiet_zone(),
            text_distance: default_text_distance(),
            font_scale: default_font_scale(),
        }
    }
}

/// Code128 module pattern (1 = bar) for `text`.
///
/// Fails for characters outside printable ASCII.
pub fn code128_modules(text: &str) -> Result<Vec<u8>, ArtifactError> {
    if text.is_empty() {
        return Err(ArtifactError::Barcode("nothing to encode".into()));
    }
    let symbol = Code128::new(format!("{CODE_SET_B}{text}"))
        .map_err(|e| ArtifactError::Barcode(format!("cannot encode '{text}': {e}")))?;
    Ok(symbol.encode())
}

/// Render `text` as a Code128 barcode with `text` printed underneath.
pub fn render_barcode(text: &str, options: &BarcodeOptions) -> Result<GrayImage, ArtifactError> {
    if options.module_width == 0 || options.bar_height == 0 {
        return Err(ArtifactError::InvalidOptions(
            "module_width and bar_height must be > 0",
        ));
    }
    let modules = code128_modules(text)?;

    let bars_width = modules.len() as u32 * options.module_width;
    let caption_width = caption::text_width(text, options.font_scale);
    let caption_height = if options.font_scale == 0 {
        0
    } else {
        options.text_distance + GLYPH_HEIGHT * options.font_scale
    };

    let width = bars_width.max(caption_width) + 2 * options.quiet_zone;
    let height = options.bar_height + caption_height + 2 * options.quiet_zone;
    let mut img = GrayImage::from_pixel(width, height, Luma([255]));

    let bars_x = (width - bars_width) / 2;
    for (i, _) in modules.iter().enumerate().filter(|(_, m)| **m == 1) {
        caption::fill_rect(
            &mut img,
            bars_x + i as u32 * options.module_width,
            options.quiet_zone,
            options.module_width,
            options.bar_height,
        );
    }

    if options.font_scale > 0 {
        caption::draw_text(
            &mut img,
            text,
            (width - caption_width) / 2,
            options.quiet_zone + options.bar_height + options.text_distance,
            options.font_scale,
        );
    }

    Ok(img)
}
