//! Writing previews to disk.

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::error::{RenderError, Result};
use crate::settings::ExportOptions;

/// Result of an export request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written,
    /// The save dialog was closed without choosing a destination
    Cancelled,
}

/// Composite the image over an opaque background color
pub fn flatten(image: &RgbaImage, background: [u8; 3]) -> RgbImage {
    let (width, height) = image.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let a = a as u32;
        let mix = |c: u8, bg: u8| ((c as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8;
        Rgb([
            mix(r, background[0]),
            mix(g, background[1]),
            mix(b, background[2]),
        ])
    })
}

/// Flatten and save as JPEG
pub fn export_jpeg(image: &RgbaImage, path: &Path, options: &ExportOptions) -> Result<()> {
    let rgb = flatten(image, options.background);
    let quality = options.quality.clamp(1, 100);

    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = JpegEncoder::new_with_quality(writer, quality);
    encoder.encode_image(&rgb).map_err(RenderError::Encode)?;

    info!(path = %path.display(), quality, "Exported preview");
    Ok(())
}
