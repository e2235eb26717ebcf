//! JPEG encoding for crop output.
//!
//! JPEG carries no alpha channel, so the RGBA crop is composited onto a
//! background colour before it reaches the `image` crate's encoder.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::{validate, EncodeError};
use crate::decode::{PixelBuffer, Rgba};

/// Encode an RGBA buffer to JPEG bytes.
///
/// # Arguments
///
/// * `image` - RGBA pixel buffer
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
/// * `background` - Colour transparent pixels are blended onto
///
/// # Returns
///
/// JPEG-encoded bytes on success, or an error if encoding fails.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for further editing
/// * 80-90: Good quality, recommended for most uses (default: 92)
/// * Below 60: Low quality, visible artifacts
pub fn encode_jpeg(image: &PixelBuffer, quality: u8, background: Rgba) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;

    let rgb = flatten(&image.pixels, background);

    // Clamp quality to valid range (1-100)
    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    encoder
        .write_image(&rgb, image.width, image.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Composite RGBA pixels over an opaque background, dropping alpha.
///
/// The background's own alpha is ignored.
fn flatten(rgba: &[u8], background: Rgba) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = px[3] as u32;
        for (&fg, &bg) in px[..3].iter().zip(&background[..3]) {
            let (fg, bg) = (fg as u32, bg as u32);
            rgb.push(((fg * a + bg * (255 - a) + 127) / 255) as u8);
        }
    }
    rgb
}


// ============================================================================
// Property-Based Tests
// ============================================================================
