//! Image decoding with EXIF orientation correction.
//!
//! The pixel decoding itself is delegated to the `image` crate; this module
//! only normalizes the result to RGBA and applies the orientation read by
//! [`super::exif`].

use std::io::Cursor;

use image::ImageReader;
use tracing::debug;

use super::exif::orientation_or_default;
use super::{DecodeError, Orientation, PixelBuffer};
use crate::error::CropError;
use crate::transform::apply_orientation;

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// # Arguments
///
/// * `bytes` - Raw encoded image bytes (JPEG or PNG)
///
/// # Returns
///
/// An upright RGBA `PixelBuffer`.
///
/// # Errors
///
/// Returns `CropError::Decode` if the bytes cannot be decoded, or
/// `CropError::RenderingUnavailable` if the corrected buffer cannot be
/// allocated.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, CropError> {
    let decoded = decode_image_no_orientation(bytes)?;

    let orientation = orientation_or_default(bytes);
    if orientation == Orientation::Normal {
        return Ok(decoded);
    }

    debug!(
        orientation = orientation.code(),
        width = decoded.width,
        height = decoded.height,
        "applying EXIF orientation"
    );
    apply_orientation(&decoded, orientation)
}

/// Decode an image from bytes without applying EXIF orientation.
///
/// Use this when the embedding layer already displays the image upright.
pub fn decode_image_no_orientation(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    Ok(PixelBuffer::from_rgba_image(img.into_rgba8()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::decode::exif::fixtures::with_orientation;
    use image::codecs::jpeg::JpegEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    // Minimal valid JPEG bytes (1x1 pixel, no EXIF)
    pub(crate) const MINIMAL_JPEG: &[u8] = &[
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01, 0x00, 0x00,
        0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xDB, 0x00, 0x43, 0x00, 0x08, 0x06, 0x06, 0x07, 0x06,
        0x05, 0x08, 0x07, 0x07, 0x07, 0x09, 0x09, 0x08, 0x0A, 0x0C, 0x14, 0x0D, 0x0C, 0x0B, 0x0B,
        0x0C, 0x19, 0x12, 0x13, 0x0F, 0x14, 0x1D, 0x1A, 0x1F, 0x1E, 0x1D, 0x1A, 0x1C, 0x1C, 0x20,
        0x24, 0x2E, 0x27, 0x20, 0x22, 0x2C, 0x23, 0x1C, 0x1C, 0x28, 0x37, 0x29, 0x2C, 0x30, 0x31,
        0x34, 0x34, 0x34, 0x1F, 0x27, 0x39, 0x3D, 0x38, 0x32, 0x3C, 0x2E, 0x33, 0x34, 0x32, 0xFF,
        0xC0, 0x00, 0x0B, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00, 0xFF, 0xC4, 0x00,
        0x1F, 0x00, 0x00, 0x01, 0x05, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B,
        0xFF, 0xC4, 0x00, 0xB5, 0x10, 0x00, 0x02, 0x01, 0x03, 0x03, 0x02, 0x04, 0x03, 0x05, 0x05,
        0x04, 0x04, 0x00, 0x00, 0x01, 0x7D, 0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, 0x21,
        0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07, 0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xA1, 0x08,
        0x23, 0x42, 0xB1, 0xC1, 0x15, 0x52, 0xD1, 0xF0, 0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0A,
        0x16, 0x17, 0x18, 0x19, 0x1A, 0x25, 0x26, 0x27, 0x28, 0x29, 0x2A, 0x34, 0x35, 0x36, 0x37,
        0x38, 0x39, 0x3A, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0x4A, 0x53, 0x54, 0x55, 0x56,
        0x57, 0x58, 0x59, 0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x6A, 0x73, 0x74, 0x75,
        0x76, 0x77, 0x78, 0x79, 0x7A, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89, 0x8A, 0x92, 0x93,
        0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9,
        0xAA, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6,
        0xC7, 0xC8, 0xC9, 0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA, 0xE1, 0xE2,
        0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7,
        0xF8, 0xF9, 0xFA, 0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00, 0xFB, 0xD5,
        0xDB, 0x20, 0xA8, 0xF1, 0x7E, 0xFF, 0xD9,
    ];

    /// Encode a grey JPEG of the given size.
    pub(crate) fn grey_jpeg(width: u32, height: u32) -> Vec<u8> {
        let pixels = vec![128u8; (width * height * 3) as usize];
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, 90)
            .write_image(&pixels, width, height, ExtendedColorType::Rgb8)
            .unwrap();
        out
    }

    #[test]
    fn test_decode_valid_jpeg() {
        let img = decode_image(MINIMAL_JPEG).unwrap();
        assert_eq!(img.width, 1);
        assert_eq!(img.height, 1);
        assert_eq!(img.pixels.len(), 4); // 1x1 RGBA
        assert_eq!(img.pixels[3], 255);
    }

    #[test]
    fn test_decode_no_orientation() {
        let img = decode_image_no_orientation(MINIMAL_JPEG).unwrap();
        assert_eq!((img.width, img.height), (1, 1));
    }

    #[test]
    fn test_decode_invalid_bytes() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(
            result,
            Err(CropError::Decode(DecodeError::InvalidFormat))
        ));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(matches!(
            decode_image_no_orientation(&[]),
            Err(DecodeError::Empty)
        ));
    }

    #[test]
    fn test_decode_truncated_jpeg() {
        let truncated = &MINIMAL_JPEG[0..20];
        assert!(decode_image(truncated).is_err());
    }

    #[test]
    fn test_decode_applies_rotation() {
        let jpeg = with_orientation(&grey_jpeg(16, 8), 6);
        let img = decode_image(&jpeg).unwrap();
        assert_eq!((img.width, img.height), (8, 16));

        let raw = decode_image_no_orientation(&jpeg).unwrap();
        assert_eq!((raw.width, raw.height), (16, 8));
    }

    #[test]
    fn test_decode_mirror_keeps_dimensions() {
        let jpeg = with_orientation(&grey_jpeg(16, 8), 2);
        let img = decode_image(&jpeg).unwrap();
        assert_eq!((img.width, img.height), (16, 8));
    }

    #[test]
    fn test_decode_png() {
        let mut out = Vec::new();
        image::codecs::png::PngEncoder::new(&mut out)
            .write_image(&[1, 2, 3, 4, 5, 6, 7, 8], 2, 1, ExtendedColorType::Rgba8)
            .unwrap();
        let img = decode_image(&out).unwrap();
        assert_eq!(img.pixels, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
