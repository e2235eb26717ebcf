//! PNG encoding for crop output. Alpha is preserved.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use super::{validate, EncodeError};
use crate::decode::PixelBuffer;

/// Encode an RGBA buffer to PNG bytes.
pub fn encode_png(image: &PixelBuffer) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;

    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            &image.pixels,
            image.width,
            image.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png_signature() {
        let img = PixelBuffer::try_filled(8, 4, [1, 2, 3, 4]).unwrap();
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_encode_png_is_lossless() {
        let pixels: Vec<u8> = (0..6 * 5 * 4).map(|i| (i * 7 % 256) as u8).collect();
        let img = PixelBuffer::new(6, 5, pixels);

        let png = encode_png(&img).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().into_rgba8();
        assert_eq!(decoded.into_raw(), img.pixels);
    }

    #[test]
    fn test_encode_png_zero_height() {
        let img = PixelBuffer::new(4, 0, Vec::new());
        assert!(matches!(
            encode_png(&img),
            Err(EncodeError::InvalidDimensions { width: 4, height: 0 })
        ));
    }
}
