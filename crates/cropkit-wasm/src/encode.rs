//! Image encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_image`] - Encode an image as `png` or `jpeg`
//! - [`mime_type`] - MIME type for a format name
//!
//! # Example
//!
//! ```typescript
//! import { encode_image, mime_type } from '@cropkit/wasm';
//!
//! const bytes = encode_image(image, 'jpeg', 90);
//! const blob = new Blob([bytes], { type: mime_type('jpeg') });
//! ```

use crate::types::{js_error, JsPixelBuffer};
use cropkit_core::encode::{OutputEncoder, OutputFormat, StandardEncoder};
use wasm_bindgen::prelude::*;

/// Encode an image.
///
/// PNG keeps the alpha channel. JPEG flattens it onto white; `quality` is
/// clamped to 1-100.
///
/// # Errors
///
/// Returns an error for an unknown format or an empty image.
#[wasm_bindgen]
pub fn encode_image(image: &JsPixelBuffer, format: &str, quality: u8) -> Result<Vec<u8>, JsValue> {
    StandardEncoder::default()
        .encode(image.as_buffer(), format, quality)
        .map_err(js_error)
}

/// MIME type for `png`, `jpeg` or `jpg`.
#[wasm_bindgen]
pub fn mime_type(format: &str) -> Result<String, JsValue> {
    OutputFormat::parse(format)
        .map(|f| f.mime_type().to_string())
        .map_err(js_error)
}

#[cfg(test)]
mod tests {
    use cropkit_core::decode::PixelBuffer;
    use cropkit_core::encode::{OutputEncoder, StandardEncoder};

    #[test]
    fn test_standard_encoder_jpeg_magic() {
        let img = PixelBuffer::new(10, 10, vec![128u8; 10 * 10 * 4]);
        let jpeg = StandardEncoder::default().encode(&img, "jpeg", 90).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }
}
