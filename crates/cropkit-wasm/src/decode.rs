//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`read_orientation`] - EXIF orientation code of a JPEG (1 when absent)
//! - [`decode_image`] - Decode JPEG or PNG bytes to an upright RGBA image
//! - [`apply_orientation`] - Apply an orientation code to an image
//!
//! # Example
//!
//! ```typescript
//! import { read_orientation, decode_image } from '@cropkit/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! console.log(`Orientation ${read_orientation(bytes)}`);
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::types::{js_error, JsPixelBuffer};
use cropkit_core::decode::{self, Orientation};
use cropkit_core::transform;
use wasm_bindgen::prelude::*;

/// Read the EXIF orientation code (1-8) from JPEG bytes.
///
/// Non-JPEG input, missing tags and malformed containers all yield 1.
#[wasm_bindgen]
pub fn read_orientation(bytes: &[u8]) -> u8 {
    decode::orientation_or_default(bytes).code() as u8
}

/// Decode JPEG or PNG bytes, applying the EXIF orientation.
///
/// # Errors
///
/// Returns an error if the bytes are not a decodable image.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsPixelBuffer, JsValue> {
    decode::decode_image(bytes)
        .map(JsPixelBuffer::from_buffer)
        .map_err(js_error)
}

/// Apply an orientation code to an already decoded image.
///
/// Codes outside 1-8 leave the image unchanged.
#[wasm_bindgen]
pub fn apply_orientation(image: &JsPixelBuffer, code: u8) -> Result<JsPixelBuffer, JsValue> {
    let orientation = orientation_from_code(code);
    transform::apply_orientation(image.as_buffer(), orientation)
        .map(JsPixelBuffer::from_buffer)
        .map_err(js_error)
}

fn orientation_from_code(code: u8) -> Orientation {
    Orientation::from_code(code as u16).unwrap_or_default()
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_image_invalid() {
        assert!(decode_image(&[0, 1, 2, 3]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_decode_image_empty() {
        assert!(decode_image(&[]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_apply_orientation_swaps_dimensions() {
        let img = JsPixelBuffer::new(4, 2, vec![128u8; 4 * 2 * 4]).unwrap();
        let rotated = apply_orientation(&img, 6).unwrap();
        assert_eq!((rotated.width(), rotated.height()), (2, 4));

        let unchanged = apply_orientation(&img, 42).unwrap();
        assert_eq!((unchanged.width(), unchanged.height()), (4, 2));
    }
}
