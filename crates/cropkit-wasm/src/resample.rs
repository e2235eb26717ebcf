//! Resampling WASM bindings.

use crate::types::{js_error, JsPixelBuffer};
use cropkit_core::resample as core_resample;
use wasm_bindgen::prelude::*;

/// Resize an image with the Hermite area-weighted resampler.
///
/// # Errors
///
/// Returns an error if either target side is zero or the image is empty.
///
/// # Example
///
/// ```typescript
/// const half = resample(image, image.width / 2, image.height / 2);
/// ```
#[wasm_bindgen]
pub fn resample(image: &JsPixelBuffer, width: u32, height: u32) -> Result<JsPixelBuffer, JsValue> {
    core_resample::resample(image.as_buffer(), width, height)
        .map(JsPixelBuffer::from_buffer)
        .map_err(js_error)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_resample_downscale() {
        let img = JsPixelBuffer::new(100, 50, vec![128u8; 100 * 50 * 4]).unwrap();
        let out = resample(&img, 50, 25).unwrap();
        assert_eq!((out.width(), out.height()), (50, 25));
        assert!(out.pixels().iter().all(|&v| v == 128));
    }

    #[wasm_bindgen_test]
    fn test_resample_zero_width_errors() {
        let img = JsPixelBuffer::new(10, 10, vec![0u8; 10 * 10 * 4]).unwrap();
        assert!(resample(&img, 0, 5).is_err());
    }
}
