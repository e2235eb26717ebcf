//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core cropkit
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use cropkit_core::decode::PixelBuffer;
use wasm_bindgen::prelude::*;

/// An RGBA image wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` and `image_data()`
/// copy it into JavaScript memory.
#[wasm_bindgen]
pub struct JsPixelBuffer {
    inner: PixelBuffer,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Create an image from RGBA pixel data (4 bytes per pixel, row-major).
    ///
    /// # Errors
    ///
    /// Returns an error if the data length is not `width * height * 4`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsPixelBuffer, JsValue> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(JsValue::from_str(&format!(
                "Invalid pixel data: expected {} bytes, got {}",
                expected,
                pixels.len()
            )));
        }
        Ok(Self::from_buffer(PixelBuffer::new(width, height, pixels)))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_size()
    }

    /// RGBA pixel data as a `Uint8Array` copy.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// RGBA pixel data as a `Uint8ClampedArray`, ready for `new ImageData()`.
    pub fn image_data(&self) -> js_sys::Uint8ClampedArray {
        js_sys::Uint8ClampedArray::from(self.inner.pixels.as_slice())
    }
}

impl JsPixelBuffer {
    pub(crate) fn from_buffer(inner: PixelBuffer) -> Self {
        Self { inner }
    }

    pub(crate) fn as_buffer(&self) -> &PixelBuffer {
        &self.inner
    }
}

/// Map any displayable error to a JavaScript string value.
pub(crate) fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_buffer() {
        let img = JsPixelBuffer::from_buffer(PixelBuffer::new(100, 50, vec![0u8; 100 * 50 * 4]));
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20000);
    }

    #[test]
    fn test_pixels_copy() {
        let pixels = vec![255u8, 128, 64, 255, 16, 8, 4, 0];
        let img = JsPixelBuffer::from_buffer(PixelBuffer::new(2, 1, pixels.clone()));
        assert_eq!(img.pixels(), pixels);
        assert_eq!(img.as_buffer().pixel(1, 0), Some([16, 8, 4, 0]));
    }
}
