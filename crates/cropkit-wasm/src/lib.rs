//! Cropkit WASM - WebAssembly bindings for Cropkit
//!
//! This crate provides WASM bindings to expose the cropkit-core functionality
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `cropper` - The interactive cropping session
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Orientation reading and image decoding
//! - `resample` - Hermite resampling
//! - `encode` - PNG / JPEG encoding
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsImageCropper } from '@cropkit/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const cropper = new JsImageCropper({ targetWidth: 800, outputFormat: 'jpeg' });
//! const ticket = cropper.begin_load();
//! cropper.complete_load(ticket, new Uint8Array(await file.arrayBuffer()));
//! ```

use wasm_bindgen::prelude::*;

mod cropper;
mod decode;
mod encode;
mod resample;
mod types;

pub use cropper::{JsCropResult, JsImageCropper, JsLoadTicket};
pub use decode::{apply_orientation, decode_image, read_orientation};
pub use encode::{encode_image, mime_type};
pub use resample::resample;
pub use types::JsPixelBuffer;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
