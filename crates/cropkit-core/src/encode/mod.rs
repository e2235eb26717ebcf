//! Output encoding for cropped images.
//!
//! This module provides functionality for:
//! - Encoding RGBA crops to PNG (alpha preserved)
//! - Encoding RGBA crops to JPEG with configurable quality
//! - The [`OutputEncoder`] seam the crop producer encodes through
//!
//! # Architecture
//!
//! The crop producer never calls a codec directly. It receives an
//! `Option<&dyn OutputEncoder>`; `None` means the host has no encoder and the
//! crop fails with `CropError::RenderingUnavailable`. [`StandardEncoder`]
//! is the `image`-crate implementation used by default.
//!
//! # Examples
//!
//! ```ignore
//! use cropkit_core::encode::{OutputEncoder, StandardEncoder};
//!
//! let bytes = StandardEncoder::default().encode(&buffer, "jpeg", 92).unwrap();
//! println!("Encoded {} bytes", bytes.len());
//! ```

mod jpeg;
mod png;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

use thiserror::Error;

use crate::decode::{PixelBuffer, Rgba};

/// Errors that can occur during output encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The requested output format has no encoder
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// The codec failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output formats understood by [`StandardEncoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    /// Parse a format name (`png`, `jpeg`, `jpg`, case-insensitive).
    pub fn parse(name: &str) -> Result<Self, EncodeError> {
        match name.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            _ => Err(EncodeError::UnsupportedFormat(name.to_string())),
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Turns a finished crop into encoded bytes.
pub trait OutputEncoder {
    /// Encode `image` in `format` at `quality` (0-100, ignored by lossless
    /// formats).
    fn encode(&self, image: &PixelBuffer, format: &str, quality: u8) -> Result<Vec<u8>, EncodeError>;
}

/// PNG/JPEG encoder backed by the `image` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardEncoder {
    /// Colour transparent pixels are flattened onto for JPEG output.
    pub jpeg_background: Rgba,
}

impl Default for StandardEncoder {
    fn default() -> Self {
        Self {
            jpeg_background: [255, 255, 255, 255],
        }
    }
}

impl StandardEncoder {
    pub fn with_background(jpeg_background: Rgba) -> Self {
        Self { jpeg_background }
    }
}

impl OutputEncoder for StandardEncoder {
    fn encode(&self, image: &PixelBuffer, format: &str, quality: u8) -> Result<Vec<u8>, EncodeError> {
        match OutputFormat::parse(format)? {
            OutputFormat::Png => encode_png(image),
            OutputFormat::Jpeg => encode_jpeg(image, quality, self.jpeg_background),
        }
    }
}

/// Reject empty or mis-sized buffers before handing them to a codec.
fn validate(image: &PixelBuffer) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = image.width as usize * image.height as usize * 4;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    Ok(())
}
