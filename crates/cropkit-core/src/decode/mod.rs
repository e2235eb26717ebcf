//! Image decoding pipeline for cropkit.
//!
//! This module provides functionality for:
//! - Reading the EXIF orientation from JPEG containers
//! - Decoding JPEG and PNG bytes to upright RGBA buffers
//!
//! # Architecture
//!
//! Decoding is synchronous; the embedding layer decides where it runs and
//! hands the result to [`crate::cropper::ImageCropper::complete_load`].
//! Orientation errors never fail a decode: a missing or malformed EXIF block
//! means the image is shown as stored.
//!
//! # Examples
//!
//! ```ignore
//! use cropkit_core::decode::{decode_image, read_orientation};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! println!("{:?}", read_orientation(&bytes));
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod decoder;
pub mod exif;
mod types;

pub use decoder::{decode_image, decode_image_no_orientation};
pub use exif::{orientation_or_default, read_orientation, OrientationError};
pub use types::{DecodeError, ImageDimensions, Orientation, PixelBuffer, Rgba, TRANSPARENT};

#[cfg(test)]
pub(crate) use decoder::tests::grey_jpeg;
