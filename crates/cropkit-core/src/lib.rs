//! Cropkit Core - Interactive image cropping library
//!
//! This crate provides the core cropping functionality for Cropkit,
//! including EXIF orientation correction, the crop rectangle engine,
//! Hermite resampling and output encoding.

pub mod cropper;
pub mod decode;
pub mod encode;
pub mod error;
pub mod resample;
pub mod transform;

pub use cropper::{
    produce, CropEngine, CropRect, CropResult, CropperSettings, DragKind, Handle, ImageCropper,
    LoadStatus, LoadTicket, Point,
};
pub use decode::{decode_image, read_orientation, ImageDimensions, Orientation, PixelBuffer};
pub use encode::{OutputEncoder, OutputFormat, StandardEncoder};
pub use error::CropError;
pub use resample::resample;
pub use transform::{apply_orientation, extract_region};
