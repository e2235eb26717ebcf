//! Pixel-space transforms: orientation correction, padding and region
//! extraction.
//!
//! # Transform Order
//!
//! When an image is loaded and cropped, transforms are applied in this order:
//! 1. Orientation (EXIF code -> upright buffer)
//! 2. Padding pre-pass (optional, extend to square or contain a ratio)
//! 3. Region extraction (at crop time)
//!
//! # Coordinate System
//!
//! - All coordinates are in source pixels
//! - Origin is the top-left corner

mod crop;
mod orientation;
mod pad;

pub use crop::extract_region;
pub use orientation::{apply_orientation, transform_for, AffineTransform};
pub use pad::{contain_within_aspect_ratio, extend_to_square, PaddedImage};
