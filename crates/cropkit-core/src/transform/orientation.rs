//! EXIF orientation as affine transforms.
//!
//! Each orientation code maps to a 2x3 matrix `(a, b, c, d, e, f)` applied as
//!
//! ```text
//! x' = a·x + c·y + e
//! y' = b·x + d·y + f
//! ```
//!
//! where `W`/`H` in the translation terms are the source (pre-swap)
//! dimensions. Codes 5-8 swap the destination width and height.

use serde::{Deserialize, Serialize};

use crate::decode::{Orientation, PixelBuffer, TRANSPARENT};
use crate::error::CropError;

/// Row-major 2x3 affine matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineTransform {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Map a point through the matrix.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Affine transform that draws a `width`x`height` source upright.
pub fn transform_for(orientation: Orientation, width: u32, height: u32) -> AffineTransform {
    let w = width as f64;
    let h = height as f64;
    match orientation {
        Orientation::Normal => AffineTransform::IDENTITY,
        Orientation::FlipHorizontal => AffineTransform::new(-1.0, 0.0, 0.0, 1.0, w, 0.0),
        Orientation::Rotate180 => AffineTransform::new(-1.0, 0.0, 0.0, -1.0, w, h),
        Orientation::FlipVertical => AffineTransform::new(1.0, 0.0, 0.0, -1.0, 0.0, h),
        Orientation::Transpose => AffineTransform::new(0.0, 1.0, 1.0, 0.0, 0.0, 0.0),
        Orientation::Rotate90CW => AffineTransform::new(0.0, 1.0, -1.0, 0.0, h, 0.0),
        Orientation::Transverse => AffineTransform::new(0.0, -1.0, -1.0, 0.0, h, w),
        Orientation::Rotate270CW => AffineTransform::new(0.0, -1.0, 1.0, 0.0, 0.0, w),
    }
}

/// Produce an upright copy of `image`.
///
/// Every source pixel centre is mapped through [`transform_for`]; the pixel
/// it lands in receives the source value. The mapping is a bijection on the
/// pixel grid for all eight codes.
///
/// # Errors
///
/// - `CropError::DegenerateRegion` if the pixel data does not match the
///   dimensions
/// - `CropError::RenderingUnavailable` if the output cannot be allocated
pub fn apply_orientation(
    image: &PixelBuffer,
    orientation: Orientation,
) -> Result<PixelBuffer, CropError> {
    if image.is_malformed() {
        return Err(CropError::degenerate(image.width, image.height));
    }
    if orientation == Orientation::Normal {
        return Ok(image.clone());
    }

    let (dst_w, dst_h) = if orientation.swaps_dimensions() {
        (image.height, image.width)
    } else {
        (image.width, image.height)
    };

    let matrix = transform_for(orientation, image.width, image.height);
    let mut output = PixelBuffer::try_filled(dst_w, dst_h, TRANSPARENT)?;

    for y in 0..image.height {
        for x in 0..image.width {
            let (tx, ty) = matrix.apply(x as f64 + 0.5, y as f64 + 0.5);
            let (dx, dy) = (tx.floor() as u32, ty.floor() as u32);

            let src = image.offset(x, y);
            let dst = output.offset(dx, dy);
            output.pixels[dst..dst + 4].copy_from_slice(&image.pixels[src..src + 4]);
        }
    }

    Ok(output)
}
