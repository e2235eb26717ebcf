//! Source-space region extraction.
//!
//! The crop producer converts the display rectangle into integer source
//! pixels before calling [`extract_region`]. The region may hang over the
//! image edge (rounding, or a padded source); pixels outside the image take
//! the background colour.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left pixel of the source
//! - `left`/`top` may be negative
//! - `width`/`height` are output pixel counts

use crate::decode::{PixelBuffer, Rgba};
use crate::error::CropError;

/// Copy a rectangular region of `image` into a new buffer.
///
/// # Arguments
///
/// * `image` - Source image
/// * `left` - Left edge of the region in source pixels
/// * `top` - Top edge of the region in source pixels
/// * `width` - Region width in pixels
/// * `height` - Region height in pixels
/// * `background` - Fill for pixels outside the source
///
/// # Returns
///
/// A `width`x`height` buffer.
///
/// # Errors
///
/// - `CropError::DegenerateRegion` if either side is zero or the source pixel
///   data does not match its dimensions
/// - `CropError::RenderingUnavailable` if the output cannot be allocated
///
/// # Example
///
/// ```ignore
/// let region = extract_region(&image, 25, 25, 50, 50, TRANSPARENT)?;
/// assert_eq!((region.width, region.height), (50, 50));
/// ```
pub fn extract_region(
    image: &PixelBuffer,
    left: i64,
    top: i64,
    width: u32,
    height: u32,
    background: Rgba,
) -> Result<PixelBuffer, CropError> {
    if width == 0 || height == 0 {
        return Err(CropError::degenerate(width, height));
    }
    if image.is_malformed() {
        return Err(CropError::degenerate(image.width, image.height));
    }

    // Fast path: the whole image
    if left == 0 && top == 0 && width == image.width && height == image.height {
        return Ok(image.clone());
    }

    let mut output = PixelBuffer::try_filled(width, height, background)?;

    // Intersection of the region with the source, in source coordinates
    let src_x0 = left.max(0);
    let src_y0 = top.max(0);
    let src_x1 = left.saturating_add(width as i64).min(image.width as i64);
    let src_y1 = top.saturating_add(height as i64).min(image.height as i64);

    if src_x0 >= src_x1 || src_y0 >= src_y1 {
        return Ok(output);
    }

    let row_bytes = (src_x1 - src_x0) as usize * 4;
    let dst_x = (src_x0 - left) as u32;

    // Copy pixel data row by row
    for sy in src_y0..src_y1 {
        let dst_y = (sy - top) as u32;
        let src = image.offset(src_x0 as u32, sy as u32);
        let dst = output.offset(dst_x, dst_y);
        output.pixels[dst..dst + row_bytes].copy_from_slice(&image.pixels[src..src + row_bytes]);
    }

    Ok(output)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::tests::test_image;
    use super::*;
    use crate::decode::TRANSPARENT;
    use proptest::prelude::*;

    /// Strategy for generating image dimensions (keep reasonable for speed).
    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (4u32..=60, 4u32..=60)
    }

    /// Strategy for regions that may hang over any edge.
    fn region_strategy() -> impl Strategy<Value = (i64, i64, u32, u32)> {
        (-20i64..=70, -20i64..=70, 1u32..=80, 1u32..=80)
    }

    proptest! {
        /// Property: Output dimensions equal the requested region.
        #[test]
        fn prop_output_matches_request(
            (width, height) in dimensions_strategy(),
            (left, top, w, h) in region_strategy(),
        ) {
            let img = test_image(width, height);
            let result = extract_region(&img, left, top, w, h, TRANSPARENT).unwrap();

            prop_assert_eq!(result.width, w);
            prop_assert_eq!(result.height, h);
            prop_assert_eq!(result.pixels.len(), (w * h * 4) as usize);
        }

        /// Property: Every output pixel is either the source pixel it maps to
        /// or the background.
        #[test]
        fn prop_pixels_from_source_or_background(
            (width, height) in dimensions_strategy(),
            (left, top, w, h) in region_strategy(),
        ) {
            let img = test_image(width, height);
            let bg = [1, 2, 3, 4];
            let result = extract_region(&img, left, top, w, h, bg).unwrap();

            for y in 0..h {
                for x in 0..w {
                    let sx = left + x as i64;
                    let sy = top + y as i64;
                    let inside = sx >= 0 && sy >= 0 && sx < width as i64 && sy < height as i64;
                    let expected = if inside {
                        img.pixel(sx as u32, sy as u32).unwrap()
                    } else {
                        bg
                    };
                    prop_assert_eq!(result.pixel(x, y), Some(expected));
                }
            }
        }

        /// Property: Extraction is deterministic.
        #[test]
        fn prop_extract_is_deterministic(
            (width, height) in dimensions_strategy(),
            (left, top, w, h) in region_strategy(),
        ) {
            let img = test_image(width, height);
            let a = extract_region(&img, left, top, w, h, TRANSPARENT).unwrap();
            let b = extract_region(&img, left, top, w, h, TRANSPARENT).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
