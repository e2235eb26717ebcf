//! Padding pre-passes applied to a freshly loaded image.
//!
//! Padding lets the crop rectangle reach outside the original pixels: the
//! source is drawn centred on a larger canvas filled with the background
//! colour. The returned offset locates the original image on that canvas so
//! crop positions can be reported relative to the unpadded image.

use crate::decode::{PixelBuffer, Rgba};
use crate::error::CropError;

/// A padded canvas and where the original image sits on it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaddedImage {
    pub buffer: PixelBuffer,
    /// Left edge of the original image on the canvas.
    pub offset_x: u32,
    /// Top edge of the original image on the canvas.
    pub offset_y: u32,
}

impl PaddedImage {
    /// True when no padding was added.
    pub fn is_unpadded(&self) -> bool {
        self.offset_x == 0 && self.offset_y == 0
    }
}

/// Pad `image` to a square of side `max(width, height)`.
///
/// # Errors
///
/// Returns `CropError::RenderingUnavailable` if the canvas cannot be allocated.
pub fn extend_to_square(image: &PixelBuffer, background: Rgba) -> Result<PaddedImage, CropError> {
    let side = image.width.max(image.height);
    pad_to(image, side, side, background)
}

/// Pad the short axis of `image` until its aspect ratio equals `ratio`.
///
/// An image already wider than `ratio` gains height; one narrower gains
/// width. The padded side is rounded to the nearest pixel.
///
/// # Errors
///
/// - `CropError::DegenerateRegion` if `ratio` is not a positive finite number
///   or the image is empty
/// - `CropError::RenderingUnavailable` if the canvas cannot be allocated
pub fn contain_within_aspect_ratio(
    image: &PixelBuffer,
    ratio: f64,
    background: Rgba,
) -> Result<PaddedImage, CropError> {
    if !ratio.is_finite() || ratio <= 0.0 || image.width == 0 || image.height == 0 {
        return Err(CropError::degenerate(image.width, image.height));
    }

    let w = image.width as f64;
    let h = image.height as f64;

    let (canvas_w, canvas_h) = if w / h < ratio {
        ((h * ratio).round() as u32, image.height)
    } else {
        (image.width, (w / ratio).round() as u32)
    };

    pad_to(
        image,
        canvas_w.max(image.width),
        canvas_h.max(image.height),
        background,
    )
}

fn pad_to(
    image: &PixelBuffer,
    canvas_w: u32,
    canvas_h: u32,
    background: Rgba,
) -> Result<PaddedImage, CropError> {
    if image.is_malformed() {
        return Err(CropError::degenerate(image.width, image.height));
    }

    let offset_x = (canvas_w - image.width) / 2;
    let offset_y = (canvas_h - image.height) / 2;

    if canvas_w == image.width && canvas_h == image.height {
        return Ok(PaddedImage {
            buffer: image.clone(),
            offset_x,
            offset_y,
        });
    }

    let mut canvas = PixelBuffer::try_filled(canvas_w, canvas_h, background)?;
    let row_bytes = image.width as usize * 4;

    for y in 0..image.height {
        let src = image.offset(0, y);
        let dst = canvas.offset(offset_x, offset_y + y);
        canvas.pixels[dst..dst + row_bytes].copy_from_slice(&image.pixels[src..src + row_bytes]);
    }

    Ok(PaddedImage {
        buffer: canvas,
        offset_x,
        offset_y,
    })
}
