//! Crop producer: display rectangle to encoded output.
//!
//! # Pipeline
//!
//! 1. Map the display rectangle to source pixels (`ratio = source.width /
//!    display.width`, every edge rounded)
//! 2. Extract the region, filling pixels outside the source with the
//!    background colour
//! 3. Resample by the resize ratio derived from the target size
//! 4. Encode through the supplied [`OutputEncoder`]
//!
//! Any failure aborts the whole crop; no partial result is returned.

use serde::Serialize;
use tracing::{debug, warn};

use super::geometry::CropRect;
use crate::decode::{ImageDimensions, PixelBuffer, Rgba, TRANSPARENT};
use crate::encode::OutputEncoder;
use crate::error::CropError;
use crate::resample::resample;
use crate::transform::extract_region;

/// Output sizing and encoding parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputOptions {
    /// Scale the crop to this width.
    pub target_width: Option<u32>,
    /// Scale the crop to this height.
    pub target_height: Option<u32>,
    /// Cap the resize ratio at 1.
    pub only_scale_down: bool,
    /// Format name passed to the encoder.
    pub format: String,
    /// Encoder quality, 0-100.
    pub quality: u8,
    /// Fill for out-of-image pixels.
    pub background: Rgba,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            target_width: None,
            target_height: None,
            only_scale_down: false,
            format: "png".to_string(),
            quality: 92,
            background: TRANSPARENT,
        }
    }
}

impl OutputOptions {
    /// Resize ratio for a `width`x`height` extraction.
    ///
    /// The smallest ratio implied by the given targets, 1 without targets,
    /// capped at 1 with `only_scale_down`.
    ///
    /// # Errors
    ///
    /// Returns `CropError::DegenerateRegion` for a zero target.
    pub fn resize_ratio(&self, width: u32, height: u32) -> Result<f64, CropError> {
        let mut ratio: Option<f64> = None;

        if let Some(tw) = self.target_width {
            if tw == 0 {
                return Err(CropError::degenerate(0, height));
            }
            ratio = Some(tw as f64 / width as f64);
        }
        if let Some(th) = self.target_height {
            if th == 0 {
                return Err(CropError::degenerate(width, 0));
            }
            let r = th as f64 / height as f64;
            ratio = Some(ratio.map_or(r, |current| current.min(r)));
        }

        let ratio = ratio.unwrap_or(1.0);
        Ok(if self.only_scale_down { ratio.min(1.0) } else { ratio })
    }
}

/// A finished crop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropResult {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// The rectangle in display coordinates.
    pub cropper_position: CropRect,
    /// The extracted region in source pixels.
    pub image_position: CropRect,
    /// The extracted region relative to the unpadded image, when a padding
    /// pre-pass was applied.
    pub offset_image_position: Option<CropRect>,
    /// Format the bytes are encoded in.
    pub format: String,
    /// Encoded output.
    #[serde(skip)]
    pub encoded: Vec<u8>,
    /// Output pixels before encoding.
    #[serde(skip)]
    pub image: PixelBuffer,
}

impl CropResult {
    /// Record the padding offset of the source so the crop can be located on
    /// the original image.
    pub fn with_padding_offset(mut self, offset_x: u32, offset_y: u32) -> Self {
        self.offset_image_position = Some(
            self.image_position
                .translated(-(offset_x as f64), -(offset_y as f64)),
        );
        self
    }
}

/// Crop, resample and encode.
///
/// # Arguments
///
/// * `source` - Orientation-corrected (and possibly padded) source image
/// * `display` - Size the source is displayed at
/// * `rect` - Crop rectangle in display coordinates
/// * `options` - Output sizing and encoding
/// * `encoder` - Output encoder, `None` if the host has none
///
/// # Errors
///
/// - `CropError::RenderingUnavailable` without an encoder or when a buffer
///   cannot be allocated
/// - `CropError::DegenerateRegion` if the mapped region or the target size
///   has a zero side
/// - `CropError::Encode` if the encoder fails
pub fn produce(
    source: &PixelBuffer,
    display: ImageDimensions,
    rect: CropRect,
    options: &OutputOptions,
    encoder: Option<&dyn OutputEncoder>,
) -> Result<CropResult, CropError> {
    let encoder = encoder.ok_or(CropError::RenderingUnavailable)?;

    if display.is_empty() {
        return Err(CropError::degenerate(display.width, display.height));
    }
    if source.is_empty() {
        return Err(CropError::degenerate(source.width, source.height));
    }
    if !rect.is_finite() {
        return Err(CropError::degenerate(0, 0));
    }

    let ratio = source.width as f64 / display.width as f64;
    let left = (rect.x1 * ratio).round() as i64;
    let top = (rect.y1 * ratio).round() as i64;
    let width = (rect.width() * ratio).round() as i64;
    let height = (rect.height() * ratio).round() as i64;

    let (width, height) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            warn!(width, height, "crop region collapsed or too large");
            return Err(CropError::degenerate(width, height));
        }
    };

    let region = extract_region(source, left, top, width, height, options.background)?;

    let resize_ratio = options.resize_ratio(width, height)?;
    let out_w = (width as f64 * resize_ratio).round() as u32;
    let out_h = (height as f64 * resize_ratio).round() as u32;

    let image = if out_w == width && out_h == height {
        region
    } else {
        resample(&region, out_w, out_h)?
    };

    let encoded = encoder.encode(&image, &options.format, options.quality)?;

    debug!(
        left,
        top,
        width,
        height,
        out_width = image.width,
        out_height = image.height,
        bytes = encoded.len(),
        "produced crop"
    );

    Ok(CropResult {
        width: image.width,
        height: image.height,
        cropper_position: rect,
        image_position: CropRect::new(
            left as f64,
            top as f64,
            (left + width as i64) as f64,
            (top + height as i64) as f64,
        ),
        offset_image_position: None,
        format: options.format.clone(),
        encoded,
        image,
    })
}
