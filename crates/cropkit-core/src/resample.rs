//! Hermite area-weighted resampling.
//!
//! Every destination pixel averages the source pixels inside its footprint,
//! weighted by the Hermite kernel `2w³ - 3w² + 1` of their normalised
//! distance `w` to the footprint origin. Samples with `w >= 1` are skipped.
//!
//! Colour is alpha-weighted: a sample with `alpha < 255` contributes
//! `weight * alpha / 250` to the colour sums, so transparent pixels do not
//! darken their neighbours. Alpha itself is averaged with the raw weight.
//!
//! The same routine handles down- and up-scaling; upscaling degenerates to
//! nearest-neighbour since each footprint covers a single source pixel.

use crate::decode::PixelBuffer;
use crate::error::CropError;

/// Resample `image` to `width`x`height`.
///
/// # Arguments
///
/// * `image` - Source RGBA buffer
/// * `width` - Target width in pixels
/// * `height` - Target height in pixels
///
/// # Returns
///
/// A new `PixelBuffer` with the target dimensions.
///
/// # Errors
///
/// - `CropError::DegenerateRegion` if the target or the source has a zero side
/// - `CropError::RenderingUnavailable` if the output cannot be allocated
pub fn resample(image: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer, CropError> {
    if width == 0 || height == 0 {
        return Err(CropError::degenerate(width, height));
    }
    if image.is_empty() || image.is_malformed() {
        return Err(CropError::degenerate(image.width, image.height));
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let src_w = image.width as usize;
    let src_h = image.height as usize;
    let ratio_w = image.width as f64 / width as f64;
    let ratio_h = image.height as f64 / height as f64;
    let ratio_w_half = (ratio_w / 2.0).ceil();
    let ratio_h_half = (ratio_h / 2.0).ceil();

    let mut output = PixelBuffer::try_filled(width, height, [0, 0, 0, 0])?;
    let src = &image.pixels;

    for j in 0..height as usize {
        let center_y = j as f64 * ratio_h;
        let yy_start = center_y.floor() as usize;
        let yy_stop = (((j + 1) as f64 * ratio_h).ceil() as usize).min(src_h);

        for i in 0..width as usize {
            let center_x = i as f64 * ratio_w;
            let xx_start = center_x.floor() as usize;
            let xx_stop = (((i + 1) as f64 * ratio_w).ceil() as usize).min(src_w);

            let mut weights = 0.0;
            let mut weights_alpha = 0.0;
            let mut sum = [0.0f64; 4];

            for yy in yy_start..yy_stop {
                let dy = (center_y - yy as f64).abs() / ratio_h_half;
                let w0 = dy * dy;

                for xx in xx_start..xx_stop {
                    let dx = (center_x - xx as f64).abs() / ratio_w_half;
                    let w = (w0 + dx * dx).sqrt();
                    if w >= 1.0 {
                        continue;
                    }

                    let mut weight = 2.0 * w * w * w - 3.0 * w * w + 1.0;
                    let p = (yy * src_w + xx) * 4;
                    let alpha = src[p + 3] as f64;

                    sum[3] += weight * alpha;
                    weights_alpha += weight;

                    if src[p + 3] < 255 {
                        weight *= alpha / 250.0;
                    }
                    sum[0] += weight * src[p] as f64;
                    sum[1] += weight * src[p + 1] as f64;
                    sum[2] += weight * src[p + 2] as f64;
                    weights += weight;
                }
            }

            let nearest = (yy_start.min(src_h - 1) * src_w + xx_start.min(src_w - 1)) * 4;
            let dst = (j * width as usize + i) * 4;
            let out = &mut output.pixels[dst..dst + 4];

            if weights_alpha == 0.0 {
                out.copy_from_slice(&src[nearest..nearest + 4]);
                continue;
            }

            if weights == 0.0 {
                out[..3].copy_from_slice(&src[nearest..nearest + 3]);
            } else {
                for (o, s) in out[..3].iter_mut().zip(&sum[..3]) {
                    *o = to_channel(s / weights);
                }
            }
            out[3] = to_channel(sum[3] / weights_alpha);
        }
    }

    Ok(output)
}

/// Resample `image` in place, replacing its pixels and dimensions.
///
/// On error the buffer is left untouched.
pub fn resample_in_place(image: &mut PixelBuffer, width: u32, height: u32) -> Result<(), CropError> {
    *image = resample(image, width, height)?;
    Ok(())
}

#[inline]
fn to_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}


// ============================================================================
// Property-Based Tests
// ============================================================================
