//! Cropper configuration.
//!
//! Settings arrive from the embedding layer as a camelCase object; every
//! field is optional and falls back to its default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::producer::OutputOptions;
use crate::decode::{Rgba, TRANSPARENT};

/// Settings validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    /// The locked aspect ratio is zero, negative or not a number.
    #[error("Invalid aspect ratio: {0}")]
    InvalidAspectRatio(f64),

    /// A minimum crop side is negative or not a number.
    #[error("Invalid minimum crop size: {width}x{height}")]
    InvalidMinimumSize { width: f64, height: f64 },
}

/// Configuration for an [`super::ImageCropper`] session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CropperSettings {
    /// Keep the crop rectangle at `locked_ratio`.
    pub aspect_ratio_locked: bool,
    /// Width / height used when `aspect_ratio_locked` is set.
    pub locked_ratio: f64,
    /// Output width; the crop is scaled to fit.
    pub target_width: Option<u32>,
    /// Output height; the crop is scaled to fit.
    pub target_height: Option<u32>,
    /// Never upscale towards the targets.
    pub only_scale_down: bool,
    /// `png`, `jpeg` or `jpg`.
    pub output_format: String,
    /// Lossy encoder quality, 0-100.
    pub image_quality: u8,
    /// Minimum crop width in source pixels.
    pub cropper_min_width: f64,
    /// Minimum crop height in source pixels.
    pub cropper_min_height: f64,
    /// Pad the loaded image to `locked_ratio` so a locked crop can cover it.
    pub contain_within_aspect_ratio: bool,
    /// Pad the loaded image to a square.
    pub extend_to_square: bool,
    /// Fill for padding and out-of-image crop pixels; transparent if unset.
    pub background_color: Option<Rgba>,
    /// Produce a crop automatically at the end of every drag.
    pub auto_crop: bool,
}

impl Default for CropperSettings {
    fn default() -> Self {
        Self {
            aspect_ratio_locked: false,
            locked_ratio: 1.0,
            target_width: None,
            target_height: None,
            only_scale_down: false,
            output_format: "png".to_string(),
            image_quality: 92,
            cropper_min_width: 0.0,
            cropper_min_height: 0.0,
            contain_within_aspect_ratio: false,
            extend_to_square: false,
            background_color: None,
            auto_crop: true,
        }
    }
}

impl CropperSettings {
    /// Check the settings for values the pipeline cannot work with.
    ///
    /// The output format is checked by the encoder when a crop is produced.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.aspect_ratio_locked || self.contain_within_aspect_ratio {
            let r = self.locked_ratio;
            if !r.is_finite() || r <= 0.0 {
                return Err(SettingsError::InvalidAspectRatio(r));
            }
        }

        let (w, h) = (self.cropper_min_width, self.cropper_min_height);
        if !w.is_finite() || !h.is_finite() || w < 0.0 || h < 0.0 {
            return Err(SettingsError::InvalidMinimumSize { width: w, height: h });
        }

        Ok(())
    }

    /// The lock ratio, if the lock is on.
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio_locked.then_some(self.locked_ratio)
    }

    pub fn background(&self) -> Rgba {
        self.background_color.unwrap_or(TRANSPARENT)
    }

    /// Output options for the crop producer.
    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            target_width: self.target_width,
            target_height: self.target_height,
            only_scale_down: self.only_scale_down,
            format: self.output_format.clone(),
            quality: self.image_quality.min(100),
            background: self.background(),
        }
    }
}
