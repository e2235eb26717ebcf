//! Errors surfaced by raster operations and the crop pipeline.
//!
//! Orientation parsing errors are not part of this type: they are absorbed
//! where they occur and degrade to the identity orientation.

use thiserror::Error;

use crate::cropper::SettingsError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Failures that abort a resample, padding pass, orientation pass or crop.
#[derive(Debug, Error)]
pub enum CropError {
    /// No raster surface could be allocated, or no output encoder is available.
    #[error("Rendering surface unavailable")]
    RenderingUnavailable,

    /// The extraction or target region has a zero or negative side.
    #[error("Degenerate region: {width}x{height}")]
    DegenerateRegion { width: i64, height: i64 },

    /// Cropping was requested before an image finished loading.
    #[error("No image loaded")]
    NoImageLoaded,

    /// The source bytes could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The output encoder rejected the cropped buffer.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The cropper settings are inconsistent.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl CropError {
    pub(crate) fn degenerate(width: impl Into<i64>, height: impl Into<i64>) -> Self {
        CropError::DegenerateRegion {
            width: width.into(),
            height: height.into(),
        }
    }
}
