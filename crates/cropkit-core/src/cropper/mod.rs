//! Interactive cropping.
//!
//! This module provides functionality for:
//! - Keeping a crop rectangle valid under move, resize and pinch drags
//! - Mapping the rectangle to source pixels and producing encoded output
//! - Session state: settings, ticketed image loads and the last result
//!
//! # Architecture
//!
//! [`CropEngine`] is pure geometry in display pixels and knows nothing about
//! images. [`produce`] is a pure function from source buffer and rectangle
//! to a [`CropResult`]. [`ImageCropper`] owns both and is the type the
//! embedding layer talks to.

mod engine;
mod geometry;
mod producer;
mod session;
mod settings;

pub use engine::{CropEngine, DragState};
pub use geometry::{
    CropConstraints, CropRect, DragKind, Handle, ParseHandleError, Point, DEFAULT_MIN_SIDE,
};
pub use producer::{produce, CropResult, OutputOptions};
pub use session::{ImageCropper, LoadStatus, LoadTicket};
pub use settings::{CropperSettings, SettingsError};
