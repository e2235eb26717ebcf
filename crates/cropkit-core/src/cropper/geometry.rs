//! Geometry shared by the crop engine, producer and session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default minimum crop side in display pixels.
pub const DEFAULT_MIN_SIDE: f64 = 20.0;

/// A pointer position in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Crop rectangle as two corners, `(x1, y1)` top-left and `(x2, y2)`
/// bottom-right.
///
/// Used both in display space (engine output) and in source space
/// (`CropResult::image_position`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CropRect {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }

    /// Shift by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x1 + dx, self.y1 + dy, self.x2 + dx, self.y2 + dy)
    }

    /// Multiply every coordinate per axis.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self::new(self.x1 * sx, self.y1 * sy, self.x2 * sx, self.y2 * sy)
    }
}

/// One of the eight resize handles on the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::Top,
        Handle::Bottom,
        Handle::Left,
        Handle::Right,
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
    ];

    pub fn moves_left(self) -> bool {
        matches!(self, Handle::Left | Handle::TopLeft | Handle::BottomLeft)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Handle::Right | Handle::TopRight | Handle::BottomRight)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Handle::Top | Handle::TopLeft | Handle::TopRight)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Handle::Bottom | Handle::BottomLeft | Handle::BottomRight)
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Handle::TopLeft | Handle::TopRight | Handle::BottomLeft | Handle::BottomRight
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handle::Top => "top",
            Handle::Bottom => "bottom",
            Handle::Left => "left",
            Handle::Right => "right",
            Handle::TopLeft => "topleft",
            Handle::TopRight => "topright",
            Handle::BottomLeft => "bottomleft",
            Handle::BottomRight => "bottomright",
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown handle name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown resize handle: {0}")]
pub struct ParseHandleError(pub String);

impl FromStr for Handle {
    type Err = ParseHandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Handle::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| ParseHandleError(s.to_string()))
    }
}

/// What a drag started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragKind {
    /// Drag inside the rectangle: translate.
    Move,
    /// Drag on a handle: move that edge or corner.
    Resize(Handle),
    /// Two-finger pinch: uniform scale around the centre.
    Pinch,
}

/// Limits the engine keeps the rectangle within.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropConstraints {
    /// Width / height lock, or `None` for free-form.
    pub aspect_ratio: Option<f64>,
    /// Minimum width in display pixels.
    pub min_width: f64,
    /// Minimum height in display pixels.
    pub min_height: f64,
}

impl Default for CropConstraints {
    fn default() -> Self {
        Self {
            aspect_ratio: None,
            min_width: DEFAULT_MIN_SIDE,
            min_height: DEFAULT_MIN_SIDE,
        }
    }
}

impl CropConstraints {
    pub fn locked(ratio: f64) -> Self {
        Self {
            aspect_ratio: Some(ratio),
            ..Self::default()
        }
    }

    /// The lock ratio if it is usable (positive and finite).
    pub fn ratio(&self) -> Option<f64> {
        self.aspect_ratio.filter(|r| r.is_finite() && *r > 0.0)
    }

    /// Minimum sides after widening them to honour the lock.
    pub fn effective_minimums(&self) -> (f64, f64) {
        let min_w = sanitize_min(self.min_width);
        let min_h = sanitize_min(self.min_height);
        match self.ratio() {
            Some(r) => (min_w.max(min_h * r), min_h.max(min_w / r)),
            None => (min_w, min_h),
        }
    }
}

fn sanitize_min(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}
