//! Crop rectangle engine.
//!
//! Keeps a valid, optionally aspect-locked crop rectangle under continuous
//! pointer input. The engine is a two-state machine, `Idle` and `Dragging`;
//! the drag state exists only between [`CropEngine::pointer_down`] and
//! [`CropEngine::pointer_up`].
//!
//! # Invariants
//!
//! After every public operation, for display size `W`x`H`:
//!
//! - `0 <= x1 < x2 <= W` and `0 <= y1 < y2 <= H`
//! - `x2 - x1 >= min_width` and `y2 - y1 >= min_height` (minimums capped to
//!   the display)
//! - with an aspect lock `r`, `(x2 - x1) / (y2 - y1) == r` unless the lock,
//!   bounds and minimums cannot all hold at once
//!
//! # Coordinate System
//!
//! Display pixels, origin top-left. Every geometric call takes the current
//! display size explicitly; the engine does not cache it.

use serde::{Deserialize, Serialize};

use super::geometry::{CropConstraints, CropRect, DragKind, Handle, Point};
use crate::decode::ImageDimensions;

/// Smallest side the normaliser will produce, whatever the minimums say.
const MIN_EXTENT: f64 = 1.0;

/// Snapshot taken when a drag starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    pub kind: DragKind,
    /// Pointer position at `pointer_down`.
    pub anchor_pointer: Point,
    /// Rectangle at `pointer_down`; every move is computed from it.
    pub anchor_rect: CropRect,
    /// Finger distance of the first pinch sample.
    pub anchor_distance: Option<f64>,
}

/// Interactive crop rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct CropEngine {
    rect: CropRect,
    constraints: CropConstraints,
    drag: Option<DragState>,
}

impl CropEngine {
    /// Create an engine showing the default rectangle for `display`.
    pub fn new(display: ImageDimensions, constraints: CropConstraints) -> Self {
        let mut engine = Self {
            rect: CropRect::default(),
            constraints,
            drag: None,
        };
        engine.reset(display);
        engine
    }

    pub fn rect(&self) -> CropRect {
        self.rect
    }

    pub fn constraints(&self) -> &CropConstraints {
        &self.constraints
    }

    pub fn drag_state(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Drop any drag and return to the default rectangle.
    pub fn reset(&mut self, display: ImageDimensions) -> CropRect {
        self.drag = None;
        self.rect = self.normalize(default_rect(display, &self.constraints), display);
        self.rect
    }

    /// Replace the constraints. The rectangle is reset so a new lock holds
    /// from the start.
    pub fn set_constraints(&mut self, constraints: CropConstraints, display: ImageDimensions) -> CropRect {
        self.constraints = constraints;
        self.reset(display)
    }

    /// Change the minimum sides, keeping the rectangle where it is.
    ///
    /// A locked rectangle that has to grow keeps its ratio and centre.
    pub fn set_minimums(&mut self, min_width: f64, min_height: f64, display: ImageDimensions) -> CropRect {
        self.constraints.min_width = min_width;
        self.constraints.min_height = min_height;
        self.rect = match self.constraints.ratio() {
            Some(ratio) => self.fit_locked(self.rect.center(), self.rect.width(), ratio, display),
            None => self.normalize(self.rect, display),
        };
        self.rect
    }

    /// Position the rectangle programmatically.
    ///
    /// Corners are reordered if needed and the result is clamped into
    /// bounds and minimums. The aspect lock is not applied. Non-finite input
    /// is ignored.
    pub fn set_rect(&mut self, rect: CropRect, display: ImageDimensions) -> CropRect {
        if !rect.is_finite() {
            return self.rect;
        }
        let ordered = CropRect::new(
            rect.x1.min(rect.x2),
            rect.y1.min(rect.y2),
            rect.x1.max(rect.x2),
            rect.y1.max(rect.y2),
        );
        self.rect = self.normalize(ordered, display);
        self.rect
    }

    /// Scale the rectangle proportionally when the displayed image changes
    /// size from `from` to `to`. Any drag in progress is cancelled.
    ///
    /// Each axis scales on its own unless the ratio is locked; a locked
    /// rectangle scales by the smaller factor around its scaled centre.
    pub fn rescale(&mut self, from: ImageDimensions, to: ImageDimensions) -> CropRect {
        self.drag = None;
        if from.is_empty() || to.is_empty() {
            return self.rect;
        }
        let sx = to.width as f64 / from.width as f64;
        let sy = to.height as f64 / from.height as f64;
        self.rect = match self.constraints.ratio() {
            Some(ratio) => {
                let center = self.rect.scaled(sx, sy).center();
                self.fit_locked(center, self.rect.width() * sx.min(sy), ratio, to)
            }
            None => self.normalize(self.rect.scaled(sx, sy), to),
        };
        self.rect
    }

    /// Start a drag. A drag already in progress is replaced.
    ///
    /// Returns false (and stays idle) for a non-finite pointer.
    pub fn pointer_down(&mut self, kind: DragKind, at: Point) -> bool {
        if !at.is_finite() {
            return false;
        }
        self.drag = Some(DragState {
            kind,
            anchor_pointer: at,
            anchor_rect: self.rect,
            anchor_distance: None,
        });
        true
    }

    /// Apply a pointer move to the current move or resize drag.
    ///
    /// Returns the new rectangle, or `None` when idle, pinching, or the
    /// pointer is non-finite.
    pub fn pointer_move(&mut self, at: Point, display: ImageDimensions) -> Option<CropRect> {
        let drag = self.drag?;
        if !at.is_finite() {
            return None;
        }

        let dx = at.x - drag.anchor_pointer.x;
        let dy = at.y - drag.anchor_pointer.y;

        let next = match drag.kind {
            DragKind::Move => self.moved(drag.anchor_rect, dx, dy, display),
            DragKind::Resize(handle) => self.resized(drag.anchor_rect, handle, dx, dy, display),
            DragKind::Pinch => return None,
        };

        self.rect = next;
        Some(next)
    }

    /// Apply a pinch sample (distance between the two fingers).
    ///
    /// The first sample of a pinch only records the anchor distance and
    /// returns `None`. Later samples scale the anchor rectangle by
    /// `distance / anchor_distance` around its centre.
    pub fn pinch_move(&mut self, distance: f64, display: ImageDimensions) -> Option<CropRect> {
        let drag = self.drag.as_mut()?;
        if drag.kind != DragKind::Pinch || !distance.is_finite() || distance <= 0.0 {
            return None;
        }

        let Some(anchor_distance) = drag.anchor_distance else {
            drag.anchor_distance = Some(distance);
            return None;
        };

        let anchor = drag.anchor_rect;
        let next = self.pinched(anchor, distance / anchor_distance, display);
        self.rect = next;
        Some(next)
    }

    /// End the drag. Returns the final rectangle if a drag was in progress.
    pub fn pointer_up(&mut self) -> Option<CropRect> {
        self.drag.take().map(|_| self.rect)
    }

    /// Minimums after the lock widening, capped to the display.
    fn minimums(&self, display: ImageDimensions) -> (f64, f64) {
        let (min_w, min_h) = self.constraints.effective_minimums();
        (
            min_w.max(MIN_EXTENT).min(display.width as f64),
            min_h.max(MIN_EXTENT).min(display.height as f64),
        )
    }

    fn moved(&self, anchor: CropRect, dx: f64, dy: f64, display: ImageDimensions) -> CropRect {
        let rect = shift_into_bounds(anchor.translated(dx, dy), display);
        self.normalize(rect, display)
    }

    fn resized(
        &self,
        anchor: CropRect,
        handle: Handle,
        dx: f64,
        dy: f64,
        display: ImageDimensions,
    ) -> CropRect {
        let (min_w, min_h) = self.minimums(display);
        let mut r = anchor;

        if handle.moves_left() {
            r.x1 = (anchor.x1 + dx).min(anchor.x2 - min_w);
        }
        if handle.moves_right() {
            r.x2 = (anchor.x2 + dx).max(anchor.x1 + min_w);
        }
        if handle.moves_top() {
            r.y1 = (anchor.y1 + dy).min(anchor.y2 - min_h);
        }
        if handle.moves_bottom() {
            r.y2 = (anchor.y2 + dy).max(anchor.y1 + min_h);
        }

        if let Some(ratio) = self.constraints.ratio() {
            r = enforce_aspect(r, handle, ratio, display);
        }

        self.normalize(r, display)
    }

    fn pinched(&self, anchor: CropRect, scale: f64, display: ImageDimensions) -> CropRect {
        let (min_w, min_h) = self.minimums(display);
        let aw = anchor.width();
        let ah = anchor.height();
        if aw <= 0.0 || ah <= 0.0 {
            return self.rect;
        }

        let lower = (min_w / aw).max(min_h / ah);
        let upper = (display.width as f64 / aw).min(display.height as f64 / ah);
        let s = scale.max(lower).min(upper);

        let c = anchor.center();
        let (half_w, half_h) = (aw * s / 2.0, ah * s / 2.0);
        let rect = CropRect::new(c.x - half_w, c.y - half_h, c.x + half_w, c.y + half_h);

        self.normalize(shift_into_bounds(rect, display), display)
    }

    /// Rectangle of the lock ratio centred on `center`, with `width` widened
    /// to the minimums and capped to the display, then shifted into bounds.
    fn fit_locked(&self, center: Point, width: f64, ratio: f64, display: ImageDimensions) -> CropRect {
        let (min_w, min_h) = self.minimums(display);
        let max_w = (display.width as f64).min(display.height as f64 * ratio);
        let width = width.max(min_w).max(min_h * ratio).min(max_w);
        let (half_w, half_h) = (width / 2.0, width / ratio / 2.0);
        let rect = CropRect::new(
            center.x - half_w,
            center.y - half_h,
            center.x + half_w,
            center.y + half_h,
        );
        self.normalize(shift_into_bounds(rect, display), display)
    }

    /// Final pass of every transition: clamp into bounds and minimums.
    fn normalize(&self, rect: CropRect, display: ImageDimensions) -> CropRect {
        let (min_w, min_h) = self.minimums(display);
        let w = display.width as f64;
        let h = display.height as f64;

        let x1 = rect.x1.max(0.0).min(w - min_w);
        let x2 = rect.x2.max(x1 + min_w).min(w);
        let y1 = rect.y1.max(0.0).min(h - min_h);
        let y2 = rect.y2.max(y1 + min_h).min(h);

        CropRect::new(x1, y1, x2, y2)
    }
}

/// Default rectangle: the largest centred rectangle of the lock ratio, or a
/// centred square of side `min(W, H)` without a lock.
fn default_rect(display: ImageDimensions, constraints: &CropConstraints) -> CropRect {
    let w = display.width as f64;
    let h = display.height as f64;

    let (rw, rh) = match constraints.ratio() {
        Some(r) if w / r <= h => (w, w / r),
        Some(r) => (h * r, h),
        None => {
            let side = w.min(h);
            (side, side)
        }
    };

    let x1 = (w - rw) / 2.0;
    let y1 = (h - rh) / 2.0;
    CropRect::new(x1, y1, x1 + rw, y1 + rh)
}

/// Translate a rectangle back inside the display without resizing it.
fn shift_into_bounds(rect: CropRect, display: ImageDimensions) -> CropRect {
    let w = display.width as f64;
    let h = display.height as f64;

    let dx = if rect.x1 < 0.0 {
        -rect.x1
    } else if rect.x2 > w {
        w - rect.x2
    } else {
        0.0
    };
    let dy = if rect.y1 < 0.0 {
        -rect.y1
    } else if rect.y2 > h {
        h - rect.y2
    } else {
        0.0
    };

    rect.translated(dx, dy)
}

/// Which edges of the rectangle a locked resize moves: `(left?, top?)`.
///
/// Edge handles derive the other axis anchored at the top-left corner, so
/// the derived edge is always the right or bottom one.
fn moving_edges(handle: Handle) -> (bool, bool) {
    match handle {
        Handle::Top => (false, true),
        Handle::Bottom => (false, false),
        Handle::Left => (true, false),
        Handle::Right => (false, false),
        Handle::TopLeft => (true, true),
        Handle::TopRight => (false, true),
        Handle::BottomLeft => (true, false),
        Handle::BottomRight => (false, false),
    }
}

/// Rebuild the resized rectangle at ratio `ratio`, then shrink it on its
/// moving edges until it fits the display.
fn enforce_aspect(mut r: CropRect, handle: Handle, ratio: f64, display: ImageDimensions) -> CropRect {
    match handle {
        Handle::Top | Handle::Bottom => {
            r.x2 = r.x1 + r.height() * ratio;
        }
        Handle::Left | Handle::Right => {
            r.y2 = r.y1 + r.width() / ratio;
        }
        _ => {
            let w = r.width().min(r.height() * ratio);
            let h = w / ratio;
            if handle.moves_left() {
                r.x1 = r.x2 - w;
            } else {
                r.x2 = r.x1 + w;
            }
            if handle.moves_top() {
                r.y1 = r.y2 - h;
            } else {
                r.y2 = r.y1 + h;
            }
        }
    }

    let (left, top) = moving_edges(handle);
    let dw = display.width as f64;
    let dh = display.height as f64;

    let overflow_x = if left { -r.x1 } else { r.x2 - dw }.max(0.0);
    let overflow_y = if top { -r.y1 } else { r.y2 - dh }.max(0.0);

    if overflow_x > 0.0 || overflow_y > 0.0 {
        let sx = overflow_x.max(overflow_y * ratio);
        let sy = sx / ratio;
        if left {
            r.x1 += sx;
        } else {
            r.x2 -= sx;
        }
        if top {
            r.y1 += sy;
        } else {
            r.y2 -= sy;
        }
    }

    r
}


// ============================================================================
// Property-Based Tests
// ============================================================================
