#![forbid(unsafe_code)]

//! Auto-scroll: edge-triggered scrolling blended with wheel input.
//!
//! Three velocity sources combine each tick:
//!
//! - **Edge velocity** — when the pointer enters the edge zone the target
//!   speed scales with penetration to the power of
//!   [`EDGE_CURVE_EXPONENT`](crate::config::consts) (fine control near the
//!   zone boundary), boosted up to
//!   [`OVERSHOOT_BOOST_MAX`](crate::config::consts) times when the pointer
//!   overshoots past the viewport edge entirely.
//! - **Visibility boost** — when the dragged item's own bounds stick out of
//!   the viewport beyond a small margin, a fixed fraction of the maximum
//!   speed pulls it back into view.
//! - **Manual wheel velocity** — wheel deltas accumulate into a separate
//!   velocity that decays exponentially instead of being edge-driven;
//!   horizontal-only regions redirect vertical wheel input to the X axis.
//!
//! The smoothed velocity plus the manual velocity is applied to the scroll
//! offset and clamped to `[0, extent − viewport]` per axis. Sub-threshold
//! residuals snap to zero so the loop can go idle.

use std::time::Duration;

use dragkit_core::geometry::{Point, Rect};

use crate::config::{EngineConfig, consts};
use crate::host::Viewport;

/// Velocity state for the auto-scroll loop. All speeds in px/s.
#[derive(Debug, Default)]
pub(crate) struct AutoScroll {
    /// Smoothed edge velocity, eased toward `target` each tick.
    velocity: Point,
    /// Edge-triggered target velocity, recomputed from the pointer.
    target: Point,
    /// Decaying wheel velocity.
    manual: Point,
}

/// Edge velocity along one axis. `p` is the pointer, `[lo, hi]` the visible
/// range. Negative means scroll toward `lo`.
fn edge_velocity(p: f64, lo: f64, hi: f64, zone: f64, max_speed: f64) -> f64 {
    if zone <= 0.0 {
        return 0.0;
    }
    if p < lo + zone {
        let ratio = ((lo + zone - p) / zone).clamp(0.0, 1.0);
        let boost = if p < lo {
            1.0 + ((lo - p) / zone).min(consts::OVERSHOOT_BOOST_MAX - 1.0)
        } else {
            1.0
        };
        return -max_speed * ratio.powf(consts::EDGE_CURVE_EXPONENT) * boost;
    }
    if p > hi - zone {
        let ratio = ((p - (hi - zone)) / zone).clamp(0.0, 1.0);
        let boost = if p > hi {
            1.0 + ((p - hi) / zone).min(consts::OVERSHOOT_BOOST_MAX - 1.0)
        } else {
            1.0
        };
        return max_speed * ratio.powf(consts::EDGE_CURVE_EXPONENT) * boost;
    }
    0.0
}

/// Visibility boost along one axis for the dragged item spanning
/// `[item_lo, item_hi]`.
fn visibility_boost(item_lo: f64, item_hi: f64, lo: f64, hi: f64, max_speed: f64) -> f64 {
    let mut boost = 0.0;
    if item_lo < lo - consts::VISIBILITY_MARGIN_PX {
        boost -= consts::VISIBILITY_BOOST_FRACTION * max_speed;
    }
    if item_hi > hi + consts::VISIBILITY_MARGIN_PX {
        boost += consts::VISIBILITY_BOOST_FRACTION * max_speed;
    }
    boost
}

impl AutoScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the target velocity from the pointer and the dragged item's
    /// current bounds (panel space).
    pub fn set_target(
        &mut self,
        pointer: Point,
        viewport: &Viewport,
        dragged: Option<Rect>,
        cfg: &EngineConfig,
    ) {
        let cap = cfg.max_scroll_speed * consts::OVERSHOOT_BOOST_MAX;

        let mut tx = 0.0;
        if viewport.scrollable_x() {
            let lo = viewport.offset.x;
            let hi = lo + viewport.size.width;
            tx = edge_velocity(pointer.x, lo, hi, cfg.edge_scroll_zone, cfg.max_scroll_speed);
            if let Some(rect) = dragged {
                tx += visibility_boost(rect.origin.x, rect.right(), lo, hi, cfg.max_scroll_speed);
            }
            tx = tx.clamp(-cap, cap);
        }

        let mut ty = 0.0;
        if viewport.scrollable_y() {
            let lo = viewport.offset.y;
            let hi = lo + viewport.size.height;
            ty = edge_velocity(pointer.y, lo, hi, cfg.edge_scroll_zone, cfg.max_scroll_speed);
            if let Some(rect) = dragged {
                ty += visibility_boost(rect.origin.y, rect.bottom(), lo, hi, cfg.max_scroll_speed);
            }
            ty = ty.clamp(-cap, cap);
        }

        self.target = Point::new(tx, ty);
    }

    /// Stop edge-driven scrolling (pointer released or drag cancelled).
    pub fn clear_target(&mut self) {
        self.target = Point::ZERO;
    }

    /// Accumulate a wheel delta (pixels) into the manual velocity.
    pub fn add_wheel(&mut self, delta: Point, viewport: &Viewport) {
        let mut d = delta;
        // Horizontal-only regions take vertical wheel input on the X axis.
        if viewport.scrollable_x() && !viewport.scrollable_y() {
            d = Point::new(d.x + d.y, 0.0);
        } else if !viewport.scrollable_x() {
            d.x = 0.0;
        }
        if !viewport.scrollable_y() {
            d.y = 0.0;
        }
        self.manual += d * consts::WHEEL_VELOCITY_GAIN;
    }

    /// Whether every velocity source is at rest.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.velocity == Point::ZERO && self.target == Point::ZERO && self.manual == Point::ZERO
    }

    /// Forget all velocity state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance one tick, returning the new scroll offset when it changed.
    ///
    /// The smoothing and decay factors are calibrated to the reference tick
    /// and re-derived for the actual `dt`, so variable frame times converge
    /// to the same curve.
    pub fn tick(&mut self, dt: Duration, viewport: &Viewport) -> Option<Point> {
        if dt.is_zero() {
            return None;
        }
        let ticks = dt.as_secs_f64() / consts::REFERENCE_TICK.as_secs_f64();

        let smooth = 1.0 - (1.0 - consts::SCROLL_SMOOTHING).powf(ticks);
        self.velocity += (self.target - self.velocity) * smooth;

        let decay = (1.0 - consts::MANUAL_DECAY).powf(ticks);
        self.manual = self.manual * decay;

        self.snap_small();

        let combined = self.velocity + self.manual;
        if combined == Point::ZERO {
            return None;
        }

        let applied = combined * dt.as_secs_f64();
        let next = (viewport.offset + applied).clamp(Point::ZERO, viewport.max_offset());
        if (next - viewport.offset).max_abs_component() < 1e-6 {
            return None;
        }
        Some(next)
    }

    /// Zero out sub-threshold residuals so the loop can stop.
    fn snap_small(&mut self) {
        if self.velocity.x.abs() < consts::SCROLL_STOP_EPSILON
            && self.target.x.abs() < consts::SCROLL_STOP_EPSILON
        {
            self.velocity.x = 0.0;
        }
        if self.velocity.y.abs() < consts::SCROLL_STOP_EPSILON
            && self.target.y.abs() < consts::SCROLL_STOP_EPSILON
        {
            self.velocity.y = 0.0;
        }
        if self.manual.x.abs() < consts::SCROLL_STOP_EPSILON {
            self.manual.x = 0.0;
        }
        if self.manual.y.abs() < consts::SCROLL_STOP_EPSILON {
            self.manual.y = 0.0;
        }
    }
}
