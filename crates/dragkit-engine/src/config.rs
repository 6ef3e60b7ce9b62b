#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Only the auto-scroll knobs are host-configurable. The interaction tuning
//! constants (durations, thresholds, hysteresis) are fixed: they encode the
//! feel of the gesture and are not part of the public surface.

use std::time::Duration;

/// Host-facing configuration for [`ReorderEngine`](crate::ReorderEngine).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Width in pixels of the auto-scroll trigger zone along each viewport
    /// edge.
    pub edge_scroll_zone: f64,
    /// Base auto-scroll speed in pixels per second at full edge penetration.
    ///
    /// The overshoot boost may exceed this, up to three times, when the
    /// pointer leaves the viewport entirely.
    pub max_scroll_speed: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            edge_scroll_zone: 48.0,
            max_scroll_speed: 900.0,
        }
    }
}

/// Fixed interaction constants.
pub(crate) mod consts {
    use super::Duration;

    /// Glue-in ramp duration at drag start.
    pub const GLUE_DURATION: Duration = Duration::from_millis(250);
    /// Shift and settle tween duration.
    pub const SHIFT_DURATION: Duration = Duration::from_millis(200);
    /// Pointer travel (either axis) before a press counts as a drag.
    pub const DRAG_THRESHOLD_PX: f64 = 4.0;
    /// Extra margin added to a candidate's half-extent in the proximity
    /// fallback test.
    pub const HYSTERESIS_PX: f64 = 12.0;
    /// Minimum time between committed slot changes.
    pub const SWAP_COOLDOWN: Duration = Duration::from_millis(12);
    /// Core-zone half-extent as a fraction of the candidate's size per axis.
    pub const CORE_ZONE_RATIO: f64 = 0.42;
    /// Tween targets closer than this are treated as equal (in-flight tween
    /// keeps running).
    pub const RETARGET_EPSILON: f64 = 0.1;
    /// Reference tick the per-tick decay/smoothing factors are calibrated to.
    pub const REFERENCE_TICK: Duration = Duration::from_millis(8);
    /// Fraction of manual wheel velocity lost per reference tick.
    pub const MANUAL_DECAY: f64 = 0.22;
    /// Fraction of the velocity-to-target gap closed per reference tick.
    pub const SCROLL_SMOOTHING: f64 = 0.2;
    /// Exponent shaping edge-zone penetration into speed.
    pub const EDGE_CURVE_EXPONENT: f64 = 1.5;
    /// Maximum overshoot speed multiplier when the pointer leaves the
    /// viewport entirely.
    pub const OVERSHOOT_BOOST_MAX: f64 = 3.0;
    /// Slack before the dragged item counts as out of view.
    pub const VISIBILITY_MARGIN_PX: f64 = 4.0;
    /// Fraction of `max_scroll_speed` added to bring the dragged item back
    /// into view.
    pub const VISIBILITY_BOOST_FRACTION: f64 = 0.35;
    /// Velocities below this (px/s) snap to zero so scrolling can go idle.
    pub const SCROLL_STOP_EPSILON: f64 = 0.5;
    /// Wheel delta (pixels) to manual velocity (px/s) gain.
    pub const WHEEL_VELOCITY_GAIN: f64 = 8.0;
}
