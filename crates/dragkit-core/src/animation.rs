#![forbid(unsafe_code)]

//! Deterministic, tick-driven animation primitives.
//!
//! A [`Tween`] moves a point from one translation to another over a fixed
//! duration through an easing curve; a [`Ramp`] does the same for a scalar
//! progress value. Both advance only through explicit [`tick`](Tween::tick)
//! calls with a time delta, so the curves are unit-testable with synthetic
//! time and produce identical output for identical deltas.
//!
//! # Invariants
//!
//! 1. `value()` is exactly `from` before the first tick and exactly `to`
//!    once `is_complete()` returns true.
//! 2. Retargeting an in-flight tween restarts it *from the current sampled
//!    position*, never from `from` — the position curve stays continuous.
//! 3. Zero durations are clamped to 1 ns so progress never divides by zero.

use std::time::Duration;

use crate::geometry::Point;

/// An easing curve mapping linear progress `t ∈ [0, 1]` to eased progress.
pub type Easing = fn(f64) -> f64;

/// Identity easing.
#[inline]
#[must_use]
pub fn linear(t: f64) -> f64 {
    t
}

/// Sine ease-out: fast start, gentle settle. `sin(t · π/2)`.
///
/// The default curve for shift and settle motion.
#[inline]
#[must_use]
pub fn sine_ease_out(t: f64) -> f64 {
    (t * std::f64::consts::FRAC_PI_2).sin()
}

/// Hermite smoothstep: slow start and end.
#[inline]
#[must_use]
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

fn clamp_duration(d: Duration) -> Duration {
    if d.is_zero() { Duration::from_nanos(1) } else { d }
}

/// A point-to-point animation over a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: Point,
    to: Point,
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    /// Create a tween from `from` to `to` with sine ease-out.
    ///
    /// A zero duration is clamped to 1 ns (the tween completes on the first
    /// non-zero tick).
    #[must_use]
    pub fn new(from: Point, to: Point, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration: clamp_duration(duration),
            easing: sine_ease_out,
        }
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Advance by a time delta.
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    /// Eased progress in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn progress(&self) -> f64 {
        let t = (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        ((self.easing)(t)).clamp(0.0, 1.0)
    }

    /// Current interpolated position.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Point {
        if self.is_complete() {
            return self.to;
        }
        self.from.lerp(self.to, self.progress())
    }

    /// Final position.
    #[inline]
    #[must_use]
    pub fn to(&self) -> Point {
        self.to
    }

    /// Whether the tween has reached its end.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Restart toward a new target from the current sampled position.
    ///
    /// The elapsed clock resets; the position curve has no discontinuity at
    /// the instant of replacement.
    pub fn retarget(&mut self, to: Point, duration: Duration) {
        let current = self.value();
        self.from = current;
        self.to = to;
        self.elapsed = Duration::ZERO;
        self.duration = clamp_duration(duration);
    }
}

/// A scalar 0→1 progress ramp with an easing curve.
///
/// Used for the glue-in blend at drag start, where per-item offsets scale by
/// a single shared progress value.
#[derive(Debug, Clone, Copy)]
pub struct Ramp {
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl Ramp {
    /// Create a ramp over `duration` with sine ease-out.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: clamp_duration(duration),
            easing: sine_ease_out,
        }
    }

    /// Advance by a time delta.
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    /// Eased progress in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn value(&self) -> f64 {
        let t = (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        ((self.easing)(t)).clamp(0.0, 1.0)
    }

    /// Whether the ramp has reached 1.0.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Jump straight to the end.
    pub fn finish(&mut self) {
        self.elapsed = self.duration;
    }
}
