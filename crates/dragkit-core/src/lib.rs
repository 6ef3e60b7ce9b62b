#![forbid(unsafe_code)]

//! Core: geometry and animation primitives for dragkit.
//!
//! # Role in dragkit
//! `dragkit-core` is the math layer. It owns the panel-space coordinate types
//! and the deterministic, `tick(dt)`-driven animation primitives that the
//! engine consumes.
//!
//! # Primary responsibilities
//! - **Geometry**: `Point`/`Size`/`Rect` in `f64` panel coordinates, plus
//!   `Orientation` for axis-generic list math.
//! - **Animation**: easing curves, the [`Tween`](animation::Tween)
//!   point-to-point animation with continuous retargeting, and the scalar
//!   [`Ramp`](animation::Ramp).
//!
//! # How it fits in the system
//! The engine (`dragkit-engine`) keeps one tween per animated item and drives
//! everything from an explicit `tick(dt)` the host calls once per frame. No
//! timers, no wall clock: given the same deltas, the output is identical.

pub mod animation;
pub mod geometry;
