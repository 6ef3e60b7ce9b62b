#![forbid(unsafe_code)]

//! Animation Scheduler: an arena of per-item transform channels.
//!
//! Each channel is keyed by the item's stable [`ItemHandle`] — not a UI
//! object — and holds the item's current visual offset plus at most one
//! in-flight [`Tween`]. The UI queries [`offset_of`](TransformScheduler::offset_of)
//! at paint time; the scheduler never reaches into UI objects.
//!
//! # Invariants
//!
//! 1. At most one tween per handle. Requesting a new animation to a target
//!    within [`RETARGET_EPSILON`](crate::config::consts) of the in-flight
//!    target is a no-op; a materially different target retargets the tween
//!    from its *current sampled position*, so the position curve never
//!    jumps.
//! 2. [`clear`](TransformScheduler::clear) returns every item to the
//!    identity offset and baseline stacking; nothing keeps animating.

use std::time::Duration;

use ahash::{AHashMap, AHashSet};
use dragkit_core::animation::Tween;
use dragkit_core::geometry::Point;

use crate::config::consts;
use crate::host::ItemHandle;

#[derive(Debug)]
struct Channel {
    current: Point,
    tween: Option<Tween>,
}

/// Owner of every live per-item transform.
#[derive(Debug, Default)]
pub(crate) struct TransformScheduler {
    channels: AHashMap<ItemHandle, Channel>,
    raised: AHashSet<ItemHandle>,
}

impl TransformScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current visual offset for `handle` (identity when untracked).
    #[must_use]
    pub fn offset_of(&self, handle: ItemHandle) -> Point {
        self.channels.get(&handle).map_or(Point::ZERO, |ch| {
            ch.tween.as_ref().map_or(ch.current, Tween::value)
        })
    }

    /// Snapshot of every non-identity offset, keyed by handle.
    ///
    /// Tweened channels report their current sampled value.
    #[must_use]
    pub fn offsets(&self) -> AHashMap<ItemHandle, Point> {
        self.channels
            .iter()
            .filter_map(|(handle, ch)| {
                let offset = ch.tween.as_ref().map_or(ch.current, Tween::value);
                (offset != Point::ZERO).then_some((*handle, offset))
            })
            .collect()
    }

    /// Whether a tween is currently running for `handle`.
    #[must_use]
    pub fn is_animating(&self, handle: ItemHandle) -> bool {
        self.channels
            .get(&handle)
            .is_some_and(|ch| ch.tween.is_some())
    }

    /// Set the offset directly, cancelling any in-flight tween.
    ///
    /// Used for the dragged items themselves, whose offset tracks the
    /// pointer rather than an animation.
    pub fn set_offset(&mut self, handle: ItemHandle, offset: Point) {
        let ch = self.channels.entry(handle).or_insert(Channel {
            current: Point::ZERO,
            tween: None,
        });
        ch.current = offset;
        ch.tween = None;
    }

    /// Animate `handle` toward `to` over `duration`.
    ///
    /// Same-target requests let the in-flight tween finish; different
    /// targets cancel and replace it starting from the current position.
    pub fn animate(&mut self, handle: ItemHandle, to: Point, duration: Duration) {
        let ch = self.channels.entry(handle).or_insert(Channel {
            current: Point::ZERO,
            tween: None,
        });
        match &mut ch.tween {
            Some(tween) => {
                if (tween.to() - to).length() < consts::RETARGET_EPSILON {
                    return;
                }
                tween.retarget(to, duration);
            }
            None => {
                if (ch.current - to).length() < consts::RETARGET_EPSILON {
                    ch.current = to;
                    return;
                }
                ch.tween = Some(Tween::new(ch.current, to, duration));
            }
        }
    }

    /// Advance all tweens, returning the handles whose tween completed on
    /// this tick.
    pub fn tick(&mut self, dt: Duration) -> Vec<ItemHandle> {
        let mut completed = Vec::new();
        for (handle, ch) in &mut self.channels {
            let Some(tween) = &mut ch.tween else {
                continue;
            };
            tween.tick(dt);
            if tween.is_complete() {
                ch.current = tween.to();
                ch.tween = None;
                completed.push(*handle);
            }
        }
        completed
    }

    /// Raise or lower an item's stacking order.
    pub fn set_raised(&mut self, handle: ItemHandle, raised: bool) {
        if raised {
            self.raised.insert(handle);
        } else {
            self.raised.remove(&handle);
        }
    }

    /// Whether the item renders above its siblings.
    #[must_use]
    pub fn is_raised(&self, handle: ItemHandle) -> bool {
        self.raised.contains(&handle)
    }

    /// Stop everything: drop all tweens and offsets, lower all items.
    pub fn clear(&mut self) {
        self.channels.clear();
        self.raised.clear();
    }
}
