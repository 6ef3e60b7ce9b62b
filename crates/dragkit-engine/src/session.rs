#![forbid(unsafe_code)]

//! Drag Session: state that exists only while a drag is active.
//!
//! The session captures the dragged set (the clicked item, or the whole
//! multi-selection when the clicked item was part of it), the pointer and
//! item anchors used to derive live deltas, and the glue offsets that pull a
//! possibly non-contiguous selection into one adjacent block behind the
//! primary item.
//!
//! # Invariants
//!
//! 1. `dragged` is sorted ascending and `primary_rank` indexes into it.
//! 2. Glue offsets preserve the dragged items' relative order and make them
//!    adjacent regardless of how far apart they started.
//! 3. `armed` latches once the primary transform exceeds the drag threshold
//!    and never resets within the session.

use std::time::Duration;

use dragkit_core::animation::Ramp;
use dragkit_core::geometry::{Orientation, Point, Size};

use crate::config::consts;
use crate::host::ItemHandle;
use crate::layout::LayoutCache;

/// Live state of one drag interaction.
#[derive(Debug)]
pub(crate) struct DragSession {
    /// Source indices participating in the drag, ascending.
    pub dragged: Vec<usize>,
    /// Rank of the grabbed item within `dragged`.
    pub primary_rank: usize,
    /// Handle per dragged item, parallel to `dragged`.
    pub handles: Vec<ItemHandle>,
    /// Selection at drag start, by identity, for restoration after commit.
    pub selected_handles: Vec<ItemHandle>,
    /// Per dragged item, the full glue offset once the ramp completes.
    pub glue_targets: Vec<Point>,
    /// Glue-in blend from zero toward the targets.
    pub glue: Ramp,
    /// Pointer position at press, panel space.
    pub pointer_start: Point,
    /// Rest position per dragged item at press, parallel to `dragged`.
    pub item_starts: Vec<Point>,
    /// Rendered size of the primary item at press.
    pub primary_size: Size,
    /// Live pointer delta since press.
    pub delta: Point,
    /// Whether the pointer travelled far enough for the drop to commit.
    pub armed: bool,
    /// Most recently resolved target slot; authoritative drop target.
    pub last_slot: Option<usize>,
    /// Engine clock at the last committed slot change.
    pub last_swap_at: Option<Duration>,
}

impl DragSession {
    /// Current index of the grabbed item.
    #[must_use]
    pub fn primary_index(&self) -> usize {
        self.dragged[self.primary_rank]
    }

    /// Whether `index` is part of the dragged set.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.dragged.binary_search(&index).is_ok()
    }

    /// Whether the dragged indices form one contiguous run.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.dragged.windows(2).all(|w| w[1] == w[0] + 1)
    }

    /// Glue offset for the item at `rank`, scaled by the glue-in ramp.
    #[must_use]
    pub fn glue_offset(&self, rank: usize) -> Point {
        self.glue_targets[rank] * self.glue.value()
    }

    /// Full visual offset for the item at `rank`: pointer delta plus glue.
    #[must_use]
    pub fn current_offset(&self, rank: usize) -> Point {
        self.delta + self.glue_offset(rank)
    }

    /// Latch `armed` once the live delta crosses the drag threshold.
    pub fn update_armed(&mut self) {
        if self.delta.max_abs_component() > consts::DRAG_THRESHOLD_PX {
            self.armed = true;
        }
    }
}

/// Compute the glue offset targets for a dragged set.
///
/// Walking outward from the primary rank, each neighbor's glued position is
/// the previous neighbor's position plus/minus that item's main-axis extent
/// and the inter-item `gap`, closing any selection discontinuities. The
/// returned offsets are relative to each item's own rest position; the cross
/// axis is untouched.
pub(crate) fn compute_glue_targets(
    cache: &LayoutCache,
    dragged: &[usize],
    primary_rank: usize,
    gap: f64,
    orientation: Orientation,
) -> Vec<Point> {
    let mut targets = vec![Point::ZERO; dragged.len()];
    let mut desired = vec![0.0_f64; dragged.len()];

    let main_of = |rank: usize| -> (f64, f64) {
        match cache.get(dragged[rank]) {
            Some(entry) => (
                orientation.main(entry.origin),
                orientation.main_extent(entry.size),
            ),
            None => (0.0, 0.0),
        }
    };

    let (primary_main, _) = main_of(primary_rank);
    desired[primary_rank] = primary_main;

    // Above the primary: stack upward, each item's extent plus the gap.
    for rank in (0..primary_rank).rev() {
        let (_, extent) = main_of(rank);
        desired[rank] = desired[rank + 1] - extent - gap;
    }
    // Below the primary: stack downward off the previous item's extent.
    for rank in primary_rank + 1..dragged.len() {
        let (_, prev_extent) = main_of(rank - 1);
        desired[rank] = desired[rank - 1] + prev_extent + gap;
    }

    for rank in 0..dragged.len() {
        let (start_main, _) = main_of(rank);
        targets[rank] = orientation.vector(desired[rank] - start_main, 0.0);
    }
    targets
}
