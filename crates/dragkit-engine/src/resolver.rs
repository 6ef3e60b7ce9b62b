#![forbid(unsafe_code)]

//! Swap/Target Resolver: which slot should the dragged block occupy.
//!
//! Runs on every pointer move and every auto-scroll tick while dragging.
//! Two-stage test per candidate:
//!
//! 1. **Core zone** — a box of [`CORE_ZONE_RATIO`](crate::config::consts)
//!    times the candidate's extent on each axis around its center. A drag
//!    center inside the core zone is an immediate match; the nearest such
//!    candidate wins.
//! 2. **Proximity fallback** — otherwise the nearest candidate whose
//!    center-to-center distance is under half its main extent plus a fixed
//!    hysteresis margin. Handles the gaps at list boundaries.
//!
//! The caller adds the temporal half of the hysteresis: a resolved slot only
//! commits if it differs from the last one *and* the swap cooldown has
//! elapsed. Without the cooldown and the core-zone-first policy, pointer
//! jitter near a boundary causes visible swap oscillation.

use dragkit_core::geometry::Point;

use crate::config::consts;
use crate::layout::LayoutCache;

/// Resolve the best slot index for a drag centered at `drag_center`.
///
/// All indices are candidates, the dragged ones included — resolving onto
/// the block's own slot is what keeps it parked while hovering in place.
/// Entries without usable geometry are skipped.
pub(crate) fn resolve_slot(cache: &LayoutCache, drag_center: Point) -> Option<usize> {
    let mut core_best: Option<(usize, f64)> = None;
    let mut near_best: Option<(usize, f64)> = None;

    for index in 0..cache.len() {
        let Some(entry) = cache.get(index) else {
            continue;
        };
        if entry.size.is_empty() {
            continue;
        }

        let center = entry.center();
        let dist_sq = drag_center.distance_sq(center);

        let core_x = entry.size.width * consts::CORE_ZONE_RATIO;
        let core_y = entry.size.height * consts::CORE_ZONE_RATIO;
        let dx = (drag_center.x - center.x).abs();
        let dy = (drag_center.y - center.y).abs();

        if dx <= core_x && dy <= core_y {
            if core_best.is_none_or(|(_, best)| dist_sq < best) {
                core_best = Some((index, dist_sq));
            }
            continue;
        }

        let reach = entry.size.width.max(entry.size.height) / 2.0 + consts::HYSTERESIS_PX;
        if dist_sq < reach * reach && near_best.is_none_or(|(_, best)| dist_sq < best) {
            near_best = Some((index, dist_sq));
        }
    }

    core_best.or(near_best).map(|(index, _)| index)
}

/// First index of the dragged block when the primary occupies `target_slot`.
///
/// Clamped so the whole block stays inside the list.
pub(crate) fn block_start_for(
    len: usize,
    block_len: usize,
    primary_rank: usize,
    target_slot: usize,
) -> usize {
    let max_start = len.saturating_sub(block_len);
    target_slot
        .saturating_sub(primary_rank)
        .min(max_start)
}

/// Offsets that move every non-dragged item out of the block's way.
///
/// For a non-dragged item with rank `q` among non-dragged items, its final
/// index is `q`, bumped by the block length once `q` reaches the block start.
/// The returned offset is the rest-position difference between the final and
/// current index, so items before the slot shift one way and items at/after
/// it shift the other. Zero offsets are included so previously shifted items
/// animate back.
pub(crate) fn shift_offsets(
    cache: &LayoutCache,
    dragged: &[usize],
    primary_rank: usize,
    target_slot: usize,
) -> Vec<(usize, Point)> {
    let len = cache.len();
    let block_len = dragged.len();
    let block_start = block_start_for(len, block_len, primary_rank, target_slot);

    let mut shifts = Vec::with_capacity(len.saturating_sub(block_len));
    let mut rank = 0usize;
    for index in 0..len {
        if dragged.binary_search(&index).is_ok() {
            continue;
        }
        let final_index = if rank >= block_start {
            rank + block_len
        } else {
            rank
        };
        rank += 1;

        let (Some(from), Some(to)) = (cache.position_of(index), cache.position_of(final_index))
        else {
            continue;
        };
        shifts.push((index, to - from));
    }
    shifts
}
