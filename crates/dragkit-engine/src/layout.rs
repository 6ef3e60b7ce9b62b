#![forbid(unsafe_code)]

//! Layout Cache: per-item rest geometry in panel space.
//!
//! The cache records, for every index, the position the item's container
//! would occupy *at rest* — the rendered position with any live engine
//! offset subtracted out — so slot math stays stable while items animate and
//! while the virtualizer creates and destroys containers.
//!
//! Entries for unrealized containers are estimated by extrapolating from the
//! nearest measured neighbors with a uniform per-index step. Estimation is
//! best-effort: with nothing measured the pass does nothing, and consumers
//! degrade (skip the frame) rather than fail.
//!
//! # Invariants
//!
//! 1. Exactly one entry per logical item; indices mirror the backing
//!    collection and are re-shifted on every insert/remove/move/reset.
//! 2. A measured (`estimated == false`) entry is never overwritten by the
//!    estimation pass.

use dragkit_core::geometry::{Orientation, Point, Rect, Size};

use crate::host::ItemsChange;

/// Rest geometry of one list item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemLayout {
    /// Top-left rest position in panel space.
    pub origin: Point,
    /// Rendered container size.
    pub size: Size,
    /// True if never measured from a realized container.
    pub estimated: bool,
}

impl ItemLayout {
    /// A placeholder for an unrealized container.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            origin: Point::ZERO,
            size: Size::ZERO,
            estimated: true,
        }
    }

    /// Center of the item at rest.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }
}

/// Per-index layout records for the whole list.
#[derive(Debug)]
pub struct LayoutCache {
    orientation: Orientation,
    entries: Vec<ItemLayout>,
}

impl LayoutCache {
    /// Create an empty cache for the given panel orientation.
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            entries: Vec::new(),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ItemLayout> {
        self.entries.get(index)
    }

    /// Rest position of the item at `index`.
    #[must_use]
    pub fn position_of(&self, index: usize) -> Option<Point> {
        self.entries.get(index).map(|e| e.origin)
    }

    /// Rest center of the item at `index`.
    #[must_use]
    pub fn center_of(&self, index: usize) -> Option<Point> {
        self.entries.get(index).map(ItemLayout::center)
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Rebuild the cache wholesale from realized containers.
    ///
    /// `rest_rect_at` returns the container's rect with any live offset
    /// already subtracted, or `None` for unrealized indices. Runs the
    /// estimation pass afterwards.
    pub fn rebuild(&mut self, len: usize, mut rest_rect_at: impl FnMut(usize) -> Option<Rect>) {
        self.entries.clear();
        self.entries.reserve(len);
        for index in 0..len {
            let entry = match rest_rect_at(index) {
                Some(rect) => ItemLayout {
                    origin: rect.origin,
                    size: rect.size,
                    estimated: false,
                },
                None => ItemLayout::placeholder(),
            };
            self.entries.push(entry);
        }
        self.estimate_missing();
    }

    /// Update one entry from a freshly measured rest rect.
    pub fn refresh(&mut self, index: usize, rect: Rect) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.origin = rect.origin;
            entry.size = rect.size;
            entry.estimated = false;
        }
    }

    /// Fill estimated entries by extrapolating from measured neighbors.
    ///
    /// Finds the first measured entry with a positive main extent (the
    /// anchor) and the next measured entry after it. With both, the
    /// per-index step is `(second − anchor) / (secondIndex − anchorIndex)`;
    /// with only the anchor, the step is one item extent along the main axis
    /// and zero on the cross axis. Every estimated entry then gets
    /// `anchor + (index − anchorIndex) · step`. With no anchor at all the
    /// pass is a no-op.
    pub fn estimate_missing(&mut self) {
        let anchor = self
            .entries
            .iter()
            .position(|e| !e.estimated && self.orientation.main_extent(e.size) > 0.0);
        let Some(anchor_idx) = anchor else {
            return;
        };
        let anchor_entry = self.entries[anchor_idx];

        let second = self
            .entries
            .iter()
            .enumerate()
            .skip(anchor_idx + 1)
            .find(|(_, e)| !e.estimated)
            .map(|(i, e)| (i, *e));

        let step = match second {
            Some((second_idx, second_entry)) => {
                let span = (second_idx - anchor_idx) as f64;
                (second_entry.origin - anchor_entry.origin) * (1.0 / span)
            }
            None => self
                .orientation
                .vector(self.orientation.main_extent(anchor_entry.size), 0.0),
        };

        for (index, entry) in self.entries.iter_mut().enumerate() {
            if !entry.estimated {
                continue;
            }
            let distance = index as f64 - anchor_idx as f64;
            entry.origin = anchor_entry.origin + step * distance;
            if entry.size.is_empty() {
                entry.size = anchor_entry.size;
            }
        }
    }

    /// Inter-item gap inferred from two adjacent measured entries.
    ///
    /// Returns zero when no adjacent measured pair exists.
    #[must_use]
    pub fn infer_gap(&self) -> f64 {
        for pair in self.entries.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if !a.estimated && !b.estimated {
                let gap = self.orientation.main(b.origin)
                    - self.orientation.main(a.origin)
                    - self.orientation.main_extent(a.size);
                return gap.max(0.0);
            }
        }
        0.0
    }

    /// Patch the index space after an external collection change.
    pub fn apply_change(&mut self, change: &ItemsChange) {
        match *change {
            ItemsChange::Inserted { index, count } => {
                let at = index.min(self.entries.len());
                for _ in 0..count {
                    self.entries.insert(at, ItemLayout::placeholder());
                }
            }
            ItemsChange::Removed { index, count } => {
                if index < self.entries.len() {
                    let end = (index + count).min(self.entries.len());
                    self.entries.drain(index..end);
                }
            }
            ItemsChange::Moved { from, to } => {
                if from < self.entries.len() && to < self.entries.len() {
                    let entry = self.entries.remove(from);
                    self.entries.insert(to, entry);
                }
            }
            ItemsChange::Reset => self.entries.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_rect(index: usize, step: f64, height: f64) -> Rect {
        Rect::new(0.0, index as f64 * step, 120.0, height)
    }

    #[test]
    fn rebuild_measures_and_marks() {
        let mut cache = LayoutCache::new(Orientation::Vertical);
        cache.rebuild(3, |i| (i != 1).then(|| vertical_rect(i, 44.0, 40.0)));

        assert_eq!(cache.len(), 3);
        assert!(!cache.get(0).unwrap().estimated);
        assert!(cache.get(1).unwrap().estimated);
        assert!(!cache.get(2).unwrap().estimated);
    }

    #[test]
    fn estimation_interpolates_between_anchor_and_second() {
        // Anchor at index 0, second measured at index 3; gaps interpolated.
        let mut cache = LayoutCache::new(Orientation::Vertical);
        cache.rebuild(5, |i| (i == 0 || i == 3).then(|| vertical_rect(i, 44.0, 40.0)));

        for index in [1, 2, 4] {
            let pos = cache.position_of(index).unwrap();
            assert!(
                (pos.y - index as f64 * 44.0).abs() < 1e-9,
                "index {index} estimated at {pos:?}"
            );
            assert!((pos.x - 0.0).abs() < 1e-9);
        }
        // Estimated entries inherit the anchor's size.
        assert_eq!(cache.get(2).unwrap().size, Size::new(120.0, 40.0));
    }

    #[test]
    fn estimation_single_anchor_falls_back_to_own_extent() {
        let mut cache = LayoutCache::new(Orientation::Vertical);
        cache.rebuild(4, |i| (i == 1).then(|| vertical_rect(1, 44.0, 40.0)));

        // Step is the anchor's height with zero cross-axis movement.
        assert_eq!(cache.position_of(0).unwrap(), Point::new(0.0, 4.0));
        assert_eq!(cache.position_of(2).unwrap(), Point::new(0.0, 84.0));
        assert_eq!(cache.position_of(3).unwrap(), Point::new(0.0, 124.0));
    }

    #[test]
    fn estimation_horizontal_fallback_steps_on_x() {
        let mut cache = LayoutCache::new(Orientation::Horizontal);
        cache.rebuild(3, |i| (i == 0).then(|| Rect::new(0.0, 0.0, 80.0, 40.0)));

        assert_eq!(cache.position_of(1).unwrap(), Point::new(80.0, 0.0));
        assert_eq!(cache.position_of(2).unwrap(), Point::new(160.0, 0.0));
    }

    #[test]
    fn estimation_without_anchor_is_noop() {
        let mut cache = LayoutCache::new(Orientation::Vertical);
        cache.rebuild(3, |_| None);

        for i in 0..3 {
            let entry = cache.get(i).unwrap();
            assert!(entry.estimated);
            assert_eq!(entry.origin, Point::ZERO);
        }
    }

    #[test]
    fn refresh_overrides_estimate() {
        let mut cache = LayoutCache::new(Orientation::Vertical);
        cache.rebuild(3, |i| (i == 0).then(|| vertical_rect(0, 44.0, 40.0)));
        assert!(cache.get(2).unwrap().estimated);

        cache.refresh(2, vertical_rect(2, 44.0, 40.0));
        let entry = cache.get(2).unwrap();
        assert!(!entry.estimated);
        assert_eq!(entry.origin.y, 88.0);
    }

    #[test]
    fn infer_gap_from_adjacent_measured() {
        let mut cache = LayoutCache::new(Orientation::Vertical);
        cache.rebuild(3, |i| Some(vertical_rect(i, 44.0, 40.0)));
        assert!((cache.infer_gap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn infer_gap_defaults_to_zero() {
        let mut cache = LayoutCache::new(Orientation::Vertical);
        cache.rebuild(3, |i| (i == 0).then(|| vertical_rect(0, 44.0, 40.0)));
        assert_eq!(cache.infer_gap(), 0.0);

        // Overlapping containers never report a negative gap.
        let mut overlapping = LayoutCache::new(Orientation::Vertical);
        overlapping.rebuild(2, |i| Some(vertical_rect(i, 30.0, 40.0)));
        assert_eq!(overlapping.infer_gap(), 0.0);
    }

    #[test]
    fn apply_change_shifts_indices() {
        let mut cache = LayoutCache::new(Orientation::Vertical);
        cache.rebuild(3, |i| Some(vertical_rect(i, 44.0, 40.0)));

        cache.apply_change(&ItemsChange::Inserted { index: 1, count: 2 });
        assert_eq!(cache.len(), 5);
        assert!(cache.get(1).unwrap().estimated);
        assert_eq!(cache.position_of(3).unwrap().y, 44.0);

        cache.apply_change(&ItemsChange::Removed { index: 1, count: 2 });
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.position_of(1).unwrap().y, 44.0);

        cache.apply_change(&ItemsChange::Moved { from: 0, to: 2 });
        assert_eq!(cache.position_of(2).unwrap().y, 0.0);

        cache.apply_change(&ItemsChange::Reset);
        assert!(cache.is_empty());
    }

    #[test]
    fn apply_change_out_of_range_is_noop() {
        let mut cache = LayoutCache::new(Orientation::Vertical);
        cache.rebuild(2, |i| Some(vertical_rect(i, 44.0, 40.0)));

        cache.apply_change(&ItemsChange::Removed { index: 5, count: 1 });
        cache.apply_change(&ItemsChange::Moved { from: 9, to: 0 });
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn center_includes_half_extent() {
        let entry = ItemLayout {
            origin: Point::new(10.0, 20.0),
            size: Size::new(100.0, 40.0),
            estimated: false,
        };
        assert_eq!(entry.center(), Point::new(60.0, 40.0));
    }
}
