//! End-to-end drag scenarios against an in-memory list host.
//!
//! The host paints engine offsets back into its container rects via
//! [`VecHost::sync`], mimicking a real widget's paint pass between engine
//! calls.

use std::time::Duration;

use ahash::AHashMap;
use dragkit_engine::{
    EngineConfig, HostError, ItemHandle, ListHost, Orientation, Point, Rect, ReorderEngine, Size,
    Viewport,
};

const STEP: f64 = 44.0;
const HEIGHT: f64 = 40.0;
const WIDTH: f64 = 120.0;
const FRAME: Duration = Duration::from_millis(16);

struct VecHost {
    items: Vec<ItemHandle>,
    selected: Vec<usize>,
    painted: AHashMap<ItemHandle, Point>,
    scroll: Point,
    viewport_size: Size,
    block_move: bool,
    moves: Vec<(usize, usize, usize)>,
    drops: Vec<(ItemHandle, usize, usize)>,
}

impl VecHost {
    fn new(len: usize) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Self {
            items: (0..len as u64).map(ItemHandle).collect(),
            selected: Vec::new(),
            painted: AHashMap::new(),
            scroll: Point::ZERO,
            // Taller than any test list: scrolling disabled by default.
            viewport_size: Size::new(200.0, 10_000.0),
            block_move: false,
            moves: Vec::new(),
            drops: Vec::new(),
        }
    }

    fn scrollable(len: usize) -> Self {
        let mut host = Self::new(len);
        host.viewport_size = Size::new(200.0, 400.0);
        host
    }

    /// Paint pass: copy the engine's current offsets into the rendered rects.
    fn sync(&mut self, engine: &ReorderEngine) {
        self.painted = self
            .items
            .iter()
            .map(|&h| (h, engine.offset_of(h)))
            .collect();
    }

    fn rest_rect(&self, index: usize) -> Rect {
        Rect::new(0.0, index as f64 * STEP, WIDTH, HEIGHT)
    }

    fn order(&self) -> Vec<u64> {
        self.items.iter().map(|h| h.0).collect()
    }
}

impl ListHost for VecHost {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn orientation(&self) -> Orientation {
        Orientation::Vertical
    }

    fn handle_at(&self, index: usize) -> Option<ItemHandle> {
        self.items.get(index).copied()
    }

    fn container_rect(&self, index: usize) -> Option<Rect> {
        let handle = self.items.get(index)?;
        let offset = self.painted.get(handle).copied().unwrap_or(Point::ZERO);
        let rest = self.rest_rect(index);
        Some(Rect {
            origin: rest.origin + offset,
            size: rest.size,
        })
    }

    fn item_at(&self, pos: Point) -> Option<usize> {
        (0..self.items.len()).find(|&i| {
            self.container_rect(i)
                .is_some_and(|rect| rect.contains(pos))
        })
    }

    fn selected_indices(&self) -> Vec<usize> {
        self.selected.clone()
    }

    fn select_handles(&mut self, handles: &[ItemHandle]) -> Result<(), HostError> {
        self.selected = handles
            .iter()
            .filter_map(|h| self.items.iter().position(|x| x == h))
            .collect();
        self.selected.sort_unstable();
        Ok(())
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            offset: self.scroll,
            size: self.viewport_size,
            extent: Size::new(WIDTH, self.items.len() as f64 * STEP),
        }
    }

    fn set_scroll_offset(&mut self, offset: Point) {
        self.scroll = offset;
    }

    fn supports_block_move(&self) -> bool {
        self.block_move
    }

    fn move_block(&mut self, first: usize, count: usize, to: usize) -> Result<(), HostError> {
        let len = self.items.len();
        if first + count > len || to > len - count {
            return Err(HostError::IndexOutOfRange { index: first, len });
        }
        self.moves.push((first, count, to));
        let block: Vec<_> = self.items.drain(first..first + count).collect();
        for (i, handle) in block.into_iter().enumerate() {
            self.items.insert(to + i, handle);
        }
        Ok(())
    }

    fn remove_at(&mut self, index: usize) -> Result<ItemHandle, HostError> {
        if index >= self.items.len() {
            return Err(HostError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    fn insert_at(&mut self, index: usize, handle: ItemHandle) -> Result<(), HostError> {
        if index > self.items.len() {
            return Err(HostError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, handle);
        Ok(())
    }

    fn drop_completed(&mut self, handle: ItemHandle, from: usize, to: usize) {
        self.drops.push((handle, from, to));
    }
}

fn center_of(index: usize) -> Point {
    Point::new(60.0, index as f64 * STEP + HEIGHT / 2.0)
}

/// Run `frames` ticks with a paint pass after each.
fn run(engine: &mut ReorderEngine, host: &mut VecHost, frames: usize) {
    for _ in 0..frames {
        engine.tick(host, FRAME);
        host.sync(engine);
    }
}

#[test]
fn drag_below_threshold_is_a_noop() {
    let mut host = VecHost::new(6);
    let mut engine = ReorderEngine::default();

    assert!(engine.pointer_down(&mut host, center_of(1)));
    host.sync(&engine);
    engine.pointer_move(&mut host, center_of(1) + Point::new(0.0, 2.0));
    host.sync(&engine);
    engine.pointer_up(&mut host);
    run(&mut engine, &mut host, 20);

    assert_eq!(host.order(), vec![0, 1, 2, 3, 4, 5]);
    assert!(host.drops.is_empty());
    for &handle in &host.items {
        assert_eq!(engine.offset_of(handle), Point::ZERO);
        assert!(!engine.is_raised(handle));
    }
}

#[test]
fn single_item_drag_commits_after_settle() {
    let mut host = VecHost::new(6);
    let mut engine = ReorderEngine::default();

    assert!(engine.pointer_down(&mut host, center_of(1)));
    host.sync(&engine);
    // Slightly past item 3's center so the settle has distance to animate.
    engine.pointer_move(&mut host, center_of(3) + Point::new(0.0, 10.0));
    host.sync(&engine);

    // Bystanders 2 and 3 are shifting up while the drag is live.
    run(&mut engine, &mut host, 4);
    assert!(engine.offset_of(ItemHandle(2)).y < 0.0);
    assert!(engine.offset_of(ItemHandle(3)).y < 0.0);
    assert!(engine.is_raised(ItemHandle(1)));

    engine.pointer_up(&mut host);
    // The collection is untouched until the settle animation lands.
    assert_eq!(host.order(), vec![0, 1, 2, 3, 4, 5]);
    run(&mut engine, &mut host, 20);

    assert_eq!(host.order(), vec![0, 2, 3, 1, 4, 5]);
    assert_eq!(host.drops, vec![(ItemHandle(1), 1, 3)]);
    for &handle in &host.items {
        assert_eq!(engine.offset_of(handle), Point::ZERO);
        assert!(!engine.is_raised(handle));
    }
}

#[test]
fn scattered_selection_lands_as_contiguous_block() {
    let mut host = VecHost::new(9);
    host.selected = vec![2, 5, 7];
    let mut engine = ReorderEngine::default();

    // Grab the middle of the selection; the whole set drags.
    assert!(engine.pointer_down(&mut host, center_of(5)));
    host.sync(&engine);
    for &handle in &[ItemHandle(2), ItemHandle(5), ItemHandle(7)] {
        assert!(engine.is_raised(handle));
    }

    // Arm the drag without leaving the primary's own slot.
    engine.pointer_move(&mut host, center_of(5) + Point::new(0.0, 8.0));
    host.sync(&engine);
    run(&mut engine, &mut host, 4);

    engine.pointer_up(&mut host);
    run(&mut engine, &mut host, 20);

    // Non-dragged items keep their order; the block compacts around the
    // primary's slot.
    assert_eq!(host.order(), vec![0, 1, 3, 4, 2, 5, 7, 6, 8]);
    assert_eq!(host.drops, vec![(ItemHandle(5), 5, 5)]);
    // Selection follows the items by identity, not by index.
    assert_eq!(host.selected, vec![4, 5, 6]);
}

#[test]
fn scattered_selection_drops_at_distant_slot() {
    let mut host = VecHost::new(9);
    host.selected = vec![2, 5, 7];
    let mut engine = ReorderEngine::default();

    assert!(engine.pointer_down(&mut host, center_of(5)));
    host.sync(&engine);
    // Drag the primary up to slot 2.
    engine.pointer_move(&mut host, center_of(2));
    host.sync(&engine);
    run(&mut engine, &mut host, 4);

    engine.pointer_up(&mut host);
    run(&mut engine, &mut host, 20);

    // Block start is the target slot minus the primary's rank (2 − 1): the
    // block lands at indices 1..=3 in original relative order.
    assert_eq!(host.order(), vec![0, 2, 5, 7, 1, 3, 4, 6, 8]);
    assert_eq!(host.drops, vec![(ItemHandle(5), 5, 2)]);
    assert_eq!(host.selected, vec![1, 2, 3]);
}

#[test]
fn contiguous_selection_uses_block_move() {
    let mut host = VecHost::new(6);
    host.block_move = true;
    host.selected = vec![2, 3];
    let mut engine = ReorderEngine::default();

    assert!(engine.pointer_down(&mut host, center_of(2)));
    host.sync(&engine);
    engine.pointer_move(&mut host, center_of(4));
    host.sync(&engine);
    engine.pointer_up(&mut host);
    run(&mut engine, &mut host, 20);

    assert_eq!(host.moves, vec![(2, 2, 4)]);
    assert_eq!(host.order(), vec![0, 1, 4, 5, 2, 3]);
    assert_eq!(host.selected, vec![4, 5]);
}

#[test]
fn returning_to_origin_commits_nothing() {
    let mut host = VecHost::new(6);
    let mut engine = ReorderEngine::default();

    assert!(engine.pointer_down(&mut host, center_of(2)));
    host.sync(&engine);
    engine.pointer_move(&mut host, center_of(4));
    host.sync(&engine);
    run(&mut engine, &mut host, 2);

    // Back to where it started; past the threshold, but the drop target is
    // the original slot.
    engine.pointer_move(&mut host, center_of(2) + Point::new(0.0, 6.0));
    host.sync(&engine);
    engine.pointer_up(&mut host);
    run(&mut engine, &mut host, 20);

    assert_eq!(host.order(), vec![0, 1, 2, 3, 4, 5]);
    assert!(host.drops.is_empty());
    for &handle in &host.items {
        assert_eq!(engine.offset_of(handle), Point::ZERO);
    }
}

#[test]
fn press_during_settle_flushes_the_pending_commit() {
    let mut host = VecHost::new(6);
    let mut engine = ReorderEngine::default();

    assert!(engine.pointer_down(&mut host, center_of(1)));
    host.sync(&engine);
    engine.pointer_move(&mut host, center_of(3) + Point::new(0.0, 10.0));
    host.sync(&engine);
    engine.pointer_up(&mut host);
    assert_eq!(host.order(), vec![0, 1, 2, 3, 4, 5]);
    host.sync(&engine);

    // New press before the settle animation lands: the previous drop is
    // applied immediately, never lost.
    engine.pointer_down(&mut host, center_of(0));
    assert_eq!(host.order(), vec![0, 2, 3, 1, 4, 5]);
    assert_eq!(host.drops.len(), 1);

    engine.cancel();
}

#[test]
fn edge_autoscroll_stays_within_range() {
    let mut host = VecHost::scrollable(20);
    let mut engine = ReorderEngine::default();

    assert!(engine.pointer_down(&mut host, center_of(1)));
    host.sync(&engine);
    // Pointer parked deep in the bottom edge zone.
    engine.pointer_move(&mut host, Point::new(60.0, 396.0));
    host.sync(&engine);

    let max = host.viewport().max_offset().y;
    for _ in 0..200 {
        engine.tick(&mut host, FRAME);
        host.sync(&engine);
        assert!(host.scroll.y >= 0.0);
        assert!(host.scroll.y <= max + 1e-9);
    }
    // Long enough to hit the end of the content and stay clamped there.
    assert!((host.scroll.y - max).abs() < 1e-6);
    assert!(engine.is_dragging());

    engine.cancel();
    assert!(!engine.is_dragging());
}

#[test]
fn wheel_scrolls_and_decays_without_a_drag() {
    let mut host = VecHost::scrollable(20);
    let mut engine = ReorderEngine::default();

    engine.wheel(&mut host, Point::new(0.0, 30.0));
    run(&mut engine, &mut host, 60);

    let settled = host.scroll.y;
    assert!(settled > 0.0);
    assert!(settled <= host.viewport().max_offset().y);

    // Fully decayed: further ticks do not move the offset.
    run(&mut engine, &mut host, 10);
    assert_eq!(host.scroll.y, settled);
}

#[test]
fn clamped_engine_config_is_respected() {
    let config = EngineConfig {
        edge_scroll_zone: 0.0,
        ..EngineConfig::default()
    };
    let mut host = VecHost::scrollable(20);
    let mut engine = ReorderEngine::new(config);

    assert!(engine.pointer_down(&mut host, center_of(1)));
    host.sync(&engine);
    // Inside the default edge zone, but the item itself stays visible.
    engine.pointer_move(&mut host, Point::new(60.0, 380.0));
    host.sync(&engine);

    run(&mut engine, &mut host, 50);
    assert_eq!(host.scroll, Point::ZERO);

    engine.cancel();
}
