#![forbid(unsafe_code)]

//! The reorder engine: controller for the full drag lifecycle.
//!
//! The host wires its event handlers to [`pointer_down`](ReorderEngine::pointer_down),
//! [`pointer_move`](ReorderEngine::pointer_move),
//! [`pointer_up`](ReorderEngine::pointer_up), [`wheel`](ReorderEngine::wheel)
//! and calls [`tick`](ReorderEngine::tick) once per frame. Pointer positions
//! are viewport-relative; the engine translates them into panel space with
//! the current scroll offset.
//!
//! # Ordering guarantees
//!
//! Within one pointer-move or tick: layout refresh, then slot resolution,
//! then shift animations. There is no cross-call reentrancy; each call runs
//! to completion.
//!
//! # Commit semantics
//!
//! The backing collection is mutated exactly once per completed drag, when
//! the primary item's settle tween finishes inside `tick`, and only if the
//! drag crossed the move threshold and resolved a slot that changes the
//! order. Every fallible host call is wrapped: failures are logged and the
//! interaction degrades instead of escaping into the host's event loop.

use std::time::Duration;

use ahash::AHashMap;
use dragkit_core::animation::Ramp;
use dragkit_core::geometry::{Point, Rect};
use tracing::{debug, warn};

use crate::autoscroll::AutoScroll;
use crate::config::{EngineConfig, consts};
use crate::host::{ItemHandle, ItemsChange, ListHost};
use crate::layout::LayoutCache;
use crate::resolver;
use crate::scheduler::TransformScheduler;
use crate::session::{DragSession, compute_glue_targets};

/// Deferred work for a drag whose settle animation is in flight.
#[derive(Debug)]
struct PendingSettle {
    /// Handle whose tween completion triggers the commit.
    primary: ItemHandle,
    /// Original indices of the dragged set, ascending.
    indices: Vec<usize>,
    /// Selection at drag start, restored by identity after the mutation.
    selected: Vec<ItemHandle>,
    primary_rank: usize,
    block_start: usize,
    /// Whether the collection order actually changes.
    commit: bool,
}

/// Drag-and-drop reordering controller for one list widget.
#[derive(Debug)]
pub struct ReorderEngine {
    config: EngineConfig,
    /// Monotonic engine time, advanced only by `tick`.
    clock: Duration,
    cache: LayoutCache,
    session: Option<DragSession>,
    settle: Option<PendingSettle>,
    scheduler: TransformScheduler,
    autoscroll: AutoScroll,
    /// Offsets from a cleared interaction that the host may still have on
    /// screen; consumed by the next press, dropped after the next tick.
    stale_paint: AHashMap<ItemHandle, Point>,
    /// Last pointer position, viewport-relative, while a drag is active.
    last_pointer: Option<Point>,
}

impl ReorderEngine {
    /// Create an engine with the given configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            clock: Duration::ZERO,
            cache: LayoutCache::new(Default::default()),
            session: None,
            settle: None,
            scheduler: TransformScheduler::new(),
            autoscroll: AutoScroll::new(),
            stale_paint: AHashMap::new(),
            last_pointer: None,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether a drag session is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Current visual offset for an item, for the host's paint pass.
    #[must_use]
    pub fn offset_of(&self, handle: ItemHandle) -> Point {
        self.scheduler.offset_of(handle)
    }

    /// Whether the item should render above its siblings.
    #[must_use]
    pub fn is_raised(&self, handle: ItemHandle) -> bool {
        self.scheduler.is_raised(handle)
    }

    /// Handle a press at a viewport-relative position.
    ///
    /// Returns `true` when the engine captured the pointer and a drag
    /// session began.
    pub fn pointer_down(&mut self, host: &mut dyn ListHost, pos: Point) -> bool {
        // Offsets the host last painted with, captured before the defensive
        // reset below wipes them: the snapshot must subtract what is on
        // screen, not what the scheduler holds after the reset.
        let mut painted = std::mem::take(&mut self.stale_paint);
        painted.extend(self.scheduler.offsets());

        // A press during a settle flushes the pending drop so it is never
        // lost, then everything resets before the new session.
        self.finish_settle(host);
        self.reset_interaction();

        let vp = host.viewport();
        let panel = pos + vp.offset;

        if host.is_interactive_at(panel) {
            return false;
        }
        let Some(pressed) = host.item_at(panel) else {
            return false;
        };
        let len = host.len();
        if pressed >= len {
            return false;
        }

        self.cache = LayoutCache::new(host.orientation());
        let mut rects = Vec::with_capacity(len);
        for index in 0..len {
            let rect = host.container_rect(index).map(|r| {
                let offset = host
                    .handle_at(index)
                    .and_then(|h| painted.get(&h).copied())
                    .unwrap_or(Point::ZERO);
                Rect {
                    origin: r.origin - offset,
                    size: r.size,
                }
            });
            rects.push(rect);
        }
        self.cache.rebuild(len, |index| rects[index]);

        let selection = host.selected_indices();
        let mut dragged = if selection.len() > 1 && selection.contains(&pressed) {
            selection.clone()
        } else {
            vec![pressed]
        };
        dragged.sort_unstable();
        dragged.dedup();
        let Some(primary_rank) = dragged.iter().position(|&i| i == pressed) else {
            return false;
        };

        let handles: Option<Vec<ItemHandle>> =
            dragged.iter().map(|&i| host.handle_at(i)).collect();
        let Some(handles) = handles else {
            return false;
        };
        let selected_handles: Vec<ItemHandle> = selection
            .iter()
            .filter_map(|&i| host.handle_at(i))
            .collect();

        let item_starts: Option<Vec<Point>> =
            dragged.iter().map(|&i| self.cache.position_of(i)).collect();
        let Some(item_starts) = item_starts else {
            return false;
        };
        let Some(primary_entry) = self.cache.get(pressed) else {
            return false;
        };
        let primary_size = primary_entry.size;

        let gap = self.cache.infer_gap();
        let glue_targets =
            compute_glue_targets(&self.cache, &dragged, primary_rank, gap, host.orientation());

        for &handle in &handles {
            self.scheduler.set_offset(handle, Point::ZERO);
            self.scheduler.set_raised(handle, true);
        }

        debug!(
            pressed,
            count = dragged.len(),
            "drag session started"
        );
        self.session = Some(DragSession {
            dragged,
            primary_rank,
            handles,
            selected_handles,
            glue_targets,
            glue: Ramp::new(consts::GLUE_DURATION),
            pointer_start: panel,
            item_starts,
            primary_size,
            delta: Point::ZERO,
            armed: false,
            last_slot: None,
            last_swap_at: None,
        });
        self.last_pointer = Some(pos);
        true
    }

    /// Handle pointer movement at a viewport-relative position.
    pub fn pointer_move(&mut self, host: &mut dyn ListHost, pos: Point) {
        if self.session.is_none() {
            return;
        }
        self.last_pointer = Some(pos);
        self.update_drag(host);
    }

    /// Handle pointer release: start the settle animations and schedule the
    /// commit on the primary's completion.
    pub fn pointer_up(&mut self, host: &mut dyn ListHost) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.last_pointer = None;
        self.autoscroll.clear_target();

        let len = self.cache.len();
        let block_len = session.dragged.len();
        let mut commit = session.armed && session.last_slot.is_some();
        let block_start = session.last_slot.map_or(session.dragged[0], |slot| {
            resolver::block_start_for(len, block_len, session.primary_rank, slot)
        });
        if session.is_contiguous() && block_start == session.dragged[0] {
            commit = false;
        }

        // Final resting offsets for the dragged block. Missing slot geometry
        // downgrades the drop to a return-home animation.
        let mut targets = Vec::with_capacity(block_len);
        if commit {
            for rank in 0..block_len {
                match self.cache.position_of(block_start + rank) {
                    Some(final_pos) => targets.push(final_pos - session.item_starts[rank]),
                    None => {
                        commit = false;
                        break;
                    }
                }
            }
        }
        if !commit {
            targets.clear();
            targets.resize(block_len, Point::ZERO);
            // Shifted bystanders animate back to rest.
            for index in 0..len {
                if session.contains(index) {
                    continue;
                }
                if let Some(handle) = host.handle_at(index) {
                    self.scheduler
                        .animate(handle, Point::ZERO, consts::SHIFT_DURATION);
                }
            }
        }

        for (rank, &handle) in session.handles.iter().enumerate() {
            self.scheduler
                .animate(handle, targets[rank], consts::SHIFT_DURATION);
        }

        let primary = session.handles[session.primary_rank];
        debug!(
            commit,
            block_start,
            armed = session.armed,
            "drag released"
        );
        self.settle = Some(PendingSettle {
            primary,
            indices: session.dragged,
            selected: session.selected_handles,
            primary_rank: session.primary_rank,
            block_start,
            commit,
        });

        // Nothing to animate (no-op drag at rest): finish synchronously.
        if !self.scheduler.is_animating(primary) {
            self.finish_settle(host);
        }
    }

    /// Capture loss / detach path: stop every animation, reset every
    /// transform to identity and stacking to baseline, drop all state.
    pub fn cancel(&mut self) {
        if self.session.is_some() || self.settle.is_some() {
            debug!("drag cancelled");
        }
        self.session = None;
        self.settle = None;
        self.last_pointer = None;
        self.stale_paint = self.scheduler.offsets();
        self.scheduler.clear();
        self.autoscroll.reset();
        self.cache.clear();
    }

    /// Accumulate a wheel delta into the manual scroll velocity.
    pub fn wheel(&mut self, host: &mut dyn ListHost, delta: Point) {
        let vp = host.viewport();
        self.autoscroll.add_wheel(delta, &vp);
    }

    /// Advance the engine by one frame.
    pub fn tick(&mut self, host: &mut dyn ListHost, dt: Duration) {
        self.clock = self.clock.saturating_add(dt);

        if let Some(session) = &mut self.session {
            session.glue.tick(dt);
        }

        let completed = self.scheduler.tick(dt);
        if let Some(settle) = &self.settle {
            if completed.contains(&settle.primary) {
                self.finish_settle(host);
            }
        }

        let vp = host.viewport();
        if let Some(next) = self.autoscroll.tick(dt, &vp) {
            host.set_scroll_offset(next);
        }

        // Scrolling moves the panel under a stationary pointer; the drag
        // state re-derives from the stored pointer position.
        if self.session.is_some() {
            self.update_drag(host);
        }

        // The host paints after this tick; anything it still had on screen
        // from a cleared interaction is refreshed by that paint.
        self.stale_paint.clear();
    }

    /// Notification of an external collection change.
    ///
    /// Engine-initiated mutations are not echoed here (see [`ListHost`]
    /// contract); an external change mid-interaction invalidates every
    /// anchor, so the drag is cancelled.
    pub fn items_changed(&mut self, change: ItemsChange) {
        if self.session.is_some() || self.settle.is_some() {
            warn!(?change, "collection changed during drag; cancelling");
            self.cancel();
            return;
        }
        self.cache.apply_change(&change);
    }

    /// Shared pointer-move / tick body.
    fn update_drag(&mut self, host: &mut dyn ListHost) {
        let Some(pos) = self.last_pointer else {
            return;
        };
        let Some(mut session) = self.session.take() else {
            return;
        };
        let vp = host.viewport();
        let panel = pos + vp.offset;
        session.delta = panel - session.pointer_start;
        session.update_armed();

        // Layout refresh precedes slot resolution. Rendered rects carry the
        // offsets the host painted with; subtracting them recovers rest
        // positions.
        for index in 0..self.cache.len() {
            let (Some(rect), Some(handle)) = (host.container_rect(index), host.handle_at(index))
            else {
                continue;
            };
            let rest = Rect {
                origin: rect.origin - self.scheduler.offset_of(handle),
                size: rect.size,
            };
            self.cache.refresh(index, rest);
        }

        for (rank, &handle) in session.handles.iter().enumerate() {
            self.scheduler.set_offset(handle, session.current_offset(rank));
        }

        let primary_start = session.item_starts[session.primary_rank];
        let half = Point::new(
            session.primary_size.width / 2.0,
            session.primary_size.height / 2.0,
        );
        let center = primary_start + session.delta + half;

        if let Some(best) = resolver::resolve_slot(&self.cache, center) {
            let cooled = session
                .last_swap_at
                .is_none_or(|at| self.clock.saturating_sub(at) >= consts::SWAP_COOLDOWN);
            if Some(best) != session.last_slot && cooled {
                session.last_slot = Some(best);
                session.last_swap_at = Some(self.clock);
                debug!(slot = best, "swap target committed");
                let shifts = resolver::shift_offsets(
                    &self.cache,
                    &session.dragged,
                    session.primary_rank,
                    best,
                );
                for (index, offset) in shifts {
                    if let Some(handle) = host.handle_at(index) {
                        self.scheduler.animate(handle, offset, consts::SHIFT_DURATION);
                    }
                }
            }
        }

        let drag_rect = Rect {
            origin: primary_start + session.delta,
            size: session.primary_size,
        };
        self.autoscroll
            .set_target(panel, &vp, Some(drag_rect), &self.config);

        self.session = Some(session);
    }

    /// Run the deferred commit and clean up all visuals.
    fn finish_settle(&mut self, host: &mut dyn ListHost) {
        let Some(settle) = self.settle.take() else {
            return;
        };
        if settle.commit {
            self.perform_commit(host, &settle);
        }
        // What is on screen until the host's next paint.
        self.stale_paint = self.scheduler.offsets();
        self.scheduler.clear();
        self.cache.clear();
    }

    /// Mutate the backing collection into the dropped order.
    fn perform_commit(&mut self, host: &mut dyn ListHost, settle: &PendingSettle) {
        let block_len = settle.indices.len();
        let from = settle.indices[settle.primary_rank];
        let to = settle.block_start + settle.primary_rank;
        let contiguous = settle.indices.windows(2).all(|w| w[1] == w[0] + 1);

        let mut moved = false;
        if contiguous && host.supports_block_move() {
            match host.move_block(settle.indices[0], block_len, settle.block_start) {
                Ok(()) => moved = true,
                Err(err) => {
                    warn!(%err, "block move failed; falling back to remove/insert");
                }
            }
        }
        if !moved {
            let mut removed = Vec::with_capacity(block_len);
            for &index in settle.indices.iter().rev() {
                match host.remove_at(index) {
                    Ok(handle) => removed.push(handle),
                    Err(err) => warn!(%err, index, "remove failed during reorder"),
                }
            }
            removed.reverse();
            for (rank, &handle) in removed.iter().enumerate() {
                let at = (settle.block_start + rank).min(host.len());
                if let Err(err) = host.insert_at(at, handle) {
                    warn!(%err, "insert failed during reorder");
                }
            }
        }

        if let Err(err) = host.select_handles(&settle.selected) {
            warn!(%err, "selection restore failed");
        }
        host.drop_completed(settle.primary, from, to);
        debug!(from, to, "reorder committed");
    }

    /// Defensive reset before a new session: everything from any previous
    /// interaction is stopped and zeroed.
    fn reset_interaction(&mut self) {
        self.session = None;
        self.settle = None;
        self.last_pointer = None;
        self.stale_paint.clear();
        self.scheduler.clear();
        self.autoscroll.reset();
    }
}

impl Default for ReorderEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
