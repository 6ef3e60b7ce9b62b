#![forbid(unsafe_code)]

//! Engine: drag-and-drop reordering for virtualized lists.
//!
//! # Role in dragkit
//! `dragkit-engine` is the interaction layer. It owns the full lifecycle of a
//! reorder drag: layout snapshots that survive virtualization, multi-item
//! "glued" blocks, slot resolution with hysteresis, shift/settle animations,
//! and edge-triggered auto-scrolling.
//!
//! # Primary responsibilities
//! - **LayoutCache**: per-item rest geometry in panel space, with estimation
//!   for containers the virtualizer has not realized.
//! - **DragSession**: the dragged set, glue offsets, and pointer anchors.
//! - **Slot resolution**: which slot the dragged block should occupy, with a
//!   core-zone-first policy and a swap cooldown against jitter.
//! - **TransformScheduler**: one tween per item handle, cancel-and-replace,
//!   commit fired exactly once when the primary settle completes.
//! - **AutoScroll**: edge velocity, dragged-item visibility boost, and
//!   decaying wheel velocity, clamped to the scrollable range.
//!
//! # How it fits in the system
//! The engine never touches a UI toolkit. The host widget implements
//! [`ListHost`] (containers, selection, scroll, collection edits) and calls
//! [`ReorderEngine`] methods from its event handlers plus one
//! [`tick`](ReorderEngine::tick) per frame; at paint time it asks
//! [`offset_of`](ReorderEngine::offset_of) for each item's visual offset.
//! Everything is deterministic given the call sequence and tick deltas.

pub mod autoscroll;
pub mod config;
pub mod engine;
pub mod host;
pub mod layout;
pub mod resolver;
pub mod scheduler;
pub mod session;

pub use config::EngineConfig;
pub use dragkit_core::geometry::{Orientation, Point, Rect, Size};
pub use engine::ReorderEngine;
pub use host::{HostError, ItemHandle, ItemsChange, ListHost, Viewport};
pub use layout::{ItemLayout, LayoutCache};
