#![forbid(unsafe_code)]

//! The capability surface the host widget exposes to the engine.
//!
//! [`ListHost`] is the only boundary between the engine and whatever UI
//! toolkit renders the list. The engine reads container geometry, selection,
//! and scroll state through it, and mutates the backing collection, the
//! selection, and the scroll offset through it. Visual transforms flow the
//! other way: the host queries [`offset_of`](crate::ReorderEngine::offset_of)
//! at paint time, so the engine never holds references to UI objects.
//!
//! # Contract
//!
//! 1. [`handle_at`](ListHost::handle_at) returns a handle that is stable for
//!    the lifetime of the logical item, across reorders and virtualization.
//! 2. [`container_rect`](ListHost::container_rect) reports the rendered
//!    rectangle in panel space, *including* any engine-applied offset the
//!    host painted with. The engine subtracts its own offset to recover the
//!    rest position.
//! 3. Collection edits performed *by the engine* must not be echoed back via
//!    [`items_changed`](crate::ReorderEngine::items_changed); only external
//!    mutations are notified.

use std::fmt;

use dragkit_core::geometry::{Orientation, Point, Rect, Size};

/// Stable identifier for a logical list item.
///
/// Handles survive reorders and virtualization; they are the keys of the
/// engine's animation arena and the currency of selection restoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemHandle(pub u64);

/// A change applied to the backing collection by something other than the
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsChange {
    /// `count` items inserted starting at `index`.
    Inserted { index: usize, count: usize },
    /// `count` items removed starting at `index`.
    Removed { index: usize, count: usize },
    /// One item moved from `from` to `to`.
    Moved { from: usize, to: usize },
    /// The collection was replaced wholesale.
    Reset,
}

/// Failure reported by a fallible host operation.
///
/// The engine logs these and degrades; they never propagate out of an engine
/// call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The collection has no block-move primitive (or refused this one).
    MoveUnsupported,
    /// An index was out of range for the current collection.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Collection length at the time of the call.
        len: usize,
    },
    /// The selection could not be updated.
    SelectionFailed,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveUnsupported => write!(f, "collection does not support block move"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for collection of {len}")
            }
            Self::SelectionFailed => write!(f, "selection update failed"),
        }
    }
}

impl std::error::Error for HostError {}

/// Scroll state of the list's scrollable ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Current scroll offset (top-left of the visible region in panel space).
    pub offset: Point,
    /// Visible region size.
    pub size: Size,
    /// Full content extent.
    pub extent: Size,
}

impl Viewport {
    /// Maximum valid scroll offset: `extent − viewport`, floored at zero.
    #[must_use]
    pub fn max_offset(&self) -> Point {
        Point::new(
            (self.extent.width - self.size.width).max(0.0),
            (self.extent.height - self.size.height).max(0.0),
        )
    }

    /// Whether the content overflows horizontally.
    #[must_use]
    pub fn scrollable_x(&self) -> bool {
        self.extent.width - self.size.width > 0.5
    }

    /// Whether the content overflows vertically.
    #[must_use]
    pub fn scrollable_y(&self) -> bool {
        self.extent.height - self.size.height > 0.5
    }
}

/// Read/write capabilities of the hosting list widget.
pub trait ListHost {
    /// Number of items in the backing collection.
    fn len(&self) -> usize;

    /// Whether the collection is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stacking direction of the items panel.
    fn orientation(&self) -> Orientation;

    /// Stable handle of the item currently at `index`.
    fn handle_at(&self, index: usize) -> Option<ItemHandle>;

    /// Rendered rectangle of the item's container in panel space, if the
    /// virtualizer has realized it. Includes any engine offset painted onto
    /// it (see module contract).
    fn container_rect(&self, index: usize) -> Option<Rect>;

    /// Index of the item whose container covers `pos` (panel space).
    fn item_at(&self, pos: Point) -> Option<usize>;

    /// Whether a nested interactive control (button, slider, ...) sits under
    /// `pos`. Presses on such controls never start a drag.
    fn is_interactive_at(&self, _pos: Point) -> bool {
        false
    }

    /// Currently selected indices, ascending.
    fn selected_indices(&self) -> Vec<usize>;

    /// Replace the selection with the items identified by `handles`.
    fn select_handles(&mut self, handles: &[ItemHandle]) -> Result<(), HostError>;

    /// Current scroll state.
    fn viewport(&self) -> Viewport;

    /// Set the scroll offset. The engine only passes values already clamped
    /// to `[0, max_offset]`.
    fn set_scroll_offset(&mut self, offset: Point);

    /// Whether the collection supports an O(1) contiguous block move that
    /// preserves change-notification semantics better than remove/insert.
    fn supports_block_move(&self) -> bool {
        false
    }

    /// Move `count` items starting at `first` so the block starts at `to` in
    /// the resulting order.
    fn move_block(&mut self, first: usize, count: usize, to: usize) -> Result<(), HostError>;

    /// Remove the item at `index`, returning its handle.
    fn remove_at(&mut self, index: usize) -> Result<ItemHandle, HostError>;

    /// Insert the item identified by `handle` at `index`.
    fn insert_at(&mut self, index: usize, handle: ItemHandle) -> Result<(), HostError>;

    /// A drag completed and the order was committed. `from`/`to` are the
    /// representative (primary) item's original and final indices.
    fn drop_completed(&mut self, _handle: ItemHandle, _from: usize, _to: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_max_offset_floors_at_zero() {
        let vp = Viewport {
            offset: Point::ZERO,
            size: Size::new(200.0, 400.0),
            extent: Size::new(180.0, 1000.0),
        };
        assert_eq!(vp.max_offset(), Point::new(0.0, 600.0));
        assert!(!vp.scrollable_x());
        assert!(vp.scrollable_y());
    }

    #[test]
    fn host_error_display() {
        let err = HostError::IndexOutOfRange { index: 9, len: 4 };
        assert_eq!(err.to_string(), "index 9 out of range for collection of 4");
        assert_eq!(
            HostError::MoveUnsupported.to_string(),
            "collection does not support block move"
        );
    }
}
