//! Board input events.
//!
//! Every mutation of board state arrives as a [`BoardEvent`] and is applied
//! by the engine inside a cycle. Events carry plain data (positions, deltas,
//! source paths), never tile references, so producing an event can never
//! hold tiles alive or observe them mid-transition.

use serde::{Deserialize, Serialize};

use super::geometry::{GridPosition, Point, ViewTransform};
use super::tile::TileContent;

// ============================================================================
// Events
// ============================================================================

/// How a selection event modifies the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    /// Replace the selection with this position.
    Single,
    /// Toggle this position in or out.
    Toggle,
    /// Extend from the anchor to this position.
    Range,
}

/// An input event for the board engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    /// Begin dragging the current selection (or the single tile under the
    /// cursor when it is not part of the selection).
    DragStart {
        /// Tiles to capture, in batch order.
        positions: Vec<GridPosition>,
    },
    /// Move the in-flight drag by a pixel delta.
    DragMove {
        /// Offset to add to the drag's visual offset.
        delta: Point,
    },
    /// Drop the in-flight drag onto the grid.
    Drop {
        /// Destination cells, aligned with the capture order.
        destinations: Vec<GridPosition>,
    },
    /// Abort the in-flight drag, restoring the originals.
    DragCancel,
    /// Drop the in-flight drag onto the bank, removing the tiles from the
    /// board and returning their sources.
    DropToBank,
    /// Modify the selection at a position.
    Select {
        /// The clicked cell.
        position: GridPosition,
        /// How the click modifies the selection.
        kind: SelectionKind,
    },
    /// Replace the selection with an explicit set of positions, e.g. from a
    /// marquee computed by the input layer.
    SetSelection {
        /// The new selection, in order.
        positions: Vec<GridPosition>,
    },
    /// Select every occupied cell.
    SelectAll,
    /// Clear the selection.
    ClearSelection,
    /// Place a new tile at a vacant cell.
    PlaceTile {
        /// Target cell.
        position: GridPosition,
        /// Content for the new tile.
        content: TileContent,
    },
    /// Remove every tile whose content comes from the given source path.
    RemoveTilesBySource {
        /// Source path to match.
        source: String,
    },
    /// Remove every tile on the board.
    ClearBoard,
    /// Replace the view transform (zoom/pan).
    SetViewTransform {
        /// The new transform; zoom is clamped on application.
        transform: ViewTransform,
    },
}

impl BoardEvent {
    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DragStart { .. } => "drag_start",
            Self::DragMove { .. } => "drag_move",
            Self::Drop { .. } => "drop",
            Self::DragCancel => "drag_cancel",
            Self::DropToBank => "drop_to_bank",
            Self::Select { .. } => "select",
            Self::SetSelection { .. } => "set_selection",
            Self::SelectAll => "select_all",
            Self::ClearSelection => "clear_selection",
            Self::PlaceTile { .. } => "place_tile",
            Self::RemoveTilesBySource { .. } => "remove_tiles_by_source",
            Self::ClearBoard => "clear_board",
            Self::SetViewTransform { .. } => "set_view_transform",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serde_round_trip() {
        let event = BoardEvent::Select {
            position: GridPosition::new(2, 3),
            kind: SelectionKind::Toggle,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"select\""));
        let back: BoardEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(BoardEvent::DragCancel.name(), "drag_cancel");
        assert_eq!(
            BoardEvent::Drop { destinations: Vec::new() }.name(),
            "drop"
        );
    }
}
