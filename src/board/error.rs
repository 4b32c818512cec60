//! Error types for board operations.
//!
//! Every variant here is recoverable: `PositionOccupied` triggers a
//! transactional rollback of the drop that raised it, `NotFound` degrades to
//! a logged no-op, and the rest reject an operation before any state has
//! been mutated. No board error ever aborts an event cycle.

use thiserror::Error;

use super::geometry::GridPosition;

/// Result type alias for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Errors that can occur during board operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// An insert or drop targeted a cell already holding an Active tile.
    #[error("position {0} is already occupied")]
    PositionOccupied(GridPosition),

    /// A remove or lookup targeted a cell with no tile.
    #[error("no tile at position {0}")]
    NotFound(GridPosition),

    /// A drag was started with no positions, or none of the requested
    /// positions held a tile.
    #[error("drag started with an empty selection")]
    EmptySelection,

    /// Drop destinations did not align one-to-one with the captured tiles.
    #[error("expected {expected} drop destinations, got {got}")]
    DestinationMismatch {
        /// Number of captured tiles.
        expected: usize,
        /// Number of destinations supplied.
        got: usize,
    },

    /// A drop, move, or cancel event arrived with no drag in progress.
    #[error("no drag session in progress")]
    NoDragInProgress,

    /// A drag-start event arrived while a previous drag was still open.
    #[error("a drag session is already in progress")]
    DragInProgress,
}

impl BoardError {
    /// Returns `true` if this error indicates a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }

    /// Returns `true` if this error indicates an occupancy conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool { matches!(self, Self::PositionOccupied(_)) }
}

// ============================================================================
// Tests
// ============================================================================
