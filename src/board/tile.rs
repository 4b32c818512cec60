//! Tile entity and lifecycle state machine.
//!
//! A tile is the owned content of one grid cell. Its lifecycle is strictly
//! monotonic:
//!
//! ```text
//! Active ──► Dragging ──► PendingDestruction ──► Destroyed
//!    │                           ▲
//!    └───────────────────────────┘   (direct removal: clear, delete-by-source)
//! ```
//!
//! There are no reverse edges. A cancelled drag does not re-activate a
//! Dragging tile; instead the content handle is moved into a freshly
//! constructed Active tile and the emptied shell is discarded. This keeps
//! every observer's rule simple: a tile seen in `PendingDestruction` or
//! `Destroyed` must be skipped, and a tile can never come back from either.
//!
//! Every accepted transition emits a structured lifecycle log event carrying
//! `{tile_id, from_state, to_state, position, cycle_id}`.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::geometry::GridPosition;

// ============================================================================
// Tile Identity
// ============================================================================

/// Monotonic tile id allocator.
///
/// Ids are process-wide and never reused, so log lines stay unambiguous even
/// across tiles that occupied the same position at different times.
static NEXT_TILE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a tile.
///
/// Used for diagnostics and destruction bookkeeping only; ownership
/// decisions are never made by comparing ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TileId(u64);

impl TileId {
    /// Allocates the next id.
    #[must_use]
    pub fn next() -> Self { Self(NEXT_TILE_ID.fetch_add(1, Ordering::Relaxed)) }

    /// Returns the raw id value.
    #[must_use]
    pub const fn value(self) -> u64 { self.0 }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Lifecycle State
// ============================================================================

/// Lifecycle state of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TileState {
    /// Owned by the registry and safe to operate on.
    Active,
    /// Captured by a drag session; not in the registry.
    Dragging,
    /// Scheduled for destruction; must be skipped by every read path.
    PendingDestruction,
    /// Content released. Terminal.
    Destroyed,
}

impl TileState {
    /// Returns whether this state marks the tile as off-limits to readers.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::PendingDestruction | Self::Destroyed)
    }

    /// Returns whether the lifecycle permits moving to `to` from this state.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Active, Self::Dragging | Self::PendingDestruction)
                | (Self::Dragging, Self::PendingDestruction)
                | (Self::PendingDestruction, Self::Destroyed)
        )
    }

    /// Short name used in lifecycle log events.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Dragging => "dragging",
            Self::PendingDestruction => "pending_destruction",
            Self::Destroyed => "destroyed",
        }
    }
}

impl std::fmt::Display for TileState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Content Handle
// ============================================================================

/// The content owned by a tile.
///
/// Stands in for the decoded image resource; the core treats it as opaque.
/// Constructing a new `TileContent` from the same descriptor models loading
/// the resource again, which is what happens when a drop replaces a tile
/// with a brand-new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileContent {
    /// Source image path this content was loaded from.
    pub source: String,
    /// Index the source had in the bank when it was first placed, if known.
    pub bank_index: Option<usize>,
}

impl TileContent {
    /// Creates a content handle for a source image.
    #[must_use]
    pub fn new(source: impl Into<String>, bank_index: Option<usize>) -> Self {
        Self { source: source.into(), bank_index }
    }
}

// ============================================================================
// Tile
// ============================================================================

/// One grid cell's content and lifecycle state.
#[derive(Debug)]
pub struct Tile {
    id: TileId,
    state: TileState,
    position: Option<GridPosition>,
    content: Option<TileContent>,
    visible: bool,
}

impl Tile {
    /// Creates a new Active tile at a position, owning fresh content.
    #[must_use]
    pub fn new(position: GridPosition, content: TileContent) -> Self {
        Self {
            id: TileId::next(),
            state: TileState::Active,
            position: Some(position),
            content: Some(content),
            visible: true,
        }
    }

    /// The tile's unique id.
    #[must_use]
    pub const fn id(&self) -> TileId { self.id }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TileState { self.state }

    /// Current grid position. `None` while Dragging or after destruction.
    #[must_use]
    pub const fn position(&self) -> Option<GridPosition> { self.position }

    /// Whether the tile should currently be rendered.
    #[must_use]
    pub const fn is_visible(&self) -> bool { self.visible }

    /// Source path of the tile's content, if the content has not been
    /// released yet.
    #[must_use]
    pub fn source(&self) -> Option<&str> { self.content.as_ref().map(|c| c.source.as_str()) }

    /// Borrows the content handle, if still held.
    #[must_use]
    pub const fn content(&self) -> Option<&TileContent> { self.content.as_ref() }

    /// Attempts a lifecycle transition, logging the outcome.
    ///
    /// Returns `false` (and logs a warning) if the transition is not part of
    /// the lifecycle. Rejected transitions leave the tile untouched; lifecycle
    /// violations are recoverable diagnostics, never faults.
    pub fn transition(&mut self, to: TileState, cycle_id: u64) -> bool {
        let from = self.state;
        if !from.can_transition_to(to) {
            tracing::warn!(
                tile_id = self.id.value(),
                from_state = from.name(),
                to_state = to.name(),
                cycle_id,
                "rejected tile lifecycle transition"
            );
            return false;
        }

        self.state = to;
        if to.is_terminal() || to == TileState::Dragging {
            self.position = None;
        }
        tracing::debug!(
            tile_id = self.id.value(),
            from_state = from.name(),
            to_state = to.name(),
            position = %OptionalPosition(self.position),
            cycle_id,
            "tile lifecycle transition"
        );
        true
    }

    /// Sets whether the tile should be rendered.
    pub fn set_visible(&mut self, visible: bool) { self.visible = visible; }

    /// Records a new grid position. Only meaningful for Active tiles.
    pub fn set_position(&mut self, position: GridPosition) { self.position = Some(position); }

    /// Takes ownership of the content handle, leaving the tile empty.
    ///
    /// Dropping the returned handle releases the resource; moving it into a
    /// new tile transfers it without a release. Either way, a second take is
    /// impossible, so double release cannot happen.
    pub fn take_content(&mut self) -> Option<TileContent> { self.content.take() }
}

/// Display adapter for optional positions in log events.
struct OptionalPosition(Option<GridPosition>);

impl std::fmt::Display for OptionalPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(pos) => write!(f, "{pos}"),
            None => f.write_str("-"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
