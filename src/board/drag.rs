//! Multi-tile drag/drop transaction.
//!
//! A [`DragSession`] captures the selected tiles out of the registry (taking
//! ownership), tracks a visual offset while the user drags, and finishes in
//! exactly one of three ways:
//!
//! - [`DragSession::complete_drop`] — constructs brand-new Active tiles at
//!   the destinations, then **unconditionally** schedules every captured
//!   tile for destruction. The old tiles are always superseded on a
//!   successful drop; whether something "equal" to them exists in the
//!   registry is never consulted, because the replacements are distinct
//!   objects and membership testing against them is meaningless.
//! - [`DragSession::complete_drop_to_bank`] — schedules every captured tile
//!   and hands the content descriptors back so the caller can return the
//!   sources to the bank.
//! - [`DragSession::cancel`] — rebuilds Active tiles at the origins from the
//!   captured content handles. No destruction is scheduled: the content
//!   moves into the new tiles and the emptied Dragging shells are discarded,
//!   which is how the lifecycle expresses "cancel" without a reverse edge.
//!
//! Drops are transactional: every destination is validated before anything
//! is inserted, and any conflict rolls the whole batch back to the origins.

use std::collections::HashSet;

use smallvec::SmallVec;

use super::destruction::DestructionQueue;
use super::error::{BoardError, BoardResult};
use super::geometry::{GridPosition, Point};
use super::registry::TileRegistry;
use super::tile::{Tile, TileContent, TileId, TileState};
use crate::constants::DRAG_BATCH_INLINE_CAP;

// ============================================================================
// Session Types
// ============================================================================

/// Phase of a drag session. `Idle` is represented by having no session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Tiles captured; drag in progress.
    Capturing,
    /// Drop destinations received; transaction in flight.
    AwaitingDrop,
    /// Drop committed; captured tiles routed to destruction.
    Cleanup,
}

/// A tile captured out of the registry, with the position it came from.
#[derive(Debug)]
struct CapturedTile {
    tile: Tile,
    origin: GridPosition,
}

/// Result of a committed drop.
#[derive(Debug)]
pub struct DropOutcome {
    /// Ids and positions of the freshly constructed replacement tiles, in
    /// capture order.
    pub placed: Vec<(GridPosition, TileId)>,
}

/// An in-flight multi-tile drag transaction.
///
/// Owns the captured tiles for its whole lifetime; ownership flows
/// registry → session → (new tiles to registry) + (old tiles to the
/// destruction queue).
#[derive(Debug)]
pub struct DragSession {
    captured: SmallVec<[CapturedTile; DRAG_BATCH_INLINE_CAP]>,
    visual_offset: Point,
    phase: DragPhase,
}

impl DragSession {
    /// Starts a drag by capturing tiles out of the registry.
    ///
    /// Positions are captured in the order given, which later defines the
    /// alignment with drop destinations. Positions with no tile are skipped
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::EmptySelection`] if `positions` is empty or no
    /// position yielded a tile; in that case the registry is unchanged.
    pub fn begin(
        registry: &mut TileRegistry,
        positions: &[GridPosition],
        cycle_id: u64,
    ) -> BoardResult<Self> {
        if positions.is_empty() {
            return Err(BoardError::EmptySelection);
        }

        let mut captured: SmallVec<[CapturedTile; DRAG_BATCH_INLINE_CAP]> = SmallVec::new();
        for &origin in positions {
            match registry.remove(origin) {
                Ok(mut tile) => {
                    tile.transition(TileState::Dragging, cycle_id);
                    tile.set_visible(false);
                    captured.push(CapturedTile { tile, origin });
                }
                Err(err) => {
                    tracing::warn!(position = %origin, %err, "drag skipped position");
                }
            }
        }

        if captured.is_empty() {
            return Err(BoardError::EmptySelection);
        }

        tracing::debug!(count = captured.len(), cycle_id, "drag session started");
        Ok(Self {
            captured,
            visual_offset: Point::default(),
            phase: DragPhase::Capturing,
        })
    }

    /// Current session phase.
    #[must_use]
    pub const fn phase(&self) -> DragPhase { self.phase }

    /// Number of captured tiles.
    #[must_use]
    pub fn len(&self) -> usize { self.captured.len() }

    /// Returns whether the session holds no tiles (never true after
    /// a successful [`Self::begin`]).
    #[must_use]
    pub fn is_empty(&self) -> bool { self.captured.is_empty() }

    /// Ids of the captured tiles, in capture order.
    #[must_use]
    pub fn captured_ids(&self) -> Vec<TileId> {
        self.captured.iter().map(|c| c.tile.id()).collect()
    }

    /// Origin positions of the captured tiles, in capture order.
    #[must_use]
    pub fn origins(&self) -> Vec<GridPosition> {
        self.captured.iter().map(|c| c.origin).collect()
    }

    /// Accumulated visual offset of the dragged tiles.
    #[must_use]
    pub const fn visual_offset(&self) -> Point { self.visual_offset }

    /// Applies a drag-move delta. Pure visual state; no ownership changes.
    pub fn move_by(&mut self, delta: Point) {
        self.visual_offset.x += delta.x;
        self.visual_offset.y += delta.y;
    }

    /// Commits the drop: new tiles in, old tiles out.
    ///
    /// `destinations` must align one-to-one with the capture order. All
    /// destinations are validated before any insertion, so a failure leaves
    /// the registry exactly as if the drag had been cancelled: every
    /// captured tile is rebuilt Active at its origin.
    ///
    /// On success, each destination receives a brand-new tile (fresh id,
    /// fresh content handle constructed from the captured tile's source
    /// descriptor), and cleanup unconditionally schedules every captured
    /// tile for destruction.
    ///
    /// # Errors
    ///
    /// - [`BoardError::DestinationMismatch`] if the destination count does
    ///   not match the captured count.
    /// - [`BoardError::PositionOccupied`] if a destination holds an
    ///   unrelated Active tile or is duplicated within the batch.
    pub fn complete_drop(
        mut self,
        registry: &mut TileRegistry,
        queue: &mut DestructionQueue,
        destinations: &[GridPosition],
        cycle_id: u64,
    ) -> BoardResult<DropOutcome> {
        self.phase = DragPhase::AwaitingDrop;

        if destinations.len() != self.captured.len() {
            let err = BoardError::DestinationMismatch {
                expected: self.captured.len(),
                got: destinations.len(),
            };
            tracing::warn!(%err, cycle_id, "drop rejected; rolling back");
            restore_to_origins(self.captured, registry, cycle_id);
            return Err(err);
        }

        // Transactional validation. Captured tiles are out of the registry,
        // so their origins are vacant: a destination can only conflict with
        // an unrelated Active tile, or with another destination in this
        // same batch.
        let mut seen: HashSet<GridPosition> = HashSet::with_capacity(destinations.len());
        for &destination in destinations {
            if registry.contains(destination) || !seen.insert(destination) {
                let err = BoardError::PositionOccupied(destination);
                tracing::warn!(%err, cycle_id, "drop rejected; rolling back");
                restore_to_origins(self.captured, registry, cycle_id);
                return Err(err);
            }
        }

        let mut placed = Vec::with_capacity(destinations.len());
        for (captured, &destination) in self.captured.iter().zip(destinations) {
            // Fresh handle from the same source descriptor: the replacement
            // is a distinct object, never the captured original.
            let Some(content) = captured.tile.content().cloned() else {
                tracing::warn!(
                    tile_id = captured.tile.id().value(),
                    cycle_id,
                    "captured tile has no content; skipping destination"
                );
                continue;
            };
            let replacement = Tile::new(destination, content);
            let id = replacement.id();
            if let Err(err) = registry.insert(destination, replacement) {
                // Unreachable after validation; log rather than fault.
                tracing::warn!(%err, cycle_id, "validated destination rejected insert");
                continue;
            }
            placed.push((destination, id));
        }

        self.phase = DragPhase::Cleanup;

        // The critical rule: every captured tile is superseded by the drop,
        // so destruction is unconditional. No membership test against the
        // registry decides this.
        let count = self.captured.len();
        queue.schedule_all(self.captured.into_iter().map(|c| c.tile), cycle_id);
        tracing::debug!(count, cycle_id, "drop committed; originals scheduled for destruction");

        Ok(DropOutcome { placed })
    }

    /// Drops the captured tiles onto the bank: every captured tile is
    /// unconditionally scheduled for destruction, and the content
    /// descriptors are returned so the sources can rejoin the bank.
    #[must_use]
    pub fn complete_drop_to_bank(
        self,
        queue: &mut DestructionQueue,
        cycle_id: u64,
    ) -> Vec<TileContent> {
        let sources: Vec<TileContent> =
            self.captured.iter().filter_map(|c| c.tile.content().cloned()).collect();
        queue.schedule_all(self.captured.into_iter().map(|c| c.tile), cycle_id);
        tracing::debug!(count = sources.len(), cycle_id, "drag released to bank");
        sources
    }

    /// Cancels the drag, restoring an Active tile at every origin.
    ///
    /// No destruction is scheduled: content handles move into the rebuilt
    /// tiles and the emptied shells are discarded.
    pub fn cancel(self, registry: &mut TileRegistry, cycle_id: u64) {
        tracing::debug!(count = self.captured.len(), cycle_id, "drag cancelled");
        restore_to_origins(self.captured, registry, cycle_id);
    }
}

/// Rebuilds Active tiles at the capture origins.
///
/// Used by cancel and by transactional rollback. The captured Dragging
/// shells are never reinserted; their content moves into new tiles, which
/// keeps the lifecycle free of reverse edges.
fn restore_to_origins(
    captured: SmallVec<[CapturedTile; DRAG_BATCH_INLINE_CAP]>,
    registry: &mut TileRegistry,
    cycle_id: u64,
) {
    for mut entry in captured {
        let old_id = entry.tile.id();
        let Some(content) = entry.tile.take_content() else {
            tracing::warn!(tile_id = old_id.value(), cycle_id, "captured tile lost its content");
            continue;
        };
        let restored = Tile::new(entry.origin, content);
        let new_id = restored.id();
        if let Err(err) = registry.insert(entry.origin, restored) {
            // The origin can only be occupied if something was placed there
            // mid-drag. The content is released with the rejected tile.
            tracing::warn!(%err, cycle_id, "could not restore tile to origin");
            continue;
        }
        tracing::debug!(
            old_tile_id = old_id.value(),
            new_tile_id = new_id.value(),
            position = %entry.origin,
            cycle_id,
            "restored tile at origin"
        );
    }
}

// ============================================================================
// Tests
// ============================================================================
