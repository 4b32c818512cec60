//! Tile registry: exclusive owner of all Active tiles, keyed by position.
//!
//! The registry upholds two invariants that every read path in the crate
//! relies on:
//!
//! 1. every tile reachable through the registry is in state `Active`;
//! 2. a grid position maps to at most one tile.
//!
//! Insertion and removal are the only mutators, and both are logged with the
//! tile id and position. Reads hand out either borrowed references (valid
//! only until the next mutation, enforced by the borrow checker) or owned
//! [`TileSnapshot`] copies that stay valid across later mutations.

use std::collections::BTreeMap;

use serde::Serialize;

use super::error::{BoardError, BoardResult};
use super::geometry::GridPosition;
use super::tile::{Tile, TileId, TileState};

// ============================================================================
// Snapshot View
// ============================================================================

/// Owned copy of one registry entry, taken at snapshot time.
///
/// Registry mutations after the snapshot cannot invalidate it; consumers
/// iterate the copy, never live registry storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileSnapshot {
    /// The tile's id.
    pub id: TileId,
    /// The position the tile occupied at snapshot time.
    pub position: GridPosition,
    /// Lifecycle state at snapshot time.
    pub state: TileState,
    /// Render visibility at snapshot time.
    pub visible: bool,
}

// ============================================================================
// Registry
// ============================================================================

/// Mapping from grid position to the Active tile occupying it.
///
/// `BTreeMap` keeps snapshots and iteration in deterministic row-major
/// order.
#[derive(Debug, Default)]
pub struct TileRegistry {
    tiles: BTreeMap<GridPosition, Tile>,
}

impl TileRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self { Self { tiles: BTreeMap::new() } }

    /// Number of tiles currently registered.
    #[must_use]
    pub fn len(&self) -> usize { self.tiles.len() }

    /// Returns whether the registry holds no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.tiles.is_empty() }

    /// Returns whether a position currently holds a tile.
    #[must_use]
    pub fn contains(&self, position: GridPosition) -> bool { self.tiles.contains_key(&position) }

    /// Returns whether any registered tile has the given id.
    ///
    /// Linear scan; only used by destruction-time verification.
    #[must_use]
    pub fn contains_tile(&self, id: TileId) -> bool {
        self.tiles.values().any(|tile| tile.id() == id)
    }

    /// Inserts a tile at a position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::PositionOccupied`] if the position already
    /// holds a tile; the rejected tile is dropped and its content released.
    /// Callers that need to keep the tile on conflict check occupancy first.
    pub fn insert(&mut self, position: GridPosition, mut tile: Tile) -> BoardResult<()> {
        // Invariant 1: only Active tiles live in the registry. All
        // construction paths hand us Active tiles; anything else is a bug.
        debug_assert_eq!(tile.state(), TileState::Active);

        if self.tiles.contains_key(&position) {
            return Err(BoardError::PositionOccupied(position));
        }

        tile.set_position(position);
        tracing::debug!(
            tile_id = tile.id().value(),
            position = %position,
            "registry insert"
        );
        self.tiles.insert(position, tile);
        Ok(())
    }

    /// Removes and returns the tile at a position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] if the position is empty.
    pub fn remove(&mut self, position: GridPosition) -> BoardResult<Tile> {
        let tile = self.tiles.remove(&position).ok_or(BoardError::NotFound(position))?;
        tracing::debug!(
            tile_id = tile.id().value(),
            position = %position,
            "registry remove"
        );
        Ok(tile)
    }

    /// Borrows the tile at a position.
    #[must_use]
    pub fn get(&self, position: GridPosition) -> Option<&Tile> { self.tiles.get(&position) }

    /// Mutably borrows the tile at a position.
    pub fn get_mut(&mut self, position: GridPosition) -> Option<&mut Tile> {
        self.tiles.get_mut(&position)
    }

    /// Iterates registered tiles in row-major position order.
    pub fn iter(&self) -> impl Iterator<Item = (&GridPosition, &Tile)> { self.tiles.iter() }

    /// Takes an ordered, owned snapshot of the registry.
    ///
    /// The snapshot reflects state at call time; mutating the registry
    /// afterwards does not affect it.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TileSnapshot> {
        self.tiles
            .iter()
            .map(|(&position, tile)| TileSnapshot {
                id: tile.id(),
                position,
                state: tile.state(),
                visible: tile.is_visible(),
            })
            .collect()
    }

    /// Positions of all tiles whose content was loaded from `source`.
    ///
    /// Tiles whose content handle was already taken never match.
    #[must_use]
    pub fn positions_with_source(&self, source: &str) -> Vec<GridPosition> {
        self.tiles
            .iter()
            .filter(|(_, tile)| tile.source() == Some(source))
            .map(|(&position, _)| position)
            .collect()
    }

    /// Removes every tile, returning them in row-major order.
    pub fn drain_all(&mut self) -> Vec<Tile> {
        let drained: Vec<Tile> = std::mem::take(&mut self.tiles).into_values().collect();
        for tile in &drained {
            tracing::debug!(tile_id = tile.id().value(), "registry remove (clear)");
        }
        drained
    }
}

// ============================================================================
// Tests
// ============================================================================
