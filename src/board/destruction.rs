//! Deferred tile destruction.
//!
//! Destruction is split into two phases:
//!
//! 1. [`DestructionQueue::schedule`] runs synchronously inside the event
//!    handler that decided to destroy the tile. It transitions the tile to
//!    `PendingDestruction` immediately, so every later read in the same
//!    cycle (selection pruning, placement recomputation) already sees the
//!    tile as off-limits.
//! 2. [`DestructionQueue::drain`] runs once per cycle, after all events for
//!    that cycle have been handled. It releases the content handle and
//!    transitions the tile to `Destroyed`.
//!
//! The split exists because the events that trigger destruction can arrive
//! in the same batch as events that still read tile state. Scheduling is
//! unconditional for tiles superseded by a drop: whether an "equal looking"
//! tile sits in the registry is irrelevant, because replacement tiles are
//! distinct objects. Membership in the queue, not any value comparison, is
//! the authoritative do-not-touch signal.

use std::collections::HashSet;

use super::registry::TileRegistry;
use super::tile::{Tile, TileId, TileState};

/// Queue of superseded tiles awaiting resource release.
///
/// Owns the tiles outright: once a tile is scheduled, nothing else in the
/// system can reach it except through the id membership test.
#[derive(Debug, Default)]
pub struct DestructionQueue {
    queue: Vec<Tile>,
    pending_ids: HashSet<TileId>,
}

impl DestructionQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Number of tiles awaiting destruction.
    #[must_use]
    pub fn len(&self) -> usize { self.queue.len() }

    /// Returns whether no tiles are awaiting destruction.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.queue.is_empty() }

    /// Returns whether the tile id is scheduled and not yet drained.
    #[must_use]
    pub fn is_pending(&self, id: TileId) -> bool { self.pending_ids.contains(&id) }

    /// Iterates the queued tiles.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> { self.queue.iter() }

    /// Schedules a tile for destruction.
    ///
    /// Synchronously transitions it to `PendingDestruction`; the actual
    /// content release happens at the next [`Self::drain`]. Idempotent:
    /// scheduling a tile that is already pending or destroyed is a logged
    /// no-op (the duplicate shell is dropped), never an error.
    ///
    /// Returns `true` if the tile was newly enqueued.
    pub fn schedule(&mut self, mut tile: Tile, cycle_id: u64) -> bool {
        let id = tile.id();
        if self.pending_ids.contains(&id) || tile.state() == TileState::Destroyed {
            tracing::debug!(
                tile_id = id.value(),
                state = tile.state().name(),
                cycle_id,
                "destruction already scheduled; ignoring"
            );
            return false;
        }

        // A tile handed to us in PendingDestruction was marked by an earlier
        // schedule whose enqueue we never saw; adopt it without a transition.
        if tile.state() != TileState::PendingDestruction {
            tile.transition(TileState::PendingDestruction, cycle_id);
        }

        self.pending_ids.insert(id);
        self.queue.push(tile);
        true
    }

    /// Schedules every tile in the batch.
    pub fn schedule_all(&mut self, tiles: impl IntoIterator<Item = Tile>, cycle_id: u64) {
        for tile in tiles {
            self.schedule(tile, cycle_id);
        }
    }

    /// Releases all queued tiles and transitions them to `Destroyed`.
    ///
    /// Invoked once per processing cycle after all events have been handled.
    /// Draining an empty queue is a no-op, so double-drain is harmless.
    ///
    /// `registry` is only consulted defensively: a queued tile must already
    /// be absent from it, and finding one there is logged as a warning
    /// before releasing anyway.
    ///
    /// Returns the number of tiles released.
    pub fn drain(&mut self, registry: &TileRegistry, cycle_id: u64) -> usize {
        if self.queue.is_empty() {
            return 0;
        }

        let mut released = 0;
        for mut tile in self.queue.drain(..) {
            let id = tile.id();
            if registry.contains_tile(id) {
                tracing::warn!(
                    tile_id = id.value(),
                    cycle_id,
                    "tile scheduled for destruction is still reachable from the registry"
                );
            }

            if let Some(content) = tile.take_content() {
                tracing::debug!(
                    tile_id = id.value(),
                    source = %content.source,
                    cycle_id,
                    "released tile content"
                );
                drop(content);
            }
            tile.transition(TileState::Destroyed, cycle_id);
            self.pending_ids.remove(&id);
            released += 1;
        }
        released
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::geometry::GridPosition;
    use crate::board::tile::TileContent;

    fn make_tile() -> Tile {
        Tile::new(GridPosition::new(0, 0), TileContent::new("/a.png", None))
    }

    #[test]
    fn test_schedule_marks_pending_synchronously() {
        let mut queue = DestructionQueue::new();
        let tile = make_tile();
        let id = tile.id();

        assert!(queue.schedule(tile, 1));

        // Visible to same-cycle readers before any drain.
        assert!(queue.is_pending(id));
        assert_eq!(queue.len(), 1);
        assert!(queue.iter().all(|t| t.state() == TileState::PendingDestruction));
    }

    #[test]
    fn test_drain_releases_and_destroys() {
        let mut queue = DestructionQueue::new();
        let registry = TileRegistry::new();
        let tile = make_tile();
        let id = tile.id();
        queue.schedule(tile, 1);

        let released = queue.drain(&registry, 1);
        assert_eq!(released, 1);
        assert!(queue.is_empty());
        assert!(!queue.is_pending(id));
    }

    #[test]
    fn test_schedule_adopts_premarked_tile() {
        let mut queue = DestructionQueue::new();
        let registry = TileRegistry::new();

        // A tile already marked PendingDestruction is adopted as-is; no
        // second transition, exactly one release on drain.
        let mut tile = make_tile();
        assert!(tile.transition(TileState::PendingDestruction, 1));

        assert!(queue.schedule(tile, 1));
        assert_eq!(queue.drain(&registry, 1), 1);
        assert_eq!(queue.drain(&registry, 2), 0);
    }

    #[test]
    fn test_destroyed_tile_schedule_is_noop() {
        let mut queue = DestructionQueue::new();
        let mut tile = make_tile();
        tile.transition(TileState::PendingDestruction, 1);
        tile.transition(TileState::Destroyed, 1);

        assert!(!queue.schedule(tile, 2));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_double_drain_is_noop() {
        let mut queue = DestructionQueue::new();
        let registry = TileRegistry::new();
        queue.schedule(make_tile(), 1);

        assert_eq!(queue.drain(&registry, 1), 1);
        assert_eq!(queue.drain(&registry, 1), 0);
    }

    #[test]
    fn test_schedule_all() {
        let mut queue = DestructionQueue::new();
        queue.schedule_all(vec![make_tile(), make_tile(), make_tile()], 1);
        assert_eq!(queue.len(), 3);
    }
}
