//! Render placement index.
//!
//! The [`PositionIndex`] is the board's view model: a flat, row-major list
//! of [`TileVisual`] entries derived from the registry, the selection, and
//! the view transform. It is rebuilt from scratch at the end of every cycle
//! rather than patched incrementally, so it can never disagree with the
//! registry about which tiles exist. Entries hold ids and positions only;
//! the index never owns tiles.

use serde::Serialize;

use super::geometry::{GridPosition, Point, Rect, ViewTransform};
use super::registry::TileRegistry;
use super::selection::SelectionSet;
use super::tile::TileId;

// ============================================================================
// Visuals
// ============================================================================

/// Everything the rendering layer needs to draw one tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TileVisual {
    /// Identity of the tile being drawn.
    pub tile_id: TileId,
    /// Grid cell the tile occupies.
    pub position: GridPosition,
    /// On-screen rectangle under the current view transform.
    pub rect: Rect,
    /// Whether the tile is drawn at all (captured tiles are hidden).
    pub visible: bool,
    /// Whether the tile carries the selection highlight.
    pub highlighted: bool,
}

/// The rebuilt-per-cycle placement index.
#[derive(Debug, Default)]
pub struct PositionIndex {
    visuals: Vec<TileVisual>,
}

impl PositionIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Visuals in row-major order.
    #[must_use]
    pub fn visuals(&self) -> &[TileVisual] { &self.visuals }

    /// Number of placed visuals.
    #[must_use]
    pub fn len(&self) -> usize { self.visuals.len() }

    /// Returns whether the index holds no visuals.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.visuals.is_empty() }

    /// Rebuilds the index from current board state.
    ///
    /// Iterates the registry in key order, so the output is deterministic
    /// for a given board state.
    pub fn recompute(
        &mut self,
        registry: &TileRegistry,
        selection: &SelectionSet,
        transform: ViewTransform,
    ) {
        self.visuals.clear();
        self.visuals.reserve(registry.len());
        for (&position, tile) in registry.iter() {
            self.visuals.push(TileVisual {
                tile_id: tile.id(),
                position,
                rect: transform.cell_rect(position),
                visible: tile.is_visible(),
                highlighted: selection.contains(position),
            });
        }
        tracing::trace!(count = self.visuals.len(), "placement index rebuilt");
    }

    /// Hit-tests a screen point against the placed visuals.
    ///
    /// Only visible tiles participate; a hidden (mid-drag) tile's cell
    /// reads as empty.
    #[must_use]
    pub fn visual_at(&self, point: Point) -> Option<&TileVisual> {
        self.visuals.iter().find(|v| v.visible && v.rect.contains(point))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tile::{Tile, TileContent};

    fn registry_with(positions: &[GridPosition]) -> TileRegistry {
        let mut registry = TileRegistry::new();
        for &position in positions {
            let tile = Tile::new(position, TileContent::new("/img/a.png", None));
            registry.insert(position, tile).unwrap();
        }
        registry
    }

    #[test]
    fn test_recompute_is_row_major() {
        let registry = registry_with(&[
            GridPosition::new(2, 1),
            GridPosition::new(0, 0),
            GridPosition::new(1, 1),
        ]);
        let mut index = PositionIndex::new();
        index.recompute(&registry, &SelectionSet::new(), ViewTransform::default());

        let positions: Vec<GridPosition> = index.visuals().iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![
            GridPosition::new(0, 0),
            GridPosition::new(1, 1),
            GridPosition::new(2, 1),
        ]);
    }

    #[test]
    fn test_recompute_marks_selection() {
        let selected = GridPosition::new(1, 0);
        let registry = registry_with(&[GridPosition::new(0, 0), selected]);
        let mut selection = SelectionSet::new();
        selection.select_single(selected);

        let mut index = PositionIndex::new();
        index.recompute(&registry, &selection, ViewTransform::default());

        let highlighted: Vec<GridPosition> = index
            .visuals()
            .iter()
            .filter(|v| v.highlighted)
            .map(|v| v.position)
            .collect();
        assert_eq!(highlighted, vec![selected]);
    }

    #[test]
    fn test_recompute_replaces_previous_contents() {
        let registry = registry_with(&[GridPosition::new(0, 0)]);
        let mut index = PositionIndex::new();
        index.recompute(&registry, &SelectionSet::new(), ViewTransform::default());
        assert_eq!(index.len(), 1);

        index.recompute(&TileRegistry::new(), &SelectionSet::new(), ViewTransform::default());
        assert!(index.is_empty());
    }

    #[test]
    fn test_hit_test_skips_hidden_tiles() {
        let position = GridPosition::new(0, 0);
        let mut registry = registry_with(&[position]);
        let mut index = PositionIndex::new();
        let transform = ViewTransform::default();

        index.recompute(&registry, &SelectionSet::new(), transform);
        let center = Point::new(30.0, 30.0);
        assert!(index.visual_at(center).is_some());

        registry.get_mut(position).unwrap().set_visible(false);
        index.recompute(&registry, &SelectionSet::new(), transform);
        assert!(index.visual_at(center).is_none());
    }
}
