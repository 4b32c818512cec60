//! Grid selection tracking.
//!
//! The selection never owns tiles. It holds only [`GridPosition`] keys and
//! re-resolves them against the registry on every use, so a stale entry can
//! at worst select nothing. [`SelectionSet::prune`] drops positions the
//! registry no longer holds; the board runs it after every mutation that
//! removes tiles.

use smallvec::SmallVec;

use super::geometry::GridPosition;
use super::registry::TileRegistry;
use crate::constants::SELECTION_INLINE_CAP;

// ============================================================================
// Selection Set
// ============================================================================

/// An insertion-ordered set of selected grid positions.
///
/// Insertion order matters: it is the capture order of a drag batch and the
/// alignment order of its drop destinations.
#[derive(Debug, Default)]
pub struct SelectionSet {
    positions: SmallVec<[GridPosition; SELECTION_INLINE_CAP]>,
    /// Anchor of the last single selection, for range extension.
    anchor: Option<GridPosition>,
}

impl SelectionSet {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Number of selected positions.
    #[must_use]
    pub fn len(&self) -> usize { self.positions.len() }

    /// Returns whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.positions.is_empty() }

    /// Returns whether `position` is selected.
    #[must_use]
    pub fn contains(&self, position: GridPosition) -> bool {
        self.positions.contains(&position)
    }

    /// Selected positions in insertion order.
    #[must_use]
    pub fn positions(&self) -> &[GridPosition] { &self.positions }

    /// Replaces the selection with a single position and anchors there.
    pub fn select_single(&mut self, position: GridPosition) {
        self.positions.clear();
        self.positions.push(position);
        self.anchor = Some(position);
    }

    /// Toggles a position in or out of the selection. Toggling in moves the
    /// anchor; toggling the anchor out clears it.
    pub fn toggle(&mut self, position: GridPosition) {
        if let Some(index) = self.positions.iter().position(|&p| p == position) {
            self.positions.remove(index);
            if self.anchor == Some(position) {
                self.anchor = None;
            }
        } else {
            self.positions.push(position);
            self.anchor = Some(position);
        }
    }

    /// Extends the selection with the rectangular range spanned by the
    /// anchor and `position`. With no anchor, behaves like
    /// [`Self::select_single`]. The anchor itself does not move, so
    /// successive range extensions pivot around the same corner.
    pub fn select_range(&mut self, position: GridPosition) {
        let Some(anchor) = self.anchor else {
            self.select_single(position);
            return;
        };
        let (col_lo, col_hi) = minmax(anchor.col, position.col);
        let (row_lo, row_hi) = minmax(anchor.row, position.row);
        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                let candidate = GridPosition::new(col, row);
                if !self.positions.contains(&candidate) {
                    self.positions.push(candidate);
                }
            }
        }
    }

    /// Replaces the selection with an explicit ordered set of positions,
    /// deduplicated, anchoring at the last one.
    pub fn replace(&mut self, positions: &[GridPosition]) {
        self.positions.clear();
        for &position in positions {
            if !self.positions.contains(&position) {
                self.positions.push(position);
            }
        }
        self.anchor = self.positions.last().copied();
    }

    /// Selects every occupied position, in registry (row-major) order.
    pub fn select_all(&mut self, registry: &TileRegistry) {
        self.positions.clear();
        self.positions.extend(registry.iter().map(|(&position, _)| position));
        self.anchor = self.positions.first().copied();
    }

    /// Clears the selection and anchor.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.anchor = None;
    }

    /// Drops every selected position the registry no longer holds a tile
    /// at. Returns the number of positions removed.
    pub fn prune(&mut self, registry: &TileRegistry) -> usize {
        let before = self.positions.len();
        self.positions.retain(|position| registry.contains(*position));
        if let Some(anchor) = self.anchor {
            if !registry.contains(anchor) {
                self.anchor = None;
            }
        }
        let removed = before - self.positions.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = self.positions.len(), "selection pruned");
        }
        removed
    }
}

const fn minmax(a: i32, b: i32) -> (i32, i32) {
    if a <= b { (a, b) } else { (b, a) }
}

// ============================================================================
// Tests
// ============================================================================
