//! Image bank: the ordered pool of source images available for placement.
//!
//! The bank stores source paths, deduplicated and in import order, plus its
//! own selection (by index, with the same single/toggle/range gestures the
//! board selection supports). It never owns tiles; placing a bank entry on
//! the board constructs a fresh content handle from the stored path.

use smallvec::SmallVec;

use crate::board::TileContent;
use crate::constants::SELECTION_INLINE_CAP;

// ============================================================================
// Image Bank
// ============================================================================

/// Ordered, deduplicated pool of importable source images.
#[derive(Debug, Default)]
pub struct ImageBank {
    paths: Vec<String>,
    selected: SmallVec<[usize; SELECTION_INLINE_CAP]>,
    anchor: Option<usize>,
}

impl ImageBank {
    /// Creates an empty bank.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Number of images in the bank.
    #[must_use]
    pub fn len(&self) -> usize { self.paths.len() }

    /// Returns whether the bank is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.paths.is_empty() }

    /// Image paths in import order.
    #[must_use]
    pub fn paths(&self) -> &[String] { &self.paths }

    /// Returns whether `path` is already in the bank.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool { self.paths.iter().any(|p| p == path) }

    /// Index of `path` in the bank, if present.
    #[must_use]
    pub fn index_of(&self, path: &str) -> Option<usize> {
        self.paths.iter().position(|p| p == path)
    }

    /// Path at `index`, if in range.
    #[must_use]
    pub fn path_at(&self, index: usize) -> Option<&str> {
        self.paths.get(index).map(String::as_str)
    }

    /// Builds a content handle for the entry at `index`.
    #[must_use]
    pub fn content_at(&self, index: usize) -> Option<TileContent> {
        self.paths.get(index).map(|path| TileContent::new(path.clone(), Some(index)))
    }

    /// Adds one path. Duplicates are ignored; returns whether it was added.
    pub fn add(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.contains(&path) {
            tracing::debug!(%path, "bank already holds source");
            return false;
        }
        self.paths.push(path);
        true
    }

    /// Adds many paths, skipping duplicates. Returns how many were added.
    pub fn import(&mut self, paths: impl IntoIterator<Item = String>) -> usize {
        let added = paths.into_iter().filter(|p| self.add(p.clone())).count();
        tracing::debug!(added, total = self.paths.len(), "bank import");
        added
    }

    /// Removes a path from the bank. Selection indices past the removed
    /// entry shift down with the remaining paths. Returns whether the path
    /// was present.
    pub fn remove(&mut self, path: &str) -> bool {
        let Some(index) = self.index_of(path) else {
            return false;
        };
        self.paths.remove(index);
        self.selected.retain(|i| *i != index);
        for selected in &mut self.selected {
            if *selected > index {
                *selected -= 1;
            }
        }
        self.anchor = match self.anchor {
            Some(a) if a == index => None,
            Some(a) if a > index => Some(a - 1),
            other => other,
        };
        tracing::debug!(%path, "bank removed source");
        true
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Selected indices, in selection order.
    #[must_use]
    pub fn selected_indices(&self) -> &[usize] { &self.selected }

    /// Selected paths, in selection order.
    #[must_use]
    pub fn selected_paths(&self) -> Vec<&str> {
        self.selected.iter().filter_map(|&i| self.path_at(i)).collect()
    }

    /// Replaces the selection with a single index and anchors there.
    pub fn select_single(&mut self, index: usize) {
        if index >= self.paths.len() {
            return;
        }
        self.selected.clear();
        self.selected.push(index);
        self.anchor = Some(index);
    }

    /// Toggles an index in or out of the selection.
    pub fn toggle(&mut self, index: usize) {
        if index >= self.paths.len() {
            return;
        }
        if let Some(at) = self.selected.iter().position(|&i| i == index) {
            self.selected.remove(at);
            if self.anchor == Some(index) {
                self.anchor = None;
            }
        } else {
            self.selected.push(index);
            self.anchor = Some(index);
        }
    }

    /// Extends the selection from the anchor to `index`. With no anchor,
    /// behaves like [`Self::select_single`].
    pub fn select_range(&mut self, index: usize) {
        if index >= self.paths.len() {
            return;
        }
        let Some(anchor) = self.anchor else {
            self.select_single(index);
            return;
        };
        let (lo, hi) = if anchor <= index { (anchor, index) } else { (index, anchor) };
        for i in lo..=hi {
            if !self.selected.contains(&i) {
                self.selected.push(i);
            }
        }
    }

    /// Selects every entry.
    pub fn select_all(&mut self) {
        self.selected.clear();
        self.selected.extend(0..self.paths.len());
        self.anchor = if self.paths.is_empty() { None } else { Some(0) };
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bank_with(count: usize) -> ImageBank {
        let mut bank = ImageBank::new();
        bank.import((0..count).map(|i| format!("/img/{i}.png")));
        bank
    }

    #[test]
    fn test_import_skips_duplicates() {
        let mut bank = bank_with(2);
        let added = bank.import(vec!["/img/0.png".into(), "/img/9.png".into()]);
        assert_eq!(added, 1);
        assert_eq!(bank.len(), 3);
    }

    #[test]
    fn test_content_at_records_bank_index() {
        let bank = bank_with(3);
        let content = bank.content_at(2).unwrap();
        assert_eq!(content.source, "/img/2.png");
        assert_eq!(content.bank_index, Some(2));
        assert!(bank.content_at(3).is_none());
    }

    #[test]
    fn test_remove_shifts_selection_indices() {
        let mut bank = bank_with(3);
        bank.toggle(1);
        bank.toggle(2);

        assert!(bank.remove("/img/1.png"));
        // Former index 2 is now index 1; former index 1 is gone.
        assert_eq!(bank.selected_indices(), &[1]);
        assert_eq!(bank.selected_paths(), vec!["/img/2.png"]);
    }

    #[test]
    fn test_range_selection_pivots_on_anchor() {
        let mut bank = bank_with(5);
        bank.select_single(3);
        bank.select_range(1);

        let mut selected: Vec<usize> = bank.selected_indices().to_vec();
        selected.sort_unstable();
        assert_eq!(selected, vec![1, 2, 3]);
    }

    #[test]
    fn test_out_of_range_selection_is_ignored() {
        let mut bank = bank_with(2);
        bank.select_single(7);
        assert!(bank.selected_indices().is_empty());
    }

    #[test]
    fn test_select_all_and_clear() {
        let mut bank = bank_with(3);
        bank.select_all();
        assert_eq!(bank.selected_indices(), &[0, 1, 2]);
        bank.clear_selection();
        assert!(bank.selected_indices().is_empty());
    }
}
