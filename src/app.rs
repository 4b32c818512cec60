//! Application facade.
//!
//! [`TilerApp`] ties the board engine to the image bank and project
//! persistence. It is the surface a UI layer talks to: it forwards events
//! into board cycles, routes drop-to-bank returns back into the bank, and
//! translates bank deletions into board removals.

use std::path::Path;

use crate::bank::ImageBank;
use crate::board::{Board, BoardEvent, CycleReport, GridPosition};
use crate::error::{TilerError, TilerResult};
use crate::project::{ProjectDocument, ProjectResult};

// ============================================================================
// App
// ============================================================================

/// The application: one board, one bank.
#[derive(Debug, Default)]
pub struct TilerApp {
    board: Board,
    bank: ImageBank,
}

impl TilerApp {
    /// Creates an app with an empty board and bank.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// The board.
    #[must_use]
    pub const fn board(&self) -> &Board { &self.board }

    /// The image bank.
    #[must_use]
    pub const fn bank(&self) -> &ImageBank { &self.bank }

    /// Mutable access to the bank, for selection gestures.
    pub fn bank_mut(&mut self) -> &mut ImageBank { &mut self.bank }

    /// Imports image paths into the bank. Returns how many were new.
    pub fn import_images(&mut self, paths: impl IntoIterator<Item = String>) -> usize {
        self.bank.import(paths)
    }

    /// Runs one board cycle over `events`, feeding any sources released by
    /// drop-to-bank back into the bank.
    pub fn run_cycle(&mut self, events: impl IntoIterator<Item = BoardEvent>) -> CycleReport {
        let report = self.board.run_cycle(events);
        for content in &report.bank_returns {
            self.bank.add(content.source.clone());
        }
        report
    }

    /// Places the bank entry at `index` onto a vacant cell, removing the
    /// source from the bank. On a rejected placement the bank is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// [`TilerError::BankIndexOutOfRange`] for a bad index, or the board's
    /// rejection (occupied cell) from the cycle.
    pub fn place_from_bank(&mut self, index: usize, position: GridPosition) -> TilerResult<()> {
        let content = self
            .bank
            .content_at(index)
            .ok_or(TilerError::BankIndexOutOfRange(index))?;
        let source = content.source.clone();
        let report = self.run_cycle([BoardEvent::PlaceTile { position, content }]);
        match report.errors.into_iter().next() {
            Some(err) => Err(err.into()),
            None => {
                self.bank.remove(&source);
                Ok(())
            }
        }
    }

    /// Deletes the selected bank entries and removes every tile placed from
    /// them. Returns how many bank entries were deleted.
    pub fn delete_selected_sources(&mut self) -> usize {
        let sources: Vec<String> =
            self.bank.selected_paths().into_iter().map(str::to_owned).collect();
        if sources.is_empty() {
            return 0;
        }
        let events: Vec<BoardEvent> = sources
            .iter()
            .map(|source| BoardEvent::RemoveTilesBySource { source: source.clone() })
            .collect();
        self.run_cycle(events);
        let mut deleted = 0;
        for source in &sources {
            if self.bank.remove(source) {
                deleted += 1;
            }
        }
        deleted
    }

    /// Saves the current state as a project file. Returns the path written.
    ///
    /// # Errors
    ///
    /// Propagates persistence failures.
    pub fn save_project(&self, path: impl AsRef<Path>) -> ProjectResult<std::path::PathBuf> {
        ProjectDocument::capture(&self.board, &self.bank).save(path)
    }

    /// Loads a project file, replacing the board and bank contents.
    ///
    /// The board is cleared through a normal cycle first, so tiles from the
    /// previous project go through the ordinary destruction path.
    ///
    /// # Errors
    ///
    /// Propagates persistence failures; the previous state is kept when the
    /// file cannot be read.
    pub fn load_project(&mut self, path: impl AsRef<Path>) -> ProjectResult<()> {
        let document = ProjectDocument::load(path)?;

        self.board.run_cycle([BoardEvent::ClearBoard]);
        self.bank = ImageBank::new();
        self.bank.import(document.bank.image_paths.iter().cloned());

        let mut events: Vec<BoardEvent> = vec![BoardEvent::SetViewTransform {
            transform: document.transform(),
        }];
        for tile in &document.tiles {
            events.push(BoardEvent::PlaceTile {
                position: GridPosition::new(tile.grid_x, tile.grid_y),
                content: crate::board::TileContent::new(
                    tile.file_path.clone(),
                    tile.original_bank_index,
                ),
            });
        }
        for position in document.selected_positions() {
            events.push(BoardEvent::Select {
                position,
                kind: crate::board::SelectionKind::Toggle,
            });
        }
        let report = self.board.run_cycle(events);
        for err in &report.errors {
            tracing::warn!(%err, "project entry skipped");
        }

        for path in &document.ui_state.selected_bank_paths {
            if let Some(index) = self.bank.index_of(path) {
                self.bank.toggle(index);
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
