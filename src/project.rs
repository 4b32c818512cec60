//! Project persistence.
//!
//! A project file is a versioned JSON document holding the grid contents,
//! the view transform, the bank, and the UI selection state. The document
//! is a plain data snapshot: capturing one never moves tiles, and applying
//! one goes through ordinary board events.
//!
//! Sources are stored as paths. On load, entries whose file no longer
//! exists are dropped with a warning rather than failing the whole load.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bank::ImageBank;
use crate::board::{Board, GridPosition, ViewTransform};
use crate::constants::{GRID_COLUMNS, GRID_ROWS};

/// Current project file format version.
pub const PROJECT_VERSION: u32 = 1;

/// File extension for project files.
pub const PROJECT_EXTENSION: &str = "tiler";

// ============================================================================
// Errors
// ============================================================================

/// Result alias for project persistence.
pub type ProjectResult<T> = Result<T, ProjectError>;

/// Errors while saving or loading a project file.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Filesystem failure reading or writing the project file.
    #[error("project io: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid project JSON.
    #[error("malformed project file: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The file was written by an unsupported format version.
    #[error("unsupported project version {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version recorded in the file.
        found: u32,
        /// Version this build reads and writes.
        supported: u32,
    },
}

// ============================================================================
// Document
// ============================================================================

/// Grid dimensions and view transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSection {
    /// Row count of the visible grid.
    pub rows: u32,
    /// Column count of the visible grid.
    pub columns: u32,
    /// Zoom scale of the canvas.
    pub zoom_scale: f64,
    /// Horizontal pan offset.
    pub pan_offset_x: f64,
    /// Vertical pan offset.
    pub pan_offset_y: f64,
}

/// One placed tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    /// Column of the cell.
    pub grid_x: i32,
    /// Row of the cell.
    pub grid_y: i32,
    /// Source image path.
    pub file_path: String,
    /// Bank index the source had when first placed, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_bank_index: Option<usize>,
}

/// The bank contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankSection {
    /// Image paths in import order.
    pub image_paths: Vec<String>,
}

/// Selection state, restored as a convenience.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiStateSection {
    /// Selected grid cells as `[col, row]` pairs.
    pub selected_grid_positions: Vec<[i32; 2]>,
    /// Selected bank paths.
    pub selected_bank_paths: Vec<String>,
}

/// A complete project snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Format version; must equal [`PROJECT_VERSION`] to load.
    pub version: u32,
    /// Grid and view state.
    pub grid: GridSection,
    /// Placed tiles.
    pub tiles: Vec<TileRecord>,
    /// Bank contents.
    pub bank: BankSection,
    /// Selection state.
    pub ui_state: UiStateSection,
}

impl ProjectDocument {
    /// Captures the current board and bank state into a document.
    #[must_use]
    pub fn capture(board: &Board, bank: &ImageBank) -> Self {
        let transform = board.transform();
        let tiles = board
            .registry()
            .iter()
            .filter_map(|(&position, tile)| {
                tile.content().map(|content| TileRecord {
                    grid_x: position.col,
                    grid_y: position.row,
                    file_path: content.source.clone(),
                    original_bank_index: content.bank_index,
                })
            })
            .collect();
        Self {
            version: PROJECT_VERSION,
            grid: GridSection {
                rows: GRID_ROWS,
                columns: GRID_COLUMNS,
                zoom_scale: transform.zoom_scale,
                pan_offset_x: transform.pan_offset_x,
                pan_offset_y: transform.pan_offset_y,
            },
            tiles,
            bank: BankSection { image_paths: bank.paths().to_vec() },
            ui_state: UiStateSection {
                selected_grid_positions: board
                    .selection()
                    .positions()
                    .iter()
                    .map(|p| [p.col, p.row])
                    .collect(),
                selected_bank_paths: bank
                    .selected_paths()
                    .into_iter()
                    .map(str::to_owned)
                    .collect(),
            },
        }
    }

    /// View transform stored in the document, zoom clamped.
    #[must_use]
    pub fn transform(&self) -> ViewTransform {
        ViewTransform::new(self.grid.zoom_scale, self.grid.pan_offset_x, self.grid.pan_offset_y)
    }

    /// Selected grid positions as typed values.
    #[must_use]
    pub fn selected_positions(&self) -> Vec<GridPosition> {
        self.ui_state
            .selected_grid_positions
            .iter()
            .map(|&[col, row]| GridPosition::new(col, row))
            .collect()
    }

    /// Writes the document to `path` as pretty JSON, appending the
    /// project extension when missing. Returns the path written.
    ///
    /// # Errors
    ///
    /// Propagates filesystem and serialization failures.
    pub fn save(&self, path: impl AsRef<Path>) -> ProjectResult<PathBuf> {
        let path = with_extension(path.as_ref());
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        tracing::info!(path = %path.display(), tiles = self.tiles.len(), "project saved");
        Ok(path)
    }

    /// Reads a document from `path`, validating the version and dropping
    /// entries whose source file no longer exists.
    ///
    /// # Errors
    ///
    /// [`ProjectError::UnsupportedVersion`] for a version mismatch, plus
    /// filesystem and parse failures.
    pub fn load(path: impl AsRef<Path>) -> ProjectResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let mut document: Self = serde_json::from_str(&json)?;
        if document.version != PROJECT_VERSION {
            return Err(ProjectError::UnsupportedVersion {
                found: document.version,
                supported: PROJECT_VERSION,
            });
        }
        let dropped = document.prune_missing_sources();
        tracing::info!(
            path = %path.display(),
            tiles = document.tiles.len(),
            dropped,
            "project loaded"
        );
        Ok(document)
    }

    /// Drops tiles and bank entries whose source file does not exist on
    /// disk. Returns how many entries were dropped.
    pub fn prune_missing_sources(&mut self) -> usize {
        let mut dropped = 0;
        self.tiles.retain(|tile| {
            let exists = Path::new(&tile.file_path).exists();
            if !exists {
                tracing::warn!(path = %tile.file_path, "tile source missing; dropped");
                dropped += 1;
            }
            exists
        });
        self.bank.image_paths.retain(|path| {
            let exists = Path::new(path).exists();
            if !exists {
                tracing::warn!(%path, "bank source missing; dropped");
                dropped += 1;
            }
            exists
        });
        dropped
    }
}

fn with_extension(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == PROJECT_EXTENSION) {
        path.to_path_buf()
    } else {
        let mut path = path.to_path_buf();
        path.set_extension(PROJECT_EXTENSION);
        path
    }
}

// ============================================================================
// Tests
// ============================================================================
