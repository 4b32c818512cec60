//! Geometric types for the board.
//!
//! `GridPosition` is the registry key: a value-typed cell coordinate with
//! equality, hashing, and a total order (row-major) so that registry
//! snapshots come out in a deterministic reading order. Pixel-space types
//! (`Point`, `Rect`) and the `ViewTransform` are only used to compute tile
//! placement for the rendering layer; the core never makes lifecycle
//! decisions based on them.

use serde::{Deserialize, Serialize};

use crate::constants::{CELL_SIZE, MAX_ZOOM, MIN_ZOOM};

// ============================================================================
// Grid Coordinates
// ============================================================================

/// A cell coordinate on the board.
///
/// Ordered row-major so ordered iteration visits cells in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    /// Column index (may be negative; the canvas is unbounded).
    pub col: i32,
    /// Row index.
    pub row: i32,
}

impl GridPosition {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self { Self { col, row } }

    /// Returns the position shifted by whole cells.
    #[must_use]
    pub const fn offset(self, dcol: i32, drow: i32) -> Self {
        Self {
            col: self.col + dcol,
            row: self.row + drow,
        }
    }
}

impl Ord for GridPosition {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}

impl PartialOrd for GridPosition {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> { Some(self.cmp(other)) }
}

impl std::fmt::Display for GridPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

// ============================================================================
// Pixel-Space Types
// ============================================================================

/// A point (or offset) in canvas pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

/// A rectangle defined by origin point and size, in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the origin (top-left corner).
    pub x: f64,
    /// Y coordinate of the origin (top-left corner).
    pub y: f64,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Returns whether a point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

// ============================================================================
// View Transform
// ============================================================================

/// The zoom/pan state of the canvas viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Zoom scale factor, clamped to [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    pub zoom_scale: f64,
    /// Horizontal pan offset in screen pixels.
    pub pan_offset_x: f64,
    /// Vertical pan offset in screen pixels.
    pub pan_offset_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom_scale: 1.0,
            pan_offset_x: 0.0,
            pan_offset_y: 0.0,
        }
    }
}

impl ViewTransform {
    /// Creates a transform, clamping the zoom scale into the supported range.
    #[must_use]
    pub fn new(zoom_scale: f64, pan_offset_x: f64, pan_offset_y: f64) -> Self {
        Self {
            zoom_scale: zoom_scale.clamp(MIN_ZOOM, MAX_ZOOM),
            pan_offset_x,
            pan_offset_y,
        }
    }

    /// Maps an on-screen point back to the grid cell under it.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn position_at(&self, point: Point) -> GridPosition {
        let size = CELL_SIZE * self.zoom_scale;
        GridPosition::new(
            ((point.x - self.pan_offset_x) / size).floor() as i32,
            ((point.y - self.pan_offset_y) / size).floor() as i32,
        )
    }

    /// Computes the on-screen rectangle of a grid cell under this transform.
    #[must_use]
    pub fn cell_rect(&self, position: GridPosition) -> Rect {
        let size = CELL_SIZE * self.zoom_scale;
        Rect::new(
            f64::from(position.col) * size + self.pan_offset_x,
            f64::from(position.row) * size + self.pan_offset_y,
            size,
            size,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
