//! Constants shared across the Tiler core.

/// Edge length of a grid cell in canvas pixels at zoom 1.0.
pub const CELL_SIZE: f64 = 60.0;

/// Default number of grid rows for a new project.
pub const GRID_ROWS: u32 = 20;

/// Default number of grid columns for a new project.
pub const GRID_COLUMNS: u32 = 20;

/// Width used for bank thumbnails, in pixels.
pub const THUMBNAIL_WIDTH: u32 = 85;

/// Minimum zoom scale accepted from zoom events.
pub const MIN_ZOOM: f64 = 0.1;

/// Maximum zoom scale accepted from zoom events.
pub const MAX_ZOOM: f64 = 8.0;

/// Inline capacity for selections.
///
/// Most selections involve a handful of tiles; batches larger than this
/// spill to the heap.
pub const SELECTION_INLINE_CAP: usize = 16;

/// Inline capacity for captured tiles in a drag session.
pub const DRAG_BATCH_INLINE_CAP: usize = 16;
