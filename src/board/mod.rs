//! Tile board core: registry, selection, drag transactions, and deferred
//! destruction.
//!
//! # Architecture
//!
//! State advances in cycles. Input arrives as [`BoardEvent`] values, the
//! [`Board`] applies them in order, and a fixed end-of-cycle sequence prunes
//! the selection, drains the destruction queue, and rebuilds the placement
//! index. Nothing outside a cycle mutates board state.
//!
//! # Ownership
//!
//! Exactly one container owns each tile at any moment:
//!
//! - [`TileRegistry`] owns Active tiles, keyed by [`GridPosition`];
//! - [`DragSession`] owns captured (Dragging) tiles for the life of the
//!   drag transaction;
//! - [`DestructionQueue`] owns scheduled (`PendingDestruction`) tiles until
//!   the end-of-cycle drain drops them.
//!
//! Everything else ([`SelectionSet`], [`PositionIndex`], events) holds
//! positions and ids, never tiles, and re-resolves them against the
//! registry on use.
//!
//! # Lifecycle
//!
//! ```text
//! Active ──► Dragging ──► PendingDestruction ──► Destroyed
//!    └──────────────────────────┘
//! ```
//!
//! Transitions are monotonic. Cancelling a drag does not walk backwards:
//! the captured content moves into brand-new Active tiles and the emptied
//! shells are discarded. A successful drop likewise constructs brand-new
//! tiles at the destinations and unconditionally schedules every captured
//! tile, so destruction never depends on comparing old tiles against the
//! registry.

pub mod destruction;
pub mod drag;
pub mod engine;
pub mod error;
pub mod events;
pub mod geometry;
pub mod placement;
pub mod registry;
pub mod selection;
pub mod tile;

pub use destruction::DestructionQueue;
pub use drag::{DragPhase, DragSession, DropOutcome};
pub use engine::{Board, CycleReport};
pub use error::{BoardError, BoardResult};
pub use events::{BoardEvent, SelectionKind};
pub use geometry::{GridPosition, Point, Rect, ViewTransform};
pub use placement::{PositionIndex, TileVisual};
pub use registry::{TileRegistry, TileSnapshot};
pub use selection::SelectionSet;
pub use tile::{Tile, TileContent, TileId, TileState};
