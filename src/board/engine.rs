//! Board engine and cycle loop.
//!
//! The [`Board`] owns every piece of board state and applies events in
//! discrete cycles. One call to [`Board::run_cycle`] applies a batch of
//! events in order, then runs the fixed end-of-cycle sequence:
//!
//! 1. prune the selection against the registry,
//! 2. drain the destruction queue (the only point where content handles
//!    belonging to scheduled tiles are released),
//! 3. rebuild the placement index.
//!
//! An event that fails is logged and recorded in the [`CycleReport`]; it
//! never aborts the cycle, and because failures roll their own mutations
//! back, the remaining events see a consistent board.

use super::destruction::DestructionQueue;
use super::drag::DragSession;
use super::error::{BoardError, BoardResult};
use super::events::{BoardEvent, SelectionKind};
use super::geometry::{GridPosition, ViewTransform};
use super::placement::PositionIndex;
use super::registry::{TileRegistry, TileSnapshot};
use super::selection::SelectionSet;
use super::tile::{Tile, TileContent};

// ============================================================================
// Cycle Report
// ============================================================================

/// What happened during one cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Cycle this report describes.
    pub cycle_id: u64,
    /// Number of events applied successfully.
    pub applied: usize,
    /// Errors from rejected events, in event order.
    pub errors: Vec<BoardError>,
    /// Number of tiles destroyed by the end-of-cycle drain.
    pub destroyed: usize,
    /// Content descriptors released back to the bank this cycle.
    pub bank_returns: Vec<TileContent>,
}

// ============================================================================
// Board
// ============================================================================

/// The board: tile registry, selection, drag state, destruction queue, and
/// placement index, advanced cycle by cycle.
#[derive(Debug, Default)]
pub struct Board {
    registry: TileRegistry,
    queue: DestructionQueue,
    selection: SelectionSet,
    transform: ViewTransform,
    index: PositionIndex,
    session: Option<DragSession>,
    /// Sources released by drop-to-bank, collected until the cycle report.
    pending_bank_returns: Vec<TileContent>,
    cycle_id: u64,
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Cycle counter; increments once per [`Self::run_cycle`].
    #[must_use]
    pub const fn cycle_id(&self) -> u64 { self.cycle_id }

    /// Number of Active tiles on the board.
    #[must_use]
    pub fn tile_count(&self) -> usize { self.registry.len() }

    /// Whether a drag is in flight.
    #[must_use]
    pub const fn is_dragging(&self) -> bool { self.session.is_some() }

    /// The current selection.
    #[must_use]
    pub const fn selection(&self) -> &SelectionSet { &self.selection }

    /// The current view transform.
    #[must_use]
    pub const fn transform(&self) -> ViewTransform { self.transform }

    /// The placement index as of the last completed cycle.
    #[must_use]
    pub const fn index(&self) -> &PositionIndex { &self.index }

    /// The tile registry.
    #[must_use]
    pub const fn registry(&self) -> &TileRegistry { &self.registry }

    /// The in-flight drag session, if any.
    #[must_use]
    pub const fn drag_session(&self) -> Option<&DragSession> { self.session.as_ref() }

    /// Ordered snapshot of the registry.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TileSnapshot> { self.registry.snapshot() }

    /// Applies a batch of events, then runs the end-of-cycle sequence.
    pub fn run_cycle(&mut self, events: impl IntoIterator<Item = BoardEvent>) -> CycleReport {
        let mut report = CycleReport {
            cycle_id: self.cycle_id,
            ..CycleReport::default()
        };

        for event in events {
            let name = event.name();
            match self.apply_event(event) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    tracing::warn!(event = name, %err, cycle_id = self.cycle_id, "event rejected");
                    report.errors.push(err);
                }
            }
        }

        self.selection.prune(&self.registry);
        report.destroyed = self.queue.drain(&self.registry, self.cycle_id);
        self.index.recompute(&self.registry, &self.selection, self.transform);
        report.bank_returns = std::mem::take(&mut self.pending_bank_returns);

        tracing::debug!(
            cycle_id = self.cycle_id,
            applied = report.applied,
            rejected = report.errors.len(),
            destroyed = report.destroyed,
            tiles = self.registry.len(),
            "cycle complete"
        );
        self.cycle_id += 1;
        report
    }

    fn apply_event(&mut self, event: BoardEvent) -> BoardResult<()> {
        match event {
            BoardEvent::DragStart { positions } => self.drag_start(&positions),
            BoardEvent::DragMove { delta } => {
                let session = self.session.as_mut().ok_or(BoardError::NoDragInProgress)?;
                session.move_by(delta);
                Ok(())
            }
            BoardEvent::Drop { destinations } => self.drop_selection(&destinations),
            BoardEvent::DragCancel => {
                let session = self.session.take().ok_or(BoardError::NoDragInProgress)?;
                session.cancel(&mut self.registry, self.cycle_id);
                Ok(())
            }
            BoardEvent::DropToBank => {
                let session = self.session.take().ok_or(BoardError::NoDragInProgress)?;
                let sources = session.complete_drop_to_bank(&mut self.queue, self.cycle_id);
                self.pending_bank_returns.extend(sources);
                Ok(())
            }
            BoardEvent::Select { position, kind } => {
                match kind {
                    SelectionKind::Single => self.selection.select_single(position),
                    SelectionKind::Toggle => self.selection.toggle(position),
                    SelectionKind::Range => self.selection.select_range(position),
                }
                Ok(())
            }
            BoardEvent::SetSelection { positions } => {
                self.selection.replace(&positions);
                Ok(())
            }
            BoardEvent::SelectAll => {
                self.selection.select_all(&self.registry);
                Ok(())
            }
            BoardEvent::ClearSelection => {
                self.selection.clear();
                Ok(())
            }
            BoardEvent::PlaceTile { position, content } => {
                self.registry.insert(position, Tile::new(position, content))?;
                Ok(())
            }
            BoardEvent::RemoveTilesBySource { source } => self.remove_by_source(&source),
            BoardEvent::ClearBoard => {
                self.queue.schedule_all(self.registry.drain_all(), self.cycle_id);
                self.selection.clear();
                Ok(())
            }
            BoardEvent::SetViewTransform { transform } => {
                self.transform = ViewTransform::new(
                    transform.zoom_scale,
                    transform.pan_offset_x,
                    transform.pan_offset_y,
                );
                Ok(())
            }
        }
    }

    fn drag_start(&mut self, positions: &[GridPosition]) -> BoardResult<()> {
        if self.session.is_some() {
            return Err(BoardError::DragInProgress);
        }
        let session = DragSession::begin(&mut self.registry, positions, self.cycle_id)?;
        self.session = Some(session);
        Ok(())
    }

    fn drop_selection(&mut self, destinations: &[GridPosition]) -> BoardResult<()> {
        let session = self.session.take().ok_or(BoardError::NoDragInProgress)?;
        let outcome = session.complete_drop(
            &mut self.registry,
            &mut self.queue,
            destinations,
            self.cycle_id,
        )?;
        // The moved tiles stay selected at their new cells.
        self.selection.clear();
        for (position, _) in outcome.placed {
            self.selection.toggle(position);
        }
        Ok(())
    }

    /// Removes every tile loaded from `source`. Used when a source image is
    /// deleted from the bank.
    fn remove_by_source(&mut self, source: &str) -> BoardResult<()> {
        let positions = self.registry.positions_with_source(source);
        if positions.is_empty() {
            tracing::debug!(source, "no tiles matched source");
            return Ok(());
        }
        for position in positions {
            let tile = self.registry.remove(position)?;
            self.queue.schedule(tile, self.cycle_id);
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
