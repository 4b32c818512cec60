//! Integration tests for the board lifecycle.
//!
//! These drive the public `Board` surface through whole cycles, checking
//! the end-to-end behavior of drag/drop batches, cancellation, deferred
//! destruction, and selection pruning.

use tiler::board::{
    Board, BoardError, BoardEvent, GridPosition, Point, SelectionKind, TileContent, TileState,
};

// ============================================================================
// Helpers
// ============================================================================

fn place(col: i32, row: i32, source: &str) -> BoardEvent {
    BoardEvent::PlaceTile {
        position: GridPosition::new(col, row),
        content: TileContent::new(source, None),
    }
}

fn positions(cells: &[(i32, i32)]) -> Vec<GridPosition> {
    cells.iter().map(|&(col, row)| GridPosition::new(col, row)).collect()
}

/// A board with three tiles on row 0 and the selection covering them.
fn board_with_selected_row() -> Board {
    let mut board = Board::new();
    board.run_cycle([
        place(0, 0, "/img/a.png"),
        place(1, 0, "/img/b.png"),
        place(2, 0, "/img/c.png"),
        BoardEvent::SelectAll,
    ]);
    board
}

// ============================================================================
// Drag / Drop Batches
// ============================================================================

#[test]
fn test_batch_drop_replaces_all_tiles() {
    let mut board = board_with_selected_row();
    let old_ids: Vec<_> = board.snapshot().iter().map(|s| s.id).collect();

    let report = board.run_cycle([
        BoardEvent::DragStart { positions: board.selection().positions().to_vec() },
        BoardEvent::DragMove { delta: Point::new(60.0, 120.0) },
        BoardEvent::Drop { destinations: positions(&[(0, 2), (1, 2), (2, 2)]) },
    ]);

    assert!(report.errors.is_empty());
    assert_eq!(report.destroyed, 3, "all originals destroyed at cycle end");
    assert_eq!(board.tile_count(), 3);

    let snapshot = board.snapshot();
    for entry in &snapshot {
        assert_eq!(entry.state, TileState::Active);
        assert_eq!(entry.position.row, 2);
        assert!(entry.visible);
        assert!(!old_ids.contains(&entry.id), "replacements carry fresh ids");
    }
}

#[test]
fn test_drop_carries_content_to_destination() {
    let mut board = board_with_selected_row();
    board.run_cycle([
        BoardEvent::DragStart { positions: positions(&[(1, 0)]) },
        BoardEvent::Drop { destinations: positions(&[(5, 5)]) },
    ]);

    let moved = board.registry().get(GridPosition::new(5, 5)).unwrap();
    assert_eq!(moved.source(), Some("/img/b.png"));
    assert!(!board.registry().contains(GridPosition::new(1, 0)));
}

#[test]
fn test_batch_reorder_within_own_cells() {
    // The batch's own origins are legal destinations: a pure reorder.
    let mut board = board_with_selected_row();
    let report = board.run_cycle([
        BoardEvent::DragStart { positions: positions(&[(0, 0), (1, 0), (2, 0)]) },
        BoardEvent::Drop { destinations: positions(&[(2, 0), (0, 0), (1, 0)]) },
    ]);

    assert!(report.errors.is_empty());
    assert_eq!(board.tile_count(), 3);
    let sources: Vec<_> = board
        .registry()
        .iter()
        .filter_map(|(_, tile)| tile.source().map(str::to_owned))
        .collect();
    // Row-major order: cells (0,0), (1,0), (2,0).
    assert_eq!(sources, vec!["/img/b.png", "/img/c.png", "/img/a.png"]);
}

#[test]
fn test_drop_conflict_rolls_back_whole_batch() {
    let mut board = board_with_selected_row();
    board.run_cycle([place(1, 2, "/img/blocker.png")]);

    let report = board.run_cycle([
        BoardEvent::DragStart { positions: positions(&[(0, 0), (1, 0), (2, 0)]) },
        BoardEvent::Drop { destinations: positions(&[(0, 2), (1, 2), (2, 2)]) },
    ]);

    assert_eq!(
        report.errors,
        vec![BoardError::PositionOccupied(GridPosition::new(1, 2))]
    );
    assert_eq!(report.destroyed, 0, "a failed drop must not destroy anything");
    assert_eq!(board.tile_count(), 4);
    for position in positions(&[(0, 0), (1, 0), (2, 0)]) {
        let tile = board.registry().get(position).unwrap();
        assert_eq!(tile.state(), TileState::Active);
        assert!(tile.is_visible());
    }
    assert!(!board.is_dragging(), "failed drop ends the session");
}

#[test]
fn test_cancel_restores_board_without_destruction() {
    let mut board = board_with_selected_row();

    let report = board.run_cycle([
        BoardEvent::DragStart { positions: positions(&[(0, 0), (2, 0)]) },
        BoardEvent::DragMove { delta: Point::new(200.0, 0.0) },
        BoardEvent::DragCancel,
    ]);

    assert_eq!(report.destroyed, 0);
    assert_eq!(board.tile_count(), 3);
    for entry in board.snapshot() {
        assert_eq!(entry.state, TileState::Active);
        assert!(entry.visible);
    }
}

#[test]
fn test_drop_to_bank_destroys_and_returns_sources() {
    let mut board = board_with_selected_row();

    let report = board.run_cycle([
        BoardEvent::DragStart { positions: positions(&[(0, 0), (1, 0)]) },
        BoardEvent::DropToBank,
    ]);

    assert_eq!(report.destroyed, 2);
    assert_eq!(board.tile_count(), 1);
    let sources: Vec<_> = report.bank_returns.iter().map(|c| c.source.as_str()).collect();
    assert_eq!(sources, vec!["/img/a.png", "/img/b.png"]);
}

#[test]
fn test_large_batch_drop_and_recompute() {
    // Fifty tiles in one batch: every original destroyed, every replacement
    // freshly identified, and the rebuilt index visits exactly the new set.
    let mut board = Board::new();
    let setup: Vec<BoardEvent> =
        (0..50).map(|col| place(col, 0, &format!("/img/{col}.png"))).collect();
    board.run_cycle(setup);
    let old_ids: Vec<_> = board.snapshot().iter().map(|s| s.id).collect();

    let origins: Vec<GridPosition> = (0..50).map(|col| GridPosition::new(col, 0)).collect();
    let destinations: Vec<GridPosition> = (0..50).map(|col| GridPosition::new(col, 1)).collect();
    let report = board.run_cycle([
        BoardEvent::SetSelection { positions: origins.clone() },
        BoardEvent::DragStart { positions: origins },
        BoardEvent::Drop { destinations: destinations.clone() },
        BoardEvent::SetViewTransform {
            transform: tiler::board::ViewTransform::new(1.5, 0.0, 0.0),
        },
    ]);

    assert!(report.errors.is_empty());
    assert_eq!(report.destroyed, 50);
    assert_eq!(board.tile_count(), 50);

    let visuals = board.index().visuals();
    assert_eq!(visuals.len(), 50);
    for (visual, expected) in visuals.iter().zip(&destinations) {
        assert_eq!(visual.position, *expected);
        assert!(!old_ids.contains(&visual.tile_id));
        assert!(visual.highlighted, "selection follows the batch to row 1");
    }
}

// ============================================================================
// Deferred Destruction
// ============================================================================

#[test]
fn test_destruction_is_deferred_to_cycle_end() {
    let mut board = board_with_selected_row();

    // Drop and immediately place onto a vacated origin, in the same cycle.
    // The vacated cell is free as soon as the drop commits; the destroyed
    // originals live in the queue until the drain, never in the registry.
    let report = board.run_cycle([
        BoardEvent::DragStart { positions: positions(&[(0, 0)]) },
        BoardEvent::Drop { destinations: positions(&[(0, 5)]) },
        place(0, 0, "/img/new.png"),
    ]);

    assert!(report.errors.is_empty());
    assert_eq!(report.destroyed, 1);
    assert_eq!(board.tile_count(), 4);
}

#[test]
fn test_drain_happens_once_per_schedule() {
    let mut board = board_with_selected_row();
    let report = board.run_cycle([BoardEvent::ClearBoard]);
    assert_eq!(report.destroyed, 3);

    // Nothing left to destroy on the next cycle.
    let report = board.run_cycle(std::iter::empty());
    assert_eq!(report.destroyed, 0);
}

#[test]
fn test_remove_by_source_only_touches_matches() {
    let mut board = Board::new();
    board.run_cycle([
        place(0, 0, "/img/dup.png"),
        place(3, 3, "/img/dup.png"),
        place(1, 1, "/img/other.png"),
    ]);

    let report =
        board.run_cycle([BoardEvent::RemoveTilesBySource { source: "/img/dup.png".into() }]);

    assert_eq!(report.destroyed, 2);
    assert_eq!(board.tile_count(), 1);
    assert!(board.registry().contains(GridPosition::new(1, 1)));
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_selection_prunes_against_registry_every_cycle() {
    let mut board = board_with_selected_row();
    assert_eq!(board.selection().len(), 3);

    board.run_cycle([BoardEvent::RemoveTilesBySource { source: "/img/b.png".into() }]);

    assert_eq!(
        board.selection().positions(),
        positions(&[(0, 0), (2, 0)]).as_slice()
    );
}

#[test]
fn test_selection_follows_dropped_tiles() {
    let mut board = board_with_selected_row();
    board.run_cycle([
        BoardEvent::DragStart { positions: positions(&[(0, 0), (1, 0), (2, 0)]) },
        BoardEvent::Drop { destinations: positions(&[(0, 4), (1, 4), (2, 4)]) },
    ]);

    assert_eq!(
        board.selection().positions(),
        positions(&[(0, 4), (1, 4), (2, 4)]).as_slice()
    );
}

#[test]
fn test_range_selection_then_batch_drag() {
    let mut board = Board::new();
    let mut setup = Vec::new();
    for row in 0..2 {
        for col in 0..2 {
            setup.push(place(col, row, "/img/grid.png"));
        }
    }
    board.run_cycle(setup);

    board.run_cycle([
        BoardEvent::Select { position: GridPosition::new(0, 0), kind: SelectionKind::Single },
        BoardEvent::Select { position: GridPosition::new(1, 1), kind: SelectionKind::Range },
    ]);
    assert_eq!(board.selection().len(), 4);

    let report = board.run_cycle([
        BoardEvent::DragStart { positions: board.selection().positions().to_vec() },
        BoardEvent::Drop {
            destinations: positions(&[(10, 10), (11, 10), (10, 11), (11, 11)]),
        },
    ]);
    assert!(report.errors.is_empty());
    assert_eq!(report.destroyed, 4);
    assert_eq!(board.tile_count(), 4);
}

// ============================================================================
// Placement Index
// ============================================================================

#[test]
fn test_index_reflects_cycle_end_state() {
    let mut board = board_with_selected_row();

    board.run_cycle([
        BoardEvent::DragStart { positions: positions(&[(0, 0)]) },
        BoardEvent::Drop { destinations: positions(&[(7, 7)]) },
    ]);

    let index_positions: Vec<GridPosition> =
        board.index().visuals().iter().map(|v| v.position).collect();
    assert_eq!(
        index_positions,
        positions(&[(1, 0), (2, 0), (7, 7)]),
        "index is rebuilt row-major from the post-drain registry"
    );
}

#[test]
fn test_index_applies_view_transform() {
    let mut board = Board::new();
    board.run_cycle([
        place(1, 0, "/img/a.png"),
        BoardEvent::SetViewTransform {
            transform: tiler::board::ViewTransform::new(2.0, 10.0, 0.0),
        },
    ]);

    let visual = board.index().visuals()[0];
    // col 1 at zoom 2.0 with pan 10: x = 60 * 2 + 10.
    assert!((visual.rect.x - 130.0).abs() < f64::EPSILON);
    assert!((visual.rect.width - 120.0).abs() < f64::EPSILON);
}

// ============================================================================
// Error Recovery
// ============================================================================

#[test]
fn test_cycle_survives_interleaved_failures() {
    let mut board = board_with_selected_row();

    let report = board.run_cycle([
        place(0, 0, "/img/occupied.png"),
        BoardEvent::Drop { destinations: positions(&[(9, 9)]) },
        place(9, 0, "/img/fine.png"),
    ]);

    assert_eq!(report.applied, 1);
    assert_eq!(report.errors.len(), 2);
    assert_eq!(board.tile_count(), 4);
    assert!(board.registry().contains(GridPosition::new(9, 0)));
}

#[test]
fn test_mismatched_destinations_keep_board_intact() {
    let mut board = board_with_selected_row();

    let report = board.run_cycle([
        BoardEvent::DragStart { positions: positions(&[(0, 0), (1, 0)]) },
        BoardEvent::Drop { destinations: positions(&[(5, 5)]) },
    ]);

    assert_eq!(
        report.errors,
        vec![BoardError::DestinationMismatch { expected: 2, got: 1 }]
    );
    assert_eq!(report.destroyed, 0);
    assert_eq!(board.tile_count(), 3);
}
