//! Line clear tests - full rows, removal and regrouping of unsupported terrain

use coop_tetris::core::{Field, FieldSnapshot};
use coop_tetris::types::{Coordinate, Direction};

fn c(x: i32, y: i32) -> Coordinate {
    Coordinate::new(x, y)
}

fn settled_at(field: &mut Field, cells: &[(i32, i32)]) {
    for &(x, y) in cells {
        let id = field.spawn_block(c(x, y)).unwrap();
        field.set_settled(id, true);
    }
}

#[test]
fn test_landing_piece_completes_bottom_row() {
    let mut field = Field::with_size(4, 4).unwrap();
    settled_at(&mut field, &[(0, 0), (1, 0), (2, 0)]);
    let block = field.spawn_block(c(3, 1)).unwrap();
    let mut piece = field.assemble_piece(vec![block], c(3, 1));

    assert!(field.collision().try_move_piece(&mut piece, Direction::Down));
    assert!(!field.collision().try_move_piece(&mut piece, Direction::Down));
    field.settle_piece(&piece);

    assert_eq!(field.grid().full_rows(), vec![0]);
    let full = field.line_clearer().find_full_lines();
    assert_eq!(full.len(), 4);
    assert!(full.contains(&block));

    let removed = field.line_clearer().remove(&full);
    assert_eq!(removed, 4);
    assert!(field.grid().row(0).unwrap().iter().all(Option::is_none));
    assert_eq!(field.grid().occupied_count(), 0);
    assert_eq!(field.block_count(), 0);
}

#[test]
fn test_no_full_rows() {
    let mut field = Field::with_size(4, 4).unwrap();
    settled_at(&mut field, &[(0, 0), (1, 0), (3, 0)]);

    assert!(field.line_clearer().find_full_lines().is_empty());
    let outcome = field.line_clearer().clear_full_lines();
    assert_eq!(outcome.lines_cleared(), 0);
    assert!(outcome.fragments.is_empty());
    assert_eq!(field.block_count(), 3);
}

#[test]
fn test_clear_regroups_everything_above() {
    let mut field = Field::with_size(5, 6).unwrap();
    // Support below the cleared row stays put.
    settled_at(&mut field, &[(0, 0), (4, 0)]);
    settled_at(&mut field, &[(0, 1), (1, 1), (2, 1), (3, 1), (4, 1)]);
    // Two separate clumps above the cleared row.
    settled_at(&mut field, &[(0, 2), (1, 2), (1, 3)]);
    settled_at(&mut field, &[(4, 2), (4, 3), (3, 4)]);
    let settled_above = 6;

    let outcome = field.line_clearer().clear_full_lines();

    assert_eq!(outcome.rows, vec![1]);
    assert_eq!(outcome.removed, 5);
    assert!(field.grid().row(1).unwrap().iter().all(Option::is_none));

    let regrouped: usize = outcome.fragments.iter().map(|p| p.len()).sum();
    assert_eq!(regrouped, settled_above);
    // (3, 4) only touches the right clump diagonally, so it is its own fragment.
    assert_eq!(outcome.fragments.len(), 3);
    for piece in &outcome.fragments {
        for &b in piece.blocks() {
            assert_eq!(field.is_settled(b), Some(false));
        }
    }

    // Row-major discovery: left clump first, its pivot on its first block.
    assert_eq!(outcome.fragments[0].len(), 3);
    assert_eq!(outcome.fragments[0].pivot(), c(0, 2));
    assert_eq!(outcome.fragments[1].pivot(), c(4, 2));
    assert_eq!(outcome.fragments[2].pivot(), c(3, 4));

    // Terrain below the cut is untouched.
    assert_eq!(field.settled_count(), 2);
    assert!(field.is_consistent());
}

#[test]
fn test_multiple_rows_use_lowest_cutoff() {
    let mut field = Field::with_size(3, 5).unwrap();
    settled_at(&mut field, &[(0, 0), (1, 0), (2, 0)]);
    settled_at(&mut field, &[(1, 1)]);
    settled_at(&mut field, &[(0, 2), (1, 2), (2, 2)]);
    settled_at(&mut field, &[(2, 3)]);

    let outcome = field.line_clearer().clear_full_lines();

    assert_eq!(outcome.rows, vec![0, 2]);
    assert_eq!(outcome.removed, 6);
    // Both leftovers are above the lowest cleared row.
    assert_eq!(outcome.fragments.len(), 2);
    assert_eq!(field.settled_count(), 0);

    let snap = FieldSnapshot::capture(&field);
    assert_eq!(snap.row(3), Some("..@"));
    assert_eq!(snap.row(1), Some(".@."));
}

#[test]
fn test_regrouped_fragments_fall() {
    let mut field = Field::with_size(3, 4).unwrap();
    settled_at(&mut field, &[(0, 0), (1, 0), (2, 0), (1, 1), (1, 2)]);

    let mut outcome = field.line_clearer().clear_full_lines();
    assert_eq!(outcome.fragments.len(), 1);

    let moved = field
        .collision()
        .try_move_many(&mut outcome.fragments, Direction::Down);
    assert_eq!(moved, vec![true]);
    assert_eq!(
        field.piece_coordinates(&outcome.fragments[0]).unwrap(),
        vec![c(1, 0), c(1, 1)]
    );
}
