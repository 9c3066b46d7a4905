//! Collision engine - legality checks and atomic commits
//!
//! Every movement and rotation on the shared playfield goes through here:
//!
//! - [`CollisionEngine::try_move_single`]: one loose block
//! - [`CollisionEngine::try_move_piece`]: one piece, all-or-nothing
//! - [`CollisionEngine::try_move_many`]: several pieces at once, with partial failure
//! - [`CollisionEngine::try_rotate`]: rotation about the pivot with a kick search
//!
//! A rejected request is reported as `false` and leaves the field untouched.
//!
//! # Simultaneous moves
//!
//! When several pieces move in the same step, a piece may move into a cell that
//! another piece of the group is vacating. Checking each piece alone would block such
//! chains, so the group is resolved as a fixed point: pieces blocked by a wall or by a
//! block outside the group are removed, and the remaining pieces are checked again
//! until a round produces no new failure. Only that final set is committed.
//!
//! [`resolve_simultaneous`] is the pure part of that computation and can be tested
//! without mutating anything.

use std::collections::HashSet;

use log::debug;

use crate::field::Field;
use crate::piece::Piece;
use crate::types::{BlockId, Coordinate, Direction};

/// Mutating view over a [`Field`]. Borrowed per operation via [`Field::collision`].
pub struct CollisionEngine<'a> {
    field: &'a mut Field,
}

impl<'a> CollisionEngine<'a> {
    pub fn new(field: &'a mut Field) -> Self {
        Self { field }
    }

    /// Move one block a single cell. Legal iff it is not against the wall in
    /// `direction` and the neighbouring cell is empty.
    pub fn try_move_single(&mut self, block: BlockId, direction: Direction) -> bool {
        let Some(coord) = self.field.coordinates_of(block) else {
            return false;
        };
        if self.field.grid().is_wall_adjacent(coord, direction) {
            return false;
        }
        let dest = coord.step(direction);
        match self.field.occupant_at(dest) {
            Ok(None) => {}
            Ok(Some(other)) if other == block => {}
            _ => return false,
        }
        self.field.relocate(&[(block, dest)]);
        true
    }

    /// Translate a piece by one cell. Blocks of the same piece never obstruct each
    /// other; a wall or any foreign block rejects the whole move.
    pub fn try_move_piece(&mut self, piece: &mut Piece, direction: Direction) -> bool {
        if !can_translate(self.field, piece, direction, |b| piece.contains(b)) {
            return false;
        }
        self.commit_translation(std::slice::from_mut(piece), &[0], direction);
        true
    }

    /// Move several pieces simultaneously.
    ///
    /// Returns one flag per input piece, in input order: `true` for pieces that moved.
    /// Pieces may follow each other into vacated cells. A piece blocked by a wall or a
    /// block outside the moving set stays put, and may in turn block others.
    pub fn try_move_many(&mut self, pieces: &mut [Piece], direction: Direction) -> Vec<bool> {
        let moved = resolve_simultaneous(self.field, pieces, direction);
        let movers: Vec<usize> = moved
            .iter()
            .enumerate()
            .filter_map(|(i, &ok)| ok.then_some(i))
            .collect();
        if !movers.is_empty() {
            self.commit_translation(pieces, &movers, direction);
        }
        debug!(
            "group move {:?}: {}/{} pieces moved",
            direction,
            movers.len(),
            pieces.len()
        );
        moved
    }

    /// Rotate a piece by `theta_degrees` about its pivot.
    ///
    /// Coordinates are rotated with the standard 2-D formulas and rounded to the
    /// nearest cell. If the result collides or leaves the grid, each shift of the
    /// field's kick order is tried in turn; the first one that fits wins and the pivot
    /// moves with it. Returns false (and mutates nothing) when no candidate fits, or
    /// when rounding maps two blocks onto the same cell (possible for angles that are not a
    /// multiple of 90 degrees).
    pub fn try_rotate(&mut self, piece: &mut Piece, theta_degrees: f64) -> bool {
        let Some(rotated) = rotated_cells(self.field, piece, theta_degrees) else {
            return false;
        };
        let distinct: HashSet<Coordinate> = rotated.iter().map(|&(_, dest)| dest).collect();
        if distinct.len() != rotated.len() {
            debug!(
                "{} rotation by {} folds blocks together",
                piece.id(),
                theta_degrees
            );
            return false;
        }

        let field: &Field = self.field;
        let kick = field.kick_order().iter().copied().find(|&shift| {
            let offset = shift.offset();
            rotated
                .iter()
                .all(|&(_, dest)| is_free_for(field, piece, dest + offset))
        });

        let Some(shift) = kick else {
            debug!("{} rotation by {} rejected", piece.id(), theta_degrees);
            return false;
        };

        let offset = shift.offset();
        piece.translate_pivot(offset);
        let moves: Vec<(BlockId, Coordinate)> = rotated
            .into_iter()
            .map(|(block, dest)| (block, dest + offset))
            .collect();
        self.field.relocate(&moves);
        if shift != Direction::None {
            debug!("{} rotated with {:?} kick", piece.id(), shift);
        }
        true
    }

    fn commit_translation(&mut self, pieces: &mut [Piece], movers: &[usize], direction: Direction) {
        let offset = direction.offset();
        let mut moves = Vec::new();
        for &i in movers {
            for &block in pieces[i].blocks() {
                if let Some(coord) = self.field.coordinates_of(block) {
                    moves.push((block, coord + offset));
                }
            }
        }
        self.field.relocate(&moves);
        for &i in movers {
            pieces[i].translate_pivot(offset);
        }
    }
}

/// Pure part of [`CollisionEngine::try_move_many`]: which pieces of the group can move.
///
/// Nothing is mutated. The result has one flag per piece, in input order.
pub fn resolve_simultaneous(field: &Field, pieces: &[Piece], direction: Direction) -> Vec<bool> {
    let candidates: Vec<usize> = (0..pieces.len()).collect();
    let movers = movable_subset(field, pieces, candidates, direction);

    let mut result = vec![false; pieces.len()];
    for i in movers {
        result[i] = true;
    }
    result
}

/// Partition refinement over the candidate set. Each round drops every piece blocked
/// by a wall or by a block that belongs to no remaining candidate; the recursion stops
/// when a round drops nothing (everyone left moves) or nobody is left.
fn movable_subset(
    field: &Field,
    pieces: &[Piece],
    candidates: Vec<usize>,
    direction: Direction,
) -> Vec<usize> {
    let members: HashSet<BlockId> = candidates
        .iter()
        .flat_map(|&i| pieces[i].blocks().iter().copied())
        .collect();

    let (clear, blocked): (Vec<usize>, Vec<usize>) = candidates
        .into_iter()
        .partition(|&i| can_translate(field, &pieces[i], direction, |b| members.contains(&b)));

    if blocked.is_empty() || clear.is_empty() {
        return clear;
    }
    movable_subset(field, pieces, clear, direction)
}

/// Per-block legality for a translation. `passable` says which occupants will be out
/// of the way by commit time (the piece itself, or the whole moving group).
fn can_translate(
    field: &Field,
    piece: &Piece,
    direction: Direction,
    passable: impl Fn(BlockId) -> bool,
) -> bool {
    let grid = field.grid();
    piece.blocks().iter().all(|&block| {
        let Some(coord) = field.coordinates_of(block) else {
            return false;
        };
        if grid.is_wall_adjacent(coord, direction) {
            return false;
        }
        match grid.occupant_at(coord.step(direction)) {
            Ok(None) => true,
            Ok(Some(other)) => passable(other),
            Err(_) => false,
        }
    })
}

/// Rotated destination of every block of `piece`. `None` if the piece references a
/// block that no longer exists.
fn rotated_cells(
    field: &Field,
    piece: &Piece,
    theta_degrees: f64,
) -> Option<Vec<(BlockId, Coordinate)>> {
    let (sin, cos) = theta_degrees.to_radians().sin_cos();
    let pivot = piece.pivot();

    piece
        .blocks()
        .iter()
        .map(|&block| {
            let d = field.coordinates_of(block)? - pivot;
            let (dx, dy) = (d.x as f64, d.y as f64);
            let x = (dx * cos - dy * sin).round() as i32;
            let y = (dy * cos + dx * sin).round() as i32;
            Some((block, pivot + Coordinate::new(x, y)))
        })
        .collect()
}

/// A destination cell is usable if it is inside the grid and either empty or held by
/// a block of the same piece.
fn is_free_for(field: &Field, piece: &Piece, coord: Coordinate) -> bool {
    match field.occupant_at(coord) {
        Ok(None) => true,
        Ok(Some(occupant)) => piece.contains(occupant),
        Err(_) => false,
    }
}
