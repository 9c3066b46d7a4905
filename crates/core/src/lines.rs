//! Line clearing and fragment regrouping
//!
//! Clearing a row does not shift the rows above it. Blocks above a cleared row lose
//! their support and are regrouped into new pieces that fall under gravity like any
//! other piece until they settle again.
//!
//! Regrouping is a flood fill (4-neighbour, breadth-first) restricted to the settled
//! blocks at or above the cutoff row; each connected component becomes one piece.

use std::collections::{HashSet, VecDeque};

use log::debug;

use crate::field::Field;
use crate::piece::Piece;
use crate::types::{BlockId, Coordinate, Direction};

/// Mutating view over a [`Field`]. Borrowed per operation via [`Field::line_clearer`].
pub struct LineClearer<'a> {
    field: &'a mut Field,
}

/// Result of a full clear pass.
#[derive(Debug, Clone, Default)]
pub struct ClearOutcome {
    /// Cleared row indices, floor first.
    pub rows: Vec<i32>,
    /// Number of blocks destroyed.
    pub removed: usize,
    /// New falling pieces built from the unsupported terrain.
    pub fragments: Vec<Piece>,
}

impl ClearOutcome {
    pub fn lines_cleared(&self) -> usize {
        self.rows.len()
    }
}

impl<'a> LineClearer<'a> {
    pub fn new(field: &'a mut Field) -> Self {
        Self { field }
    }

    /// Every block of every completely occupied row, floor first.
    pub fn find_full_lines(&self) -> Vec<BlockId> {
        let grid = self.field.grid();
        grid.full_rows()
            .into_iter()
            .filter_map(|y| grid.row(y))
            .flat_map(|row| row.iter().flatten().copied())
            .collect()
    }

    /// Destroy the given blocks. Ids that are already gone are skipped.
    /// Returns how many blocks were actually removed.
    pub fn remove(&mut self, blocks: &[BlockId]) -> usize {
        blocks
            .iter()
            .filter(|&&b| self.field.destroy_block(b).is_some())
            .count()
    }

    /// Regroup every settled block with `y >= cutoff_row` into falling pieces, one per
    /// connected component. Regrouped blocks are no longer settled. Each piece's pivot
    /// is the coordinate of its first block.
    pub fn regroup_above(&mut self, cutoff_row: i32) -> Vec<Piece> {
        let grid = self.field.grid();
        let start = cutoff_row.max(0);

        // Row-major scan keeps the output deterministic.
        let mut order = Vec::new();
        for y in start..grid.height() {
            for x in 0..grid.width() {
                if let Ok(Some(id)) = grid.occupant_at(Coordinate::new(x, y)) {
                    if self.field.is_settled(id) == Some(true) {
                        order.push(id);
                    }
                }
            }
        }
        let candidates: HashSet<BlockId> = order.iter().copied().collect();

        let mut assigned: HashSet<BlockId> = HashSet::with_capacity(candidates.len());
        let mut components: Vec<Vec<BlockId>> = Vec::new();
        for &seed in &order {
            if assigned.insert(seed) {
                components.push(self.flood(seed, &candidates, &mut assigned));
            }
        }

        let mut fragments = Vec::with_capacity(components.len());
        for blocks in components {
            for &b in &blocks {
                self.field.set_settled(b, false);
            }
            let Some(pivot) = blocks.first().and_then(|&b| self.field.coordinates_of(b)) else {
                continue;
            };
            fragments.push(self.field.assemble_piece(blocks, pivot));
        }

        debug!(
            "regrouped {} blocks above row {} into {} fragments",
            candidates.len(),
            cutoff_row,
            fragments.len()
        );
        fragments
    }

    /// Find, remove and regroup in one pass. The cutoff for regrouping is the lowest
    /// cleared row. Returns an empty outcome when no row is full.
    pub fn clear_full_lines(&mut self) -> ClearOutcome {
        let rows = self.field.grid().full_rows();
        let Some(&lowest) = rows.first() else {
            return ClearOutcome::default();
        };

        let doomed = self.find_full_lines();
        let removed = self.remove(&doomed);
        let fragments = self.regroup_above(lowest);
        debug!("cleared rows {:?} ({} blocks)", rows, removed);

        ClearOutcome {
            rows,
            removed,
            fragments,
        }
    }

    /// Breadth-first connected component of `seed` within `candidates`. `seed` must
    /// already be in `assigned`.
    fn flood(
        &self,
        seed: BlockId,
        candidates: &HashSet<BlockId>,
        assigned: &mut HashSet<BlockId>,
    ) -> Vec<BlockId> {
        let grid = self.field.grid();
        let mut component = vec![seed];
        let mut queue = VecDeque::from([seed]);

        while let Some(current) = queue.pop_front() {
            let Some(coord) = self.field.coordinates_of(current) else {
                continue;
            };
            for direction in Direction::CARDINAL {
                if grid.is_wall_adjacent(coord, direction) {
                    continue;
                }
                let Ok(Some(neighbour)) = grid.occupant_at(coord.step(direction)) else {
                    continue;
                };
                if candidates.contains(&neighbour) && assigned.insert(neighbour) {
                    component.push(neighbour);
                    queue.push_back(neighbour);
                }
            }
        }
        component
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terrain(field: &mut Field, cells: &[(i32, i32)]) -> Vec<BlockId> {
        cells
            .iter()
            .map(|&(x, y)| {
                let id = field.spawn_block(Coordinate::new(x, y)).unwrap();
                field.set_settled(id, true);
                id
            })
            .collect()
    }

    #[test]
    fn test_find_full_lines_lists_every_block_of_full_rows() {
        let mut field = Field::with_size(3, 3).unwrap();
        let bottom = terrain(&mut field, &[(0, 0), (1, 0), (2, 0)]);
        terrain(&mut field, &[(0, 1), (2, 1)]);

        let found = field.line_clearer().find_full_lines();
        assert_eq!(found, bottom);
    }

    #[test]
    fn test_find_full_lines_includes_unsettled_blocks() {
        let mut field = Field::with_size(2, 2).unwrap();
        terrain(&mut field, &[(0, 0)]);
        let falling = field.spawn_block(Coordinate::new(1, 0)).unwrap();

        assert!(field.line_clearer().find_full_lines().contains(&falling));
    }

    #[test]
    fn test_remove_skips_missing_blocks() {
        let mut field = Field::with_size(3, 3).unwrap();
        let ids = terrain(&mut field, &[(0, 0), (1, 0)]);

        assert_eq!(field.line_clearer().remove(&ids), 2);
        assert_eq!(field.line_clearer().remove(&ids), 0);
        assert_eq!(field.block_count(), 0);
        assert!(field.is_consistent());
    }

    #[test]
    fn test_regroup_splits_disconnected_components() {
        let mut field = Field::with_size(5, 5).unwrap();
        // Two blobs above row 1 and one block below the cutoff.
        terrain(&mut field, &[(0, 2), (0, 3), (1, 3)]);
        terrain(&mut field, &[(3, 2), (4, 2)]);
        let below = terrain(&mut field, &[(2, 0)]);

        let fragments = field.line_clearer().regroup_above(1);
        let mut sizes: Vec<_> = fragments.iter().map(Piece::len).collect();
        sizes.sort();
        assert_eq!(sizes, vec![2, 3]);

        for piece in &fragments {
            for &b in piece.blocks() {
                assert_eq!(field.is_settled(b), Some(false));
            }
            let first = piece.blocks()[0];
            assert_eq!(field.coordinates_of(first), Some(piece.pivot()));
        }
        assert_eq!(field.is_settled(below[0]), Some(true));
    }

    #[test]
    fn test_regroup_ignores_unsettled_blocks() {
        let mut field = Field::with_size(4, 4).unwrap();
        terrain(&mut field, &[(1, 2)]);
        // A controlled block touching the terrain must not be absorbed.
        let live = field.spawn_block(Coordinate::new(2, 2)).unwrap();

        let fragments = field.line_clearer().regroup_above(0);
        assert_eq!(fragments.len(), 1);
        assert!(!fragments[0].contains(live));
        assert_eq!(field.is_settled(live), Some(false));
    }

    #[test]
    fn test_regroup_diagonal_is_not_connected() {
        let mut field = Field::with_size(4, 4).unwrap();
        terrain(&mut field, &[(0, 1), (1, 2)]);
        assert_eq!(field.line_clearer().regroup_above(0).len(), 2);
    }

    #[test]
    fn test_clear_full_lines_without_full_rows() {
        let mut field = Field::with_size(3, 3).unwrap();
        terrain(&mut field, &[(0, 0), (1, 0)]);

        let outcome = field.line_clearer().clear_full_lines();
        assert_eq!(outcome.lines_cleared(), 0);
        assert_eq!(outcome.removed, 0);
        assert!(outcome.fragments.is_empty());
        assert_eq!(field.block_count(), 2);
    }

    #[test]
    fn test_clear_full_lines_uses_lowest_row_as_cutoff() {
        let mut field = Field::with_size(2, 5).unwrap();
        terrain(&mut field, &[(0, 1), (1, 1), (0, 3), (1, 3)]);
        terrain(&mut field, &[(0, 2), (1, 4), (0, 0)]);

        let outcome = field.line_clearer().clear_full_lines();
        assert_eq!(outcome.rows, vec![1, 3]);
        assert_eq!(outcome.removed, 4);
        // (0,2) and (1,4) are isolated after the clear; (0,0) is below the cutoff.
        assert_eq!(outcome.fragments.len(), 2);
        assert_eq!(field.block_count(), 3);
        assert_eq!(field.settled_count(), 1);
    }
}
