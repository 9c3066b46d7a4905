//! Grid module - occupancy store for the shared playfield
//!
//! The grid maps every coordinate to at most one block id. It is pure data: it knows
//! nothing about pieces, settling or gravity.
//! Uses a flat row-major vector (`y * width + x`) for cache locality.
//! Coordinates: (x, y) where x grows to the right and y grows upwards; row 0 is the floor.

use crate::error::GridError;
use crate::types::{BlockId, Coordinate, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Option<BlockId>>,
}

impl Grid {
    /// Create a new empty grid. Dimensions are validated by `FieldConfig`.
    pub fn new(width: i32, height: i32) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self {
            width,
            height,
            cells: vec![None; (width.max(0) as usize) * (height.max(0) as usize)],
        }
    }

    #[inline(always)]
    fn index(&self, coord: Coordinate) -> Option<usize> {
        if !self.in_bounds(coord) {
            return None;
        }
        Some((coord.y as usize) * (self.width as usize) + (coord.x as usize))
    }

    fn out_of_bounds(&self, coord: Coordinate) -> GridError {
        GridError::OutOfBounds {
            coord,
            width: self.width,
            height: self.height,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, coord: Coordinate) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    /// Occupant at `coord`, or `OutOfBounds` if the coordinate lies outside the grid.
    pub fn occupant_at(&self, coord: Coordinate) -> Result<Option<BlockId>, GridError> {
        self.index(coord)
            .map(|idx| self.cells[idx])
            .ok_or_else(|| self.out_of_bounds(coord))
    }

    /// Record `occupant` at `coord`.
    ///
    /// Fails with `CellOccupied` if a different occupant already holds the cell.
    /// Placing an occupant onto its own cell is a no-op.
    pub fn place(&mut self, coord: Coordinate, occupant: BlockId) -> Result<(), GridError> {
        let idx = self.index(coord).ok_or_else(|| self.out_of_bounds(coord))?;
        match self.cells[idx] {
            Some(existing) if existing != occupant => Err(GridError::CellOccupied {
                coord,
                occupant: existing,
            }),
            _ => {
                self.cells[idx] = Some(occupant);
                Ok(())
            }
        }
    }

    /// Remove whatever occupies `coord`. No-op for empty or out-of-bounds cells.
    pub fn clear(&mut self, coord: Coordinate) {
        if let Some(idx) = self.index(coord) {
            self.cells[idx] = None;
        }
    }

    /// Overwrite a cell without the occupancy check. Commit paths only: the caller has
    /// already proven the destination free.
    pub(crate) fn put(&mut self, coord: Coordinate, occupant: BlockId) {
        let idx = self.index(coord);
        debug_assert!(idx.is_some(), "commit outside the grid at {coord}");
        if let Some(idx) = idx {
            debug_assert!(
                self.cells[idx].is_none(),
                "commit overwrote an occupied cell at {coord}"
            );
            self.cells[idx] = Some(occupant);
        }
    }

    /// True iff `coord` sits on the boundary edge facing `direction`.
    pub fn is_wall_adjacent(&self, coord: Coordinate, direction: Direction) -> bool {
        match direction {
            Direction::Left => coord.x == 0,
            Direction::Right => coord.x == self.width - 1,
            Direction::Down => coord.y == 0,
            Direction::Up => coord.y == self.height - 1,
            Direction::None => false,
        }
    }

    pub fn is_row_full(&self, y: i32) -> bool {
        self.row(y)
            .map(|row| row.iter().all(Option::is_some))
            .unwrap_or(false)
    }

    /// Indices of every completely occupied row, scanned from the floor upwards.
    pub fn full_rows(&self) -> Vec<i32> {
        (0..self.height).filter(|&y| self.is_row_full(y)).collect()
    }

    pub fn row(&self, y: i32) -> Option<&[Option<BlockId>]> {
        if y < 0 || y >= self.height {
            return None;
        }
        let start = (y as usize) * (self.width as usize);
        Some(&self.cells[start..start + self.width as usize])
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Iterate occupied cells in row-major order (floor first).
    pub fn occupied(&self) -> impl Iterator<Item = (Coordinate, BlockId)> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.map(|id| {
                (
                    Coordinate::new((idx % width) as i32, (idx / width) as i32),
                    id,
                )
            })
        })
    }
}
