//! Snapshot module - text picture of the field for logs and tests

use serde::Serialize;

use crate::field::Field;
use crate::types::Coordinate;

/// Cell marker for empty cells in [`FieldSnapshot::rows`].
pub const EMPTY_CELL: char = '.';
/// Cell marker for settled terrain.
pub const SETTLED_CELL: char = '#';
/// Cell marker for blocks that are still falling.
pub const FALLING_CELL: char = '@';

/// Serializable picture of the field. Rows are listed top first so the text reads the
/// way the playfield looks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSnapshot {
    pub width: i32,
    pub height: i32,
    pub blocks: usize,
    pub rows: Vec<String>,
}

impl FieldSnapshot {
    pub fn capture(field: &Field) -> Self {
        let grid = field.grid();
        let rows = (0..grid.height())
            .rev()
            .map(|y| {
                (0..grid.width())
                    .map(|x| match grid.occupant_at(Coordinate::new(x, y)) {
                        Ok(Some(id)) if field.is_settled(id) == Some(true) => SETTLED_CELL,
                        Ok(Some(_)) => FALLING_CELL,
                        _ => EMPTY_CELL,
                    })
                    .collect()
            })
            .collect();

        Self {
            width: grid.width(),
            height: grid.height(),
            blocks: field.block_count(),
            rows,
        }
    }

    /// Row `y` (floor = 0) as text.
    pub fn row(&self, y: i32) -> Option<&str> {
        if y < 0 || y >= self.height {
            return None;
        }
        self.rows
            .get((self.height - 1 - y) as usize)
            .map(String::as_str)
    }
}
