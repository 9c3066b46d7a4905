//! Pieces module - movable block groups and the spawn shape table
//!
//! A [`Piece`] is a set of block ids that move as a unit plus a pivot used for
//! rotation. It does not store coordinates: the field owns every block's position,
//! so a piece can never disagree with the grid about where its blocks are.
//!
//! The shape table is static data. Offsets are relative to the spawn origin, which
//! sits on the top row; every shape hangs downwards from there (`dy <= 0`).

use crate::types::{BlockId, Coordinate, PieceId, ShapeKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    blocks: Vec<BlockId>,
    pivot: Coordinate,
}

impl Piece {
    pub fn new(id: PieceId, blocks: Vec<BlockId>, pivot: Coordinate) -> Self {
        Self { id, blocks, pivot }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    pub fn pivot(&self) -> Coordinate {
        self.pivot
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn contains(&self, block: BlockId) -> bool {
        self.blocks.contains(&block)
    }

    pub(crate) fn translate_pivot(&mut self, offset: Coordinate) {
        self.pivot += offset;
    }

    pub(crate) fn retain_blocks(&mut self, keep: impl FnMut(&BlockId) -> bool) {
        self.blocks.retain(keep);
    }
}

/// Cell layout of a spawnable shape, relative to the spawn origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeTemplate {
    pub cells: [Coordinate; 4],
    pub pivot: Coordinate,
}

impl ShapeTemplate {
    /// Horizontal extent `(min_dx, max_dx)` of the cells.
    pub fn x_extent(&self) -> (i32, i32) {
        let mut min_dx = i32::MAX;
        let mut max_dx = i32::MIN;
        for c in self.cells {
            min_dx = min_dx.min(c.x);
            max_dx = max_dx.max(c.x);
        }
        (min_dx, max_dx)
    }
}

const fn c(x: i32, y: i32) -> Coordinate {
    Coordinate::new(x, y)
}

/// Get the spawn layout for a shape kind
pub fn shape_template(kind: ShapeKind) -> ShapeTemplate {
    match kind {
        // ####
        ShapeKind::I => ShapeTemplate {
            cells: [c(-1, 0), c(0, 0), c(1, 0), c(2, 0)],
            pivot: c(0, 0),
        },
        // ##
        // ##
        ShapeKind::O => ShapeTemplate {
            cells: [c(0, 0), c(1, 0), c(0, -1), c(1, -1)],
            pivot: c(0, 0),
        },
        // ###
        //  #
        ShapeKind::T => ShapeTemplate {
            cells: [c(-1, 0), c(0, 0), c(1, 0), c(0, -1)],
            pivot: c(0, 0),
        },
        //  ##
        // ##
        ShapeKind::S => ShapeTemplate {
            cells: [c(0, 0), c(1, 0), c(-1, -1), c(0, -1)],
            pivot: c(0, -1),
        },
        // ##
        //  ##
        ShapeKind::Z => ShapeTemplate {
            cells: [c(-1, 0), c(0, 0), c(0, -1), c(1, -1)],
            pivot: c(0, -1),
        },
        // #
        // ###
        ShapeKind::J => ShapeTemplate {
            cells: [c(-1, 0), c(-1, -1), c(0, -1), c(1, -1)],
            pivot: c(0, -1),
        },
        //   #
        // ###
        ShapeKind::L => ShapeTemplate {
            cells: [c(1, 0), c(-1, -1), c(0, -1), c(1, -1)],
            pivot: c(0, -1),
        },
    }
}
