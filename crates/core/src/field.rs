//! Field module - the block arena behind the grid
//!
//! The field keeps two synchronized views of every block:
//!
//! - the [`Grid`] maps coordinates to block ids (occupancy)
//! - the block table maps block ids to their coordinate and `settled` flag
//!
//! The block table is authoritative for positions, so looking up where a block is
//! never scans the grid. Every mutation goes through this type so both views always
//! agree.
//!
//! The collision engine and the line clearer are views that borrow the field for the
//! duration of an operation (see [`Field::collision`] and [`Field::line_clearer`]).

use std::collections::HashMap;

use log::{debug, warn};

use crate::collision::CollisionEngine;
use crate::config::{FieldConfig, KickOrder};
use crate::error::{ConfigError, GridError};
use crate::grid::Grid;
use crate::lines::LineClearer;
use crate::piece::{shape_template, Piece};
use crate::types::{BlockId, Coordinate, Direction, PieceId, ShapeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub coord: Coordinate,
    /// True once the owning piece has landed and is no longer controlled.
    pub settled: bool,
}

#[derive(Debug, Clone)]
pub struct Field {
    grid: Grid,
    blocks: HashMap<BlockId, Block>,
    kick_order: KickOrder,
    next_block_id: u32,
    next_piece_id: u32,
}

impl Field {
    pub fn new(config: FieldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            grid: Grid::new(config.width, config.height),
            blocks: HashMap::new(),
            kick_order: config.kick_order,
            next_block_id: 0,
            next_piece_id: 0,
        })
    }

    /// Field of the given size with the default kick order.
    pub fn with_size(width: i32, height: i32) -> Result<Self, ConfigError> {
        Self::new(FieldConfig::with_size(width, height))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn kick_order(&self) -> &[Direction] {
        &self.kick_order
    }

    pub fn collision(&mut self) -> CollisionEngine<'_> {
        CollisionEngine::new(self)
    }

    pub fn line_clearer(&mut self) -> LineClearer<'_> {
        LineClearer::new(self)
    }

    // ---- queries ----

    pub fn occupant_at(&self, coord: Coordinate) -> Result<Option<BlockId>, GridError> {
        self.grid.occupant_at(coord)
    }

    pub fn coordinates_of(&self, block: BlockId) -> Option<Coordinate> {
        self.blocks.get(&block).map(|b| b.coord)
    }

    /// `None` for blocks that no longer exist.
    pub fn is_settled(&self, block: BlockId) -> Option<bool> {
        self.blocks.get(&block).map(|b| b.settled)
    }

    pub fn contains(&self, block: BlockId) -> bool {
        self.blocks.contains_key(&block)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn settled_count(&self) -> usize {
        self.blocks.values().filter(|b| b.settled).count()
    }

    /// Coordinates of every block of `piece`, in piece order. `None` if any block is gone.
    pub fn piece_coordinates(&self, piece: &Piece) -> Option<Vec<Coordinate>> {
        piece
            .blocks()
            .iter()
            .map(|&b| self.coordinates_of(b))
            .collect()
    }

    // ---- creation ----

    fn allocate_block_id(&mut self) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;
        id
    }

    pub fn allocate_piece_id(&mut self) -> PieceId {
        let id = PieceId(self.next_piece_id);
        self.next_piece_id += 1;
        id
    }

    /// Create a single unsettled block at `coord`.
    pub fn spawn_block(&mut self, coord: Coordinate) -> Result<BlockId, GridError> {
        if let Some(existing) = self.grid.occupant_at(coord)? {
            return Err(GridError::CellOccupied {
                coord,
                occupant: existing,
            });
        }
        let id = self.allocate_block_id();
        self.grid.place(coord, id)?;
        self.blocks.insert(
            id,
            Block {
                coord,
                settled: false,
            },
        );
        Ok(id)
    }

    /// Group existing blocks into a new piece with a fresh id.
    pub fn assemble_piece(&mut self, blocks: Vec<BlockId>, pivot: Coordinate) -> Piece {
        debug_assert!(blocks.iter().all(|b| self.contains(*b)));
        let id = self.allocate_piece_id();
        Piece::new(id, blocks, pivot)
    }

    /// Spawn a shape hanging from the top row, centred on `origin_x`.
    ///
    /// All four cells are checked before any block is created: on error the field is
    /// untouched. `CellOccupied` signals a spawn collision (game over for the caller).
    pub fn spawn_piece(&mut self, shape: ShapeKind, origin_x: i32) -> Result<Piece, GridError> {
        let template = shape_template(shape);
        let origin = Coordinate::new(origin_x, self.height() - 1);

        for offset in template.cells {
            let coord = origin + offset;
            if let Some(occupant) = self.grid.occupant_at(coord)? {
                warn!("spawn of {:?} at x={} blocked at {}", shape, origin_x, coord);
                return Err(GridError::CellOccupied { coord, occupant });
            }
        }

        let mut blocks = Vec::with_capacity(template.cells.len());
        for offset in template.cells {
            blocks.push(self.spawn_block(origin + offset)?);
        }
        let piece = self.assemble_piece(blocks, origin + template.pivot);
        debug!("spawned {} as {:?} at x={}", piece.id(), shape, origin_x);
        Ok(piece)
    }

    // ---- state changes ----

    pub fn set_settled(&mut self, block: BlockId, settled: bool) -> bool {
        match self.blocks.get_mut(&block) {
            Some(b) => {
                b.settled = settled;
                true
            }
            None => false,
        }
    }

    /// Mark every live block of `piece` as settled terrain.
    pub fn settle_piece(&mut self, piece: &Piece) {
        for &block in piece.blocks() {
            self.set_settled(block, true);
        }
        debug!("{} settled with {} blocks", piece.id(), piece.len());
    }

    /// Drop references to destroyed blocks. Returns false if nothing is left.
    pub fn prune_piece(&self, piece: &mut Piece) -> bool {
        piece.retain_blocks(|b| self.blocks.contains_key(b));
        !piece.is_empty()
    }

    /// Remove a block from both views. Returns its last coordinate.
    pub fn destroy_block(&mut self, block: BlockId) -> Option<Coordinate> {
        let removed = self.blocks.remove(&block)?;
        self.grid.clear(removed.coord);
        Some(removed.coord)
    }

    /// Move blocks to new coordinates in two passes: every source cell is cleared
    /// before any destination is written, so chains of blocks moving into each
    /// other's cells never clobber one another.
    ///
    /// Callers must have proven every destination free (or vacated by this batch).
    pub(crate) fn relocate(&mut self, moves: &[(BlockId, Coordinate)]) {
        for (block, _) in moves {
            if let Some(b) = self.blocks.get(block) {
                self.grid.clear(b.coord);
            }
        }
        for &(block, dest) in moves {
            if let Some(b) = self.blocks.get_mut(&block) {
                b.coord = dest;
                self.grid.put(dest, block);
            }
        }
    }

    /// Check that both views agree. Intended for tests and debug assertions.
    pub fn is_consistent(&self) -> bool {
        let grid_ok = self
            .grid
            .occupied()
            .all(|(coord, id)| self.coordinates_of(id) == Some(coord));
        let blocks_ok = self
            .blocks
            .iter()
            .all(|(&id, b)| self.grid.occupant_at(b.coord) == Ok(Some(id)));
        grid_ok && blocks_ok && self.grid.occupied_count() == self.blocks.len()
    }
}
