//! Serializable views of a running game.

use serde::Serialize;

use crate::core::{Field, FieldSnapshot, Piece};
use crate::types::{ControllerId, Coordinate, PieceId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceSnapshot {
    pub id: PieceId,
    pub blocks: Vec<Coordinate>,
    pub pivot: Coordinate,
}

impl PieceSnapshot {
    /// Blocks that no longer exist are skipped.
    pub fn capture(field: &Field, piece: &Piece) -> Self {
        Self {
            id: piece.id(),
            blocks: piece
                .blocks()
                .iter()
                .filter_map(|&b| field.coordinates_of(b))
                .collect(),
            pivot: piece.pivot(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerSnapshot {
    pub id: ControllerId,
    pub piece: Option<PieceSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub tick: u64,
    pub running: bool,
    pub game_over: bool,
    pub score: u32,
    pub lines: u32,
    pub controllers: Vec<ControllerSnapshot>,
    /// Loose pieces produced by line clears, still falling.
    pub fragments: Vec<PieceSnapshot>,
    pub field: FieldSnapshot,
}
