//! Error types for the occupancy layer and configuration.
//!
//! Rejected moves and rotations are not errors: they are reported as `false` by the
//! collision engine. Only caller mistakes (`OutOfBounds`) and spawn collisions
//! (`CellOccupied`) surface as `GridError`.

use thiserror::Error;

use crate::types::{BlockId, Coordinate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("coordinate {coord} lies outside the {width}x{height} grid")]
    OutOfBounds {
        coord: Coordinate,
        width: i32,
        height: i32,
    },
    #[error("cell {coord} is already held by {occupant}")]
    CellOccupied { coord: Coordinate, occupant: BlockId },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("field size {width}x{height} is invalid (dimensions must be positive and at most {max} cells)", max = crate::config::MAX_FIELD_CELLS)]
    InvalidSize { width: i32, height: i32 },
    #[error("kick order must contain at least one candidate shift")]
    EmptyKickOrder,
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}
