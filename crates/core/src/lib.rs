//! Core collision module - pure, deterministic, and testable
//!
//! This crate owns the single source of truth for the shared playfield: which cell holds
//! which block, where every block is, and which blocks still fall. It has **no
//! dependencies** on timing, input or rendering.
//!
//! # Module Structure
//!
//! - [`grid`]: width x height occupancy store (coordinate -> block id)
//! - [`field`]: block arena keeping the grid and per-block coordinates in sync
//! - [`piece`]: block groups with a rotation pivot, plus the spawn shape table
//! - [`collision`]: single/group translation and rotation with wall kicks
//! - [`lines`]: full-row removal and flood-fill regrouping of unsupported terrain
//! - [`rng`]: deterministic 7-bag shape selection
//! - [`config`]: field size and kick order
//!
//! # Example
//!
//! ```
//! use coop_tetris_core::Field;
//! use coop_tetris_types::{Direction, ShapeKind};
//!
//! let mut field = Field::with_size(10, 12).unwrap();
//! let mut a = field.spawn_piece(ShapeKind::T, 2).unwrap();
//! let b = field.spawn_piece(ShapeKind::O, 6).unwrap();
//!
//! assert!(field.collision().try_move_piece(&mut a, Direction::Down));
//! assert!(field.collision().try_rotate(&mut a, 90.0));
//!
//! let mut group = vec![a, b];
//! let moved = field.collision().try_move_many(&mut group, Direction::Down);
//! assert_eq!(moved, vec![true, true]);
//!
//! assert!(field.line_clearer().find_full_lines().is_empty());
//! ```

pub mod collision;
pub mod config;
pub mod error;
pub mod field;
pub mod grid;
pub mod lines;
pub mod piece;
pub mod rng;
pub mod snapshot;

pub use coop_tetris_types as types;

// Re-export commonly used types for convenience
pub use collision::{resolve_simultaneous, CollisionEngine};
pub use config::{FieldConfig, KickOrder, DEFAULT_KICK_ORDER};
pub use error::{ConfigError, GridError};
pub use field::{Block, Field};
pub use grid::Grid;
pub use lines::{ClearOutcome, LineClearer};
pub use piece::{shape_template, Piece, ShapeTemplate};
pub use rng::{ShapeBag, SimpleRng};
pub use snapshot::FieldSnapshot;
