//! Game scheduler for the shared playfield
//!
//! The core crate answers "may this move happen?"; this crate decides *when* things
//! happen: which controller gets a piece, in what order commands are applied, when
//! gravity pulls everything down and when landed pieces turn into terrain.
//!
//! - [`game`]: the [`Game`] loop (spawn, commands, gravity, line clears)
//! - [`config`]: [`GameConfig`] layered from defaults, JSON and environment
//! - [`scoring`]: points per clear
//! - [`snapshot`]: serializable game views

pub mod config;
pub mod game;
pub mod scoring;
pub mod snapshot;

pub use coop_tetris_core as core;
pub use coop_tetris_types as types;

pub use config::{GameConfig, GameConfigError};
pub use game::{Game, TickReport};
pub use scoring::line_clear_score;
pub use snapshot::{ControllerSnapshot, GameSnapshot, PieceSnapshot};
