//! Co-op Tetris (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so binaries, integration tests and
//! benches can use `coop_tetris::{core,engine,types}`.

pub use coop_tetris_core as core;
pub use coop_tetris_engine as engine;
pub use coop_tetris_types as types;
