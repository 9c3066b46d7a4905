//! Scoring module - classic line clear points
//!
//! Points are awarded per clear event: the number of rows removed at once indexes the
//! classic table. Clearing more than four rows at once (possible on a tall shared
//! field) scores like four.

use crate::types::LINE_SCORES;

/// Points for clearing `lines` rows in a single clear.
pub fn line_clear_score(lines: usize) -> u32 {
    LINE_SCORES[lines.min(LINE_SCORES.len() - 1)]
}
