//! Field configuration.
//!
//! Size and the rotation kick order are runtime configuration rather than engine
//! constants, so a stricter rotation system can be plugged in without touching the
//! collision code. Values come from `Default`, from JSON (any missing key falls back
//! to its default) or from `COOP_TETRIS_*` environment variables.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Direction, FIELD_HEIGHT, FIELD_WIDTH};

/// Ordered list of shifts tried by the rotation search. At most one entry per direction.
pub type KickOrder = ArrayVec<Direction, 5>;

/// Largest field accepted by [`FieldConfig::validate`], in cells.
pub const MAX_FIELD_CELLS: i64 = 1 << 20;

/// Default kick priority: no shift, then up, down, left, right.
pub const DEFAULT_KICK_ORDER: [Direction; 5] = [
    Direction::None,
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: i32,
    pub height: i32,
    pub kick_order: KickOrder,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            kick_order: KickOrder::from(DEFAULT_KICK_ORDER),
        }
    }
}

impl FieldConfig {
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Create from environment variables.
    ///
    /// - `COOP_TETRIS_WIDTH` / `COOP_TETRIS_HEIGHT`: field dimensions
    /// - `COOP_TETRIS_KICKS`: comma separated directions, e.g. `none,left,right`
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        use std::env;

        let mut config = Self::default();

        if let Some(width) = env::var("COOP_TETRIS_WIDTH")
            .ok()
            .and_then(|s| s.trim().parse().ok())
        {
            config.width = width;
        }
        if let Some(height) = env::var("COOP_TETRIS_HEIGHT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
        {
            config.height = height;
        }
        if let Some(kicks) = env::var("COOP_TETRIS_KICKS")
            .ok()
            .and_then(|s| parse_kick_order(&s))
        {
            config.kick_order = kicks;
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cells = i64::from(self.width) * i64::from(self.height);
        if self.width <= 0 || self.height <= 0 || cells > MAX_FIELD_CELLS {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.kick_order.is_empty() {
            return Err(ConfigError::EmptyKickOrder);
        }
        Ok(())
    }
}

/// Parse a comma separated kick order. Returns `None` on unknown names, duplicates,
/// or an empty list.
pub fn parse_kick_order(s: &str) -> Option<KickOrder> {
    let mut order = KickOrder::new();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let direction = Direction::from_str(part)?;
        if order.contains(&direction) {
            return None;
        }
        order.try_push(direction).ok()?;
    }
    if order.is_empty() {
        None
    } else {
        Some(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_reference_playfield() {
        let config = FieldConfig::default();
        assert_eq!(config.width, 21);
        assert_eq!(config.height, 35);
        assert_eq!(config.kick_order.as_slice(), &DEFAULT_KICK_ORDER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_degenerate_sizes() {
        assert_eq!(
            FieldConfig::with_size(0, 10).validate(),
            Err(ConfigError::InvalidSize {
                width: 0,
                height: 10
            })
        );
        assert!(FieldConfig::with_size(4, -1).validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_fields() {
        assert_eq!(
            FieldConfig::with_size(50_000, 50_000).validate(),
            Err(ConfigError::InvalidSize {
                width: 50_000,
                height: 50_000
            })
        );
        assert!(FieldConfig::with_size(i32::MAX, 2).validate().is_err());
        assert!(FieldConfig::with_size(1024, 1024).validate().is_ok());
        assert!(FieldConfig::with_size(1025, 1024).validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_kick_order() {
        let mut config = FieldConfig::default();
        config.kick_order.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyKickOrder));
    }

    #[test]
    fn parse_kick_order_accepts_custom_priority() {
        let order = parse_kick_order("left, right ,none").unwrap();
        assert_eq!(
            order.as_slice(),
            &[Direction::Left, Direction::Right, Direction::None]
        );
    }

    #[test]
    fn parse_kick_order_rejects_bad_input() {
        assert!(parse_kick_order("").is_none());
        assert!(parse_kick_order("left,sideways").is_none());
        assert!(parse_kick_order("left,left").is_none());
    }
}
