//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental value types used by the collision engine and the
//! scheduler built on top of it. Everything here is plain data: coordinates, directions,
//! identity tokens and the shape catalogue keys.
//!
//! # Playfield Dimensions
//!
//! The reference playfield is wider and taller than a single-player board because
//! several controllers share it:
//!
//! - **Width**: 21 columns (indexed 0-20)
//! - **Height**: 35 rows (indexed 0-34)
//! - **Row 0 is the floor**: `y` grows upwards, gravity moves pieces towards `y = 0`
//! - **Spawn row**: `FIELD_HEIGHT - 1` (the top row)
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `GRAVITY_INTERVAL_MS` | 500 | Time between gravity steps |
//!
//! # Examples
//!
//! ```
//! use coop_tetris_types::{Coordinate, Direction, ShapeKind, FIELD_HEIGHT, FIELD_WIDTH};
//!
//! let c = Coordinate::new(3, 4);
//! assert_eq!(c + Direction::Down.offset(), Coordinate::new(3, 3));
//!
//! assert_eq!(ShapeKind::from_str("t"), Some(ShapeKind::T));
//! assert_eq!(Direction::Left.opposite(), Direction::Right);
//!
//! assert_eq!(FIELD_WIDTH, 21);
//! assert_eq!(FIELD_HEIGHT, 35);
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// Playfield width in cells (21 columns)
pub const FIELD_WIDTH: i32 = 21;

/// Playfield height in cells (35 rows)
pub const FIELD_HEIGHT: i32 = 35;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Time between two gravity steps
pub const GRAVITY_INTERVAL_MS: u32 = 500;

/// Angle applied by a single rotate command
pub const ROTATION_DEGREES: f64 = 90.0;

/// Horizontal distance between the spawn columns of consecutive controllers
pub const SPAWN_SPACING: i32 = 4;

/// Number of registered controllers required before pieces start spawning
pub const MIN_CONTROLLERS: usize = 2;

/// Line clear scoring table (Classic scoring), indexed by rows cleared at once
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Integer grid coordinate. `x` grows to the right, `y` grows upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring coordinate one step in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        self + direction.offset()
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Coordinate {
    fn add_assign(&mut self, rhs: Coordinate) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unit movement directions
///
/// `None` is a valid direction with a zero offset. It is used as the "no shift"
/// candidate of the rotation kick search and is never wall-adjacent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    /// The four cardinal directions, in flood-fill neighbour order.
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector for this direction
    ///
    /// # Examples
    ///
    /// ```
    /// use coop_tetris_types::{Coordinate, Direction};
    ///
    /// assert_eq!(Direction::Up.offset(), Coordinate::new(0, 1));
    /// assert_eq!(Direction::Down.offset(), Coordinate::new(0, -1));
    /// assert_eq!(Direction::None.offset(), Coordinate::new(0, 0));
    /// ```
    pub const fn offset(self) -> Coordinate {
        match self {
            Direction::Up => Coordinate::new(0, 1),
            Direction::Down => Coordinate::new(0, -1),
            Direction::Left => Coordinate::new(-1, 0),
            Direction::Right => Coordinate::new(1, 0),
            Direction::None => Coordinate::new(0, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    /// Parse direction from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            "none" => Some(Direction::None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::None => "none",
        }
    }
}

/// The seven spawnable shapes
///
/// The exact cell layout of each shape lives in the core crate's shape table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Parse shape kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use coop_tetris_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("i"), Some(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_str("L"), Some(ShapeKind::L));
    /// assert_eq!(ShapeKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(ShapeKind::I),
            "o" => Some(ShapeKind::O),
            "t" => Some(ShapeKind::T),
            "s" => Some(ShapeKind::S),
            "z" => Some(ShapeKind::Z),
            "j" => Some(ShapeKind::J),
            "l" => Some(ShapeKind::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::I => "i",
            ShapeKind::O => "o",
            ShapeKind::T => "t",
            ShapeKind::S => "s",
            ShapeKind::Z => "z",
            ShapeKind::J => "j",
            ShapeKind::L => "l",
        }
    }
}

/// Identity of a single occupied cell (a block).
///
/// Ids are handed out monotonically by the field and never reused, so a stale id
/// held by a piece can always be detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

/// Identity of a piece (a group of blocks moving together).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u32);

/// Identity of a registered control source (a player).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControllerId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block#{}", self.0)
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "piece#{}", self.0)
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "controller#{}", self.0)
    }
}

/// Commands a controller can issue against its active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    /// Translate the active piece one cell
    Move(Direction),
    /// Rotate the active piece by the configured angle around its pivot
    Rotate,
}

impl Command {
    /// Parse command from string
    ///
    /// # Examples
    ///
    /// ```
    /// use coop_tetris_types::{Command, Direction};
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::Move(Direction::Left)));
    /// assert_eq!(Command::from_str("rotate"), Some(Command::Rotate));
    /// assert_eq!(Command::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Command::Move(Direction::Left)),
            "moveright" => Some(Command::Move(Direction::Right)),
            "movedown" => Some(Command::Move(Direction::Down)),
            "rotate" => Some(Command::Rotate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Move(Direction::Left) => "moveLeft",
            Command::Move(Direction::Right) => "moveRight",
            Command::Move(Direction::Down) => "moveDown",
            Command::Move(Direction::Up) => "moveUp",
            Command::Move(Direction::None) => "moveNone",
            Command::Rotate => "rotate",
        }
    }
}
