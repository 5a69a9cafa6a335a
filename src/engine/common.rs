//! Common types for the engine: coordinates, compass directions and errors.

use alloc::string::String;
use core::fmt;

/// A 1-based board position. Values outside the grid are representable so
/// that neighbour arithmetic can step off the board before being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The coordinate one step away in `dir`. North decreases `y`.
    pub fn shifted(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Chebyshev distance, the metric torpedo blasts use.
    pub fn blast_distance(self, other: Coordinate) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.x, self.y)
    }
}

/// Compass direction of a single move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Canonical neighbour order used everywhere a deterministic walk is needed.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Single-letter wire code.
    pub fn code(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::East => "E",
            Direction::South => "S",
            Direction::West => "W",
        }
    }

    pub fn from_code(code: &str) -> Option<Direction> {
        match code {
            "N" => Some(Direction::North),
            "E" => Some(Direction::East),
            "S" => Some(Direction::South),
            "W" => Some(Direction::West),
            _ => None,
        }
    }
}

/// Errors raised by coordinate and index conversion on a [`Grid`](crate::engine::Grid).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Coordinate outside `[1, width] x [1, height]`.
    CoordOutOfBounds { x: i32, y: i32 },
    /// Index outside `[0, width * height)`.
    IndexOutOfBounds { index: usize, len: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::CoordOutOfBounds { x, y } => {
                write!(f, "Illegal map coordinates: {}, {}", x, y)
            }
            GridError::IndexOutOfBounds { index, len } => {
                write!(f, "Illegal map index: {} (map has {} squares)", index, len)
            }
        }
    }
}

/// Fatal error taxonomy of the bot. None of these are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotError {
    /// Unexpected turn number, unknown event kind or malformed field.
    ProtocolViolation(String),
    /// Unsupported game setting or invalid tuning.
    Configuration(String),
    /// A coordinate or index left the grid; always an upstream or logic defect.
    OutOfBounds(GridError),
    /// Every neighbour of the submarine is unreachable from the destination.
    NoLegalMove { x: i32, y: i32 },
}

impl From<GridError> for BotError {
    fn from(err: GridError) -> Self {
        BotError::OutOfBounds(err)
    }
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::ProtocolViolation(msg) => write!(f, "Protocol violation: {}", msg),
            BotError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            BotError::OutOfBounds(e) => write!(f, "Out of bounds: {}", e),
            BotError::NoLegalMove { x, y } => {
                write!(f, "No legal direction to move from square {}|{}", x, y)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GridError {}

#[cfg(feature = "std")]
impl std::error::Error for BotError {}
