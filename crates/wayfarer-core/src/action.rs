//! Action labels and the stock grid directions

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::hash::Hash;

/// Trait for the labels agents choose between.
///
/// Every action space may contain a reserved "stop" action. It can be legal,
/// but searches never expand it as a move.
pub trait Action: Clone + Eq + Hash + Debug {
    /// Whether this is the reserved no-op action
    fn is_stop(&self) -> bool {
        false
    }
}

impl Action for &'static str {
    fn is_stop(&self) -> bool {
        *self == "Stop"
    }
}

impl Action for String {
    fn is_stop(&self) -> bool {
        self == "Stop"
    }
}

impl Action for usize {}

/// Compass moves on a grid, plus the reserved stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// y + 1
    North,
    /// y - 1
    South,
    /// x + 1
    East,
    /// x - 1
    West,
    /// Stay in place
    Stop,
}

impl Direction {
    /// The four moving directions, in expansion order
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Unit displacement `(dx, dy)` of this move
    #[must_use]
    pub fn vector(self) -> (i64, i64) {
        match self {
            Self::North => (0, 1),
            Self::South => (0, -1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::Stop => (0, 0),
        }
    }

    /// The opposite move; stop is its own reverse
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
            Self::Stop => Self::Stop,
        }
    }

    /// The two moves at right angles to this one
    #[must_use]
    pub fn perpendicular(self) -> [Self; 2] {
        match self {
            Self::North | Self::South => [Self::West, Self::East],
            Self::East | Self::West => [Self::North, Self::South],
            Self::Stop => [Self::Stop, Self::Stop],
        }
    }
}

impl Action for Direction {
    fn is_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
            Self::Stop => "Stop",
        };
        f.write_str(name)
    }
}
