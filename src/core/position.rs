//! Grid coordinates and movement directions.
//!
//! ## Coordinates
//!
//! `x` is the column (grows to the right), `y` is the row (grows downward).
//! Coordinates are signed so that stepping off any edge produces a
//! representable, out-of-bounds position rather than an underflow.
//!
//! ```
//! use rust_2048::core::{Direction, Position};
//!
//! let origin = Position::new(0, 0);
//! let above = origin.step(Direction::Up.vector());
//! assert_eq!(above, Position::new(0, -1));
//! ```

use serde::{Deserialize, Serialize};

/// A cell coordinate on the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position one step along `vector`.
    #[must_use]
    pub const fn step(self, vector: Vector) -> Self {
        Self {
            x: self.x + vector.dx,
            y: self.y + vector.dy,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unit displacement for one of the four directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vector {
    pub dx: i32,
    pub dy: i32,
}

/// One of the four move directions.
///
/// The discriminants match the wire encoding used by input sources:
/// 0 = up, 1 = right, 2 = down, 3 = left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// Decode a direction index.
    ///
    /// # Panics
    ///
    /// Panics if `index > 3`. Input sources must only ever emit 0..=3.
    #[must_use]
    pub fn from_index(index: u8) -> Self {
        assert!(index < 4, "direction index must be 0..=3, got {index}");
        Self::ALL[index as usize]
    }

    /// Encode as a direction index.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Unit vector for this direction.
    #[must_use]
    pub const fn vector(self) -> Vector {
        match self {
            Direction::Up => Vector { dx: 0, dy: -1 },
            Direction::Right => Vector { dx: 1, dy: 0 },
            Direction::Down => Vector { dx: 0, dy: 1 },
            Direction::Left => Vector { dx: -1, dy: 0 },
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}
