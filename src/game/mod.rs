//! # Game Module
//!
//! Core value types, the grid, movement and session state.
//!
//! - Positions and directions
//! - Coordinate conventions shared by every other system
//! - The cell grid produced by generation
//! - The greedy movement resolver
//! - Session state owned by the game loop

pub mod coords;
pub mod grid;
pub mod movement;
pub mod state;

pub use coords::*;
pub use grid::*;
pub use movement::*;
pub use state::*;

use serde::{Deserialize, Serialize};

/// Represents a cell address in the stored grid.
///
/// In the axial convention `x` is `q` and `y` is `r`. In the hex-parity
/// convention only positions with `x` and `y` of equal parity are valid.
///
/// # Examples
///
/// ```
/// use hexcrawl::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// assert_eq!(pos + Position::new(1, 1), Position::new(11, 6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Axial hex coordinates, the space the movement rule works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Axial {
    pub q: i32,
    pub r: i32,
}

impl Axial {
    /// Creates new axial coordinates.
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }
}

impl std::ops::Add for Axial {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.q + other.q, self.r + other.r)
    }
}

/// Keyboard movement directions.
///
/// Each direction is one unit along a single axial axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Converts a direction to an axial delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexcrawl::{Axial, Direction};
    ///
    /// assert_eq!(Direction::Up.to_axial_delta(), Axial::new(0, -1));
    /// assert_eq!(Direction::Right.to_axial_delta(), Axial::new(1, 0));
    /// ```
    pub fn to_axial_delta(self) -> Axial {
        match self {
            Direction::Up => Axial::new(0, -1),
            Direction::Down => Axial::new(0, 1),
            Direction::Left => Axial::new(-1, 0),
            Direction::Right => Axial::new(1, 0),
        }
    }

    /// Returns all four directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }
}
