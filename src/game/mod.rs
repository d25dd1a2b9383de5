//! # Game Module
//!
//! Core game state management, world representation, and entity systems.
//!
//! This module contains the fundamental building blocks of Delve:
//! - The turn engine and its configuration
//! - Level grids and the multi-floor dungeon
//! - The player, monsters and items
//! - The closed set of player actions

pub mod actions;
pub mod dungeon;
pub mod items;
pub mod monster_manager;
pub mod monsters;
pub mod player;
pub mod state;
pub mod world;

pub use actions::*;
pub use dungeon::*;
pub use items::*;
pub use monster_manager::*;
pub use monsters::*;
pub use player::*;
pub use state::*;
pub use world::*;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a 2D coordinate in the game world.
///
/// # Examples
///
/// ```
/// use delve::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// assert_eq!(pos.chebyshev_distance(Position::new(12, 4)), 2);
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

    /// Calculates the Chebyshev (king-move) distance to another position.
    ///
    /// Two positions touching diagonally are at distance 1.
    pub fn chebyshev_distance(self, other: Position) -> u32 {
        (self.x - other.x).abs().max((self.y - other.y).abs()) as u32
    }

    /// Returns only the 4 cardinal adjacent positions (no diagonals).
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        vec![
            Position::new(self.x, self.y - 1), // N
            Position::new(self.x - 1, self.y), // W
            Position::new(self.x + 1, self.y), // E
            Position::new(self.x, self.y + 1), // S
        ]
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

/// Directions for movement and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Direction {
    /// Every direction, cardinals first.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Northeast,
        Direction::Northwest,
        Direction::Southeast,
        Direction::Southwest,
    ];

    /// The one-step offset, with y growing southwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Direction, Position};
    ///
    /// assert_eq!(Direction::North.to_delta(), Position::new(0, -1));
    /// assert_eq!(Direction::Southwest.to_delta(), Position::new(-1, 1));
    /// ```
    pub fn to_delta(self) -> Position {
        let dy = match self {
            Direction::North | Direction::Northeast | Direction::Northwest => -1,
            Direction::South | Direction::Southeast | Direction::Southwest => 1,
            Direction::East | Direction::West => 0,
        };
        let dx = match self {
            Direction::West | Direction::Northwest | Direction::Southwest => -1,
            Direction::East | Direction::Northeast | Direction::Southeast => 1,
            Direction::North | Direction::South => 0,
        };
        Position::new(dx, dy)
    }

    /// The direction of a single king step, if `delta` is one.
    pub fn from_delta(delta: Position) -> Option<Direction> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.to_delta() == delta)
    }

    pub fn cardinal() -> [Direction; 4] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }
}

/// Unique identifier for monsters.
pub type MonsterId = Uuid;

/// Draws a monster ID from the game RNG so seeded runs reproduce their IDs.
pub fn new_monster_id(rng: &mut StdRng) -> MonsterId {
    Uuid::from_u128(rng.gen())
}
