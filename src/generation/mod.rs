//! # Generation Module
//!
//! Procedural content generation systems for dungeons, items, and encounters.
//!
//! Every generator takes an explicit [`StdRng`], so a fixed seed always yields
//! the same floors, loot and monsters. The seed itself belongs to the caller;
//! layout settings carry none.

pub mod encounters;
pub mod layout;
pub mod loot;

pub use encounters::*;
pub use layout::*;
pub use loot::*;

use crate::game::{Level, Position, Tile};
use crate::{config, DelveError, DelveResult};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
///
/// Controls grid size, room counts and sizes, and how many pickups are
/// scattered over each floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Level width in tiles
    pub width: u32,
    /// Level height in tiles
    pub height: u32,
    /// Minimum room size (walls included)
    pub min_room_size: u32,
    /// Maximum room size (walls included)
    pub max_room_size: u32,
    /// Minimum number of rooms attempted per level
    pub min_rooms: u32,
    /// Maximum number of rooms attempted per level
    pub max_rooms: u32,
    /// Random placements tried per room before giving up on it
    pub max_placement_attempts: u32,
    /// Item and gold pickups per 100 floor tiles
    pub item_density: f64,
}

impl GenerationConfig {
    /// Full-size floors for a real game.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::GenerationConfig;
    ///
    /// let config = GenerationConfig::default();
    /// assert!(config.min_room_size >= 3);
    /// assert!(config.max_room_size >= config.min_room_size);
    /// ```
    pub fn new() -> Self {
        Self {
            width: config::DEFAULT_DUNGEON_WIDTH,
            height: config::DEFAULT_DUNGEON_HEIGHT,
            min_room_size: 3,
            max_room_size: 15,
            min_rooms: 5,
            max_rooms: 10,
            max_placement_attempts: 100,
            item_density: 2.0,
        }
    }

    /// 40x20 floors with small rooms.
    pub fn for_testing() -> Self {
        Self {
            width: 40,
            height: 20,
            min_room_size: 3,
            max_room_size: 8,
            min_rooms: 5,
            max_rooms: 10,
            max_placement_attempts: 50,
            item_density: 2.0,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A rectangular room carved out of solid rock.
///
/// The rectangle spans the room's perimeter walls, so the smallest legal room
/// (3x3) has exactly one floor tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: u32,
    /// Upper-left wall corner
    pub top_left: Position,
    pub width: u32,
    pub height: u32,
    /// Ids of the rooms a corridor leads to
    pub connections: Vec<u32>,
}

impl Room {
    /// # Examples
    ///
    /// ```
    /// use delve::{Position, Room};
    ///
    /// let room = Room::new(1, Position::new(5, 5), 10, 8);
    /// assert!(room.contains(Position::new(7, 7)));
    /// assert!(!room.contains(Position::new(20, 20)));
    /// assert_eq!(room.floor_positions().len(), 8 * 6);
    /// ```
    pub fn new(id: u32, top_left: Position, width: u32, height: u32) -> Self {
        Self {
            id,
            top_left,
            width,
            height,
            connections: Vec::new(),
        }
    }

    /// One past the right wall.
    fn right(&self) -> i32 {
        self.top_left.x + self.width as i32
    }

    /// One past the bottom wall.
    fn bottom(&self) -> i32 {
        self.top_left.y + self.height as i32
    }

    /// The bottom-right wall corner.
    pub fn bottom_right(&self) -> Position {
        Position::new(self.right() - 1, self.bottom() - 1)
    }

    /// Always an interior tile.
    pub fn center(&self) -> Position {
        let half = Position::new(self.width as i32 / 2, self.height as i32 / 2);
        self.top_left + half
    }

    /// Walls count as part of the room.
    pub fn contains(&self, pos: Position) -> bool {
        (self.top_left.x..self.right()).contains(&pos.x)
            && (self.top_left.y..self.bottom()).contains(&pos.y)
    }

    /// True when the two rectangles share at least one tile.
    pub fn overlaps(&self, other: &Room) -> bool {
        self.top_left.x < other.right()
            && other.top_left.x < self.right()
            && self.top_left.y < other.bottom()
            && other.top_left.y < self.bottom()
    }

    pub fn floor_positions(&self) -> Vec<Position> {
        let xs = self.top_left.x + 1..self.right() - 1;
        (self.top_left.y + 1..self.bottom() - 1)
            .flat_map(|y| xs.clone().map(move |x| Position::new(x, y)))
            .collect()
    }

    /// The perimeter, in row-major order.
    pub fn wall_positions(&self) -> Vec<Position> {
        let (left, top) = (self.top_left.x, self.top_left.y);
        let (last_x, last_y) = (self.right() - 1, self.bottom() - 1);
        (top..self.bottom())
            .flat_map(|y| (left..self.right()).map(move |x| Position::new(x, y)))
            .filter(|pos| pos.x == left || pos.x == last_x || pos.y == top || pos.y == last_y)
            .collect()
    }

    pub fn random_interior_point(&self, rng: &mut StdRng) -> Position {
        let x = rng.gen_range(self.top_left.x + 1..self.right() - 1);
        let y = rng.gen_range(self.top_left.y + 1..self.bottom() - 1);
        Position::new(x, y)
    }

    /// Records a corridor to `room_id`. Repeats are ignored.
    pub fn add_connection(&mut self, room_id: u32) {
        if !self.connections.contains(&room_id) {
            self.connections.push(room_id);
        }
    }
}

/// Something that builds content of type `T` from a config and the game RNG.
pub trait Generator<T> {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<T>;

    /// Rejects content that breaks generation guarantees, such as unreachable rooms.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelveResult<()>;

    /// Short name used in log lines.
    fn generator_type(&self) -> &'static str;
}

/// Helpers shared by the generators.
pub mod utils {
    use super::*;
    use crate::utils::pathfinding::reachable_from;

    /// Validates that a level has somewhere to stand.
    pub fn validate_level(level: &Level) -> DelveResult<()> {
        if level.positions_of(Tile::Floor).is_empty() {
            return Err(DelveError::GenerationFailed(
                "Level has no floor tiles".to_string(),
            ));
        }
        Ok(())
    }

    /// Checks that every room interior is reachable from the first room.
    pub fn validate_connectivity(level: &Level, rooms: &[Room]) -> DelveResult<()> {
        let Some(first) = rooms.first() else {
            return Ok(());
        };
        let reachable = reachable_from(level, first.center());

        for room in rooms {
            if let Some(pos) = room
                .floor_positions()
                .into_iter()
                .find(|pos| !reachable.contains(pos))
            {
                return Err(DelveError::GenerationFailed(format!(
                    "room {} is unreachable at ({}, {})",
                    room.id, pos.x, pos.y
                )));
            }
        }
        Ok(())
    }
}
