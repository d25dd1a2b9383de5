//! # Layout Generation
//!
//! Procedural dungeon layout generation using a room-and-corridor algorithm.
//!
//! The generator:
//! 1. Places rooms randomly with collision detection
//! 2. Connects consecutive rooms with L-shaped corridors
//! 3. Validates that every room can be reached from the first one
//!
//! The result carries no stairs. [`RoomCorridorGenerator::furnish`] turns a bare
//! layout into a playable floor.

use super::utils;
use crate::{DelveError, DelveResult, GenerationConfig, Generator, Level, Position, Room, Tile};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// A carved level together with the rooms it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedLevel {
    pub level: Level,
    pub rooms: Vec<Room>,
}

impl GeneratedLevel {
    /// Center of a random room, or None if there are no rooms.
    pub fn random_room_center(&self, rng: &mut StdRng) -> Option<Position> {
        self.rooms.choose(rng).map(Room::center)
    }
}

/// Primary dungeon generator using room-and-corridor algorithm.
#[derive(Debug, Clone)]
pub struct RoomCorridorGenerator {
    /// Whether to reject layouts with unreachable rooms
    pub ensure_connectivity: bool,
}

impl RoomCorridorGenerator {
    /// Creates a new dungeon generator with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{GenerationConfig, Generator, RoomCorridorGenerator};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let generator = RoomCorridorGenerator::new();
    /// let mut rng = StdRng::seed_from_u64(5);
    /// let generated = generator.generate(&GenerationConfig::for_testing(), &mut rng).unwrap();
    /// assert!(!generated.rooms.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            ensure_connectivity: true,
        }
    }

    /// Places rooms until the rolled room count is reached or placement gives up.
    fn place_rooms(
        &self,
        level: &mut Level,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<Vec<Room>> {
        let min_size = config.min_room_size.max(3);
        let max_width = config.max_room_size.min(level.width);
        let max_height = config.max_room_size.min(level.height);
        if max_width < min_size || max_height < min_size {
            return Err(DelveError::GenerationFailed(format!(
                "a {}x{} level cannot hold a {}x{} room",
                level.width, level.height, min_size, min_size
            )));
        }

        let min_rooms = config.min_rooms.min(config.max_rooms);
        let room_count = rng.gen_range(min_rooms..=config.max_rooms.max(min_rooms));
        let mut rooms = Vec::new();

        for room_id in 0..room_count {
            let sizes = (min_size, max_width, max_height);
            if let Some(room) = self.try_place_room(level, config, sizes, rng, room_id, &rooms) {
                self.carve_room(level, &room)?;
                rooms.push(room);
            }
        }

        if rooms.is_empty() {
            return Err(DelveError::GenerationFailed(
                "Failed to place any rooms".to_string(),
            ));
        }

        Ok(rooms)
    }

    /// Attempts to place a single room.
    fn try_place_room(
        &self,
        level: &Level,
        config: &GenerationConfig,
        (min_size, max_width, max_height): (u32, u32, u32),
        rng: &mut StdRng,
        room_id: u32,
        existing_rooms: &[Room],
    ) -> Option<Room> {
        for _ in 0..config.max_placement_attempts.max(1) {
            let width = rng.gen_range(min_size..=max_width);
            let height = rng.gen_range(min_size..=max_height);
            let x = rng.gen_range(0..=level.width - width) as i32;
            let y = rng.gen_range(0..=level.height - height) as i32;
            let room = Room::new(room_id, Position::new(x, y), width, height);

            if existing_rooms.iter().any(|existing| room.overlaps(existing)) {
                continue;
            }
            return Some(room);
        }

        None // Failed to place room after all attempts
    }

    /// Carves walls around the room and floor inside it.
    fn carve_room(&self, level: &mut Level, room: &Room) -> DelveResult<()> {
        for pos in room.wall_positions() {
            level.set_tile(pos, Tile::Wall)?;
        }
        for pos in room.floor_positions() {
            level.set_tile(pos, Tile::Floor)?;
        }
        Ok(())
    }

    /// Connects each room to the previous one.
    fn connect_rooms(
        &self,
        level: &mut Level,
        rooms: &mut [Room],
        rng: &mut StdRng,
    ) -> DelveResult<()> {
        for i in 1..rooms.len() {
            let start = rooms[i - 1].random_interior_point(rng);
            let end = rooms[i].random_interior_point(rng);

            self.carve_l_corridor(level, start, end)?;

            let (previous_id, current_id) = (rooms[i - 1].id, rooms[i].id);
            rooms[i - 1].add_connection(current_id);
            rooms[i].add_connection(previous_id);
        }
        Ok(())
    }

    /// Carves a corridor from `start`, horizontally first, then vertically.
    ///
    /// Only wall and void tiles are turned into corridor; floor is left alone.
    fn carve_l_corridor(&self, level: &mut Level, start: Position, end: Position) -> DelveResult<()> {
        let mut current = start;
        self.carve_corridor_tile(level, current)?;

        while current.x != end.x {
            current.x += (end.x - current.x).signum();
            self.carve_corridor_tile(level, current)?;
        }
        while current.y != end.y {
            current.y += (end.y - current.y).signum();
            self.carve_corridor_tile(level, current)?;
        }
        Ok(())
    }

    fn carve_corridor_tile(&self, level: &mut Level, pos: Position) -> DelveResult<()> {
        if matches!(level.get_tile(pos), Some(Tile::Wall | Tile::Void)) {
            level.set_tile(pos, Tile::Corridor)?;
        }
        Ok(())
    }

    /// Turns a bare layout into a playable floor.
    ///
    /// Marks the player start at a random room center, puts stairs down in
    /// another room when requested, stairs up below the first depth, and
    /// scatters item and gold pickups over the remaining floor.
    pub fn furnish(
        &self,
        generated: &mut GeneratedLevel,
        config: &GenerationConfig,
        has_stairs_down: bool,
        rng: &mut StdRng,
    ) -> DelveResult<()> {
        let start = generated.random_room_center(rng).ok_or_else(|| {
            DelveError::GenerationFailed("cannot furnish a level without rooms".to_string())
        })?;
        let GeneratedLevel { level, rooms } = generated;
        level.set_tile(start, Tile::PlayerStart)?;
        let start_room = rooms.iter().position(|room| room.contains(start));

        if has_stairs_down {
            // Prefer a room other than the one the player starts in
            let spot = match Self::free_room_spot(level, rooms, start_room, rng) {
                Some(spot) => spot,
                None => Self::free_room_spot(level, rooms, None, rng).ok_or_else(|| {
                    DelveError::GenerationFailed("no free floor for stairs down".to_string())
                })?,
            };
            level.set_tile(spot, Tile::StairsDown)?;
        }

        if level.depth > 1 {
            match Self::free_room_spot(level, rooms, None, rng) {
                Some(spot) => level.set_tile(spot, Tile::StairsUp)?,
                None => debug!("depth {} has no free floor for stairs up", level.depth),
            }
        }

        let mut free = level.positions_of(Tile::Floor);
        free.shuffle(rng);
        let pickups = (free.len() as f64 * config.item_density / 100.0).round() as usize;
        for pos in free.into_iter().take(pickups) {
            let tile = if rng.gen_bool(0.5) { Tile::Item } else { Tile::Gold };
            level.set_tile(pos, tile)?;
        }

        Ok(())
    }

    /// Random floor tile inside any room except `excluded`.
    fn free_room_spot(
        level: &Level,
        rooms: &[Room],
        excluded: Option<usize>,
        rng: &mut StdRng,
    ) -> Option<Position> {
        let candidates: Vec<Position> = rooms
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != excluded)
            .flat_map(|(_, room)| room.floor_positions())
            .filter(|pos| level.get_tile(*pos) == Some(Tile::Floor))
            .collect();
        candidates.choose(rng).copied()
    }
}

impl Generator<GeneratedLevel> for RoomCorridorGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<GeneratedLevel> {
        let mut level = Level::new(1, config.width, config.height);

        let mut rooms = self.place_rooms(&mut level, config, rng)?;
        self.connect_rooms(&mut level, &mut rooms, rng)?;

        let generated = GeneratedLevel { level, rooms };
        self.validate(&generated, config)?;

        debug!(
            "{} carved {} rooms into a {}x{} level",
            self.generator_type(),
            generated.rooms.len(),
            config.width,
            config.height
        );
        Ok(generated)
    }

    fn validate(&self, generated: &GeneratedLevel, _config: &GenerationConfig) -> DelveResult<()> {
        utils::validate_level(&generated.level)?;
        if self.ensure_connectivity {
            utils::validate_connectivity(&generated.level, &generated.rooms)?;
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "RoomCorridorGenerator"
    }
}

impl Default for RoomCorridorGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn generate(seed: u64) -> GeneratedLevel {
        let config = GenerationConfig::for_testing();
        let mut rng = StdRng::seed_from_u64(seed);
        RoomCorridorGenerator::new().generate(&config, &mut rng).unwrap()
    }

    #[test]
    fn test_generation_with_small_level() {
        let config = GenerationConfig::for_testing();
        let generated = generate(12345);

        assert_eq!(generated.level.width, config.width);
        assert_eq!(generated.level.height, config.height);
        assert!(!generated.rooms.is_empty());
        assert!(generated.rooms.len() <= config.max_rooms as usize);

        for room in &generated.rooms {
            assert!(room.width >= 3 && room.height >= 3);
            for pos in room.floor_positions() {
                assert_eq!(generated.level.get_tile(pos), Some(Tile::Floor));
            }
        }
    }

    #[test]
    fn test_generation_produces_no_stairs() {
        let generated = generate(77);
        assert_eq!(generated.level.stairs_up(), None);
        assert_eq!(generated.level.stairs_down(), None);
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate(31337), generate(31337));
    }

    #[test]
    fn test_rooms_do_not_overlap() {
        let generated = generate(4242);
        for (i, a) in generated.rooms.iter().enumerate() {
            for b in &generated.rooms[i + 1..] {
                assert!(!a.overlaps(b));
            }
        }
    }

    #[test]
    fn test_consecutive_rooms_are_connected() {
        let generated = generate(99);
        for pair in generated.rooms.windows(2) {
            assert!(pair[0].connections.contains(&pair[1].id));
            assert!(pair[1].connections.contains(&pair[0].id));
        }
    }

    #[test]
    fn test_l_corridor_carving() {
        let generator = RoomCorridorGenerator::new();
        let mut level = Level::filled(1, 10, 10, Tile::Wall);
        level.set_tile(Position::new(3, 1), Tile::Floor).unwrap();

        generator
            .carve_l_corridor(&mut level, Position::new(1, 1), Position::new(5, 4))
            .unwrap();

        assert_eq!(level.get_tile(Position::new(1, 1)), Some(Tile::Corridor));
        assert_eq!(level.get_tile(Position::new(5, 1)), Some(Tile::Corridor));
        assert_eq!(level.get_tile(Position::new(5, 4)), Some(Tile::Corridor));
        // Existing floor is kept
        assert_eq!(level.get_tile(Position::new(3, 1)), Some(Tile::Floor));
        // Horizontal first, so the other corner stays wall
        assert_eq!(level.get_tile(Position::new(1, 4)), Some(Tile::Wall));
    }

    #[test]
    fn test_tiny_grid_fails() {
        let mut config = GenerationConfig::for_testing();
        config.width = 2;
        let mut rng = StdRng::seed_from_u64(1);
        let result = RoomCorridorGenerator::new().generate(&config, &mut rng);
        assert!(matches!(result, Err(DelveError::GenerationFailed(_))));
    }

    #[test]
    fn test_room_sizes_clamp_to_grid() {
        let mut config = GenerationConfig::new();
        config.width = 10;
        config.height = 10;
        config.min_rooms = 5;
        config.max_rooms = 5;
        let mut rng = StdRng::seed_from_u64(8);
        let generated = RoomCorridorGenerator::new().generate(&config, &mut rng).unwrap();
        for room in &generated.rooms {
            assert!(room.width <= 10 && room.height <= 10);
            assert!(room.bottom_right().x < 10 && room.bottom_right().y < 10);
        }
    }

    #[test]
    fn test_furnish_places_markers() {
        let config = GenerationConfig::for_testing();
        let mut rng = StdRng::seed_from_u64(2718);
        let generator = RoomCorridorGenerator::new();
        let mut generated = generator.generate(&config, &mut rng).unwrap();
        generated.level.depth = 2;

        generator.furnish(&mut generated, &config, true, &mut rng).unwrap();
        let level = &generated.level;

        let start = level.positions_of(Tile::PlayerStart);
        assert_eq!(start.len(), 1);
        assert!(generated.rooms.iter().any(|room| room.center() == start[0]));
        assert_eq!(level.player_start_position(), start[0]);
        assert!(level.stairs_down().is_some());
        assert!(level.stairs_up().is_some());
        assert_ne!(level.stairs_down(), level.stairs_up());
    }

    #[test]
    fn test_furnish_last_first_floor() {
        let config = GenerationConfig::for_testing();
        let mut rng = StdRng::seed_from_u64(1414);
        let generator = RoomCorridorGenerator::new();
        let mut generated = generator.generate(&config, &mut rng).unwrap();

        generator.furnish(&mut generated, &config, false, &mut rng).unwrap();
        assert_eq!(generated.level.stairs_down(), None);
        assert_eq!(generated.level.stairs_up(), None);
    }
}
