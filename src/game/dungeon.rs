//! # Dungeon
//!
//! The stack of floors the player travels through and the index of the active
//! one. Floors come either from procedural generation or from a list of text
//! descriptions, and only the active floor is kept in memory.

use crate::{
    DelveError, DelveResult, GeneratedLevel, GenerationConfig, Generator, Level, Position, Room,
    RoomCorridorGenerator,
};
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Where the floors of a dungeon come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LevelSource {
    /// Generate each floor on entry, down to `max_depth`
    Procedural {
        config: GenerationConfig,
        max_depth: u32,
    },
    /// Parse each floor from a level description, in order
    Descriptions(Vec<String>),
}

impl LevelSource {
    /// Number of floors in the dungeon.
    pub fn level_count(&self) -> usize {
        match self {
            LevelSource::Procedural { max_depth, .. } => *max_depth as usize,
            LevelSource::Descriptions(texts) => texts.len(),
        }
    }
}

/// The active floor plus the means to build the others.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dungeon {
    source: LevelSource,
    index: usize,
    level: Level,
    rooms: Vec<Room>,
}

impl Dungeon {
    /// Builds the dungeon and enters its first floor.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Dungeon, LevelSource};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let source = LevelSource::Descriptions(vec!["LEVEL 1\n#####\n#P.>#\n#####".to_string()]);
    /// let dungeon = Dungeon::new(source, &mut StdRng::seed_from_u64(0)).unwrap();
    /// assert_eq!(dungeon.depth(), 1);
    /// assert!(dungeon.is_last_level());
    /// ```
    pub fn new(source: LevelSource, rng: &mut StdRng) -> DelveResult<Self> {
        if source.level_count() == 0 {
            return Err(DelveError::InvalidState(
                "a dungeon needs at least one level".to_string(),
            ));
        }

        let (level, rooms) = Self::build_level(&source, 0, rng)?;
        info!("Entered depth {} of {}", level.depth, source.level_count());
        Ok(Self {
            source,
            index: 0,
            level,
            rooms,
        })
    }

    /// Carves a bare room-and-corridor layout with default room settings.
    pub fn generate_procedural(
        width: u32,
        height: u32,
        depth: u32,
        rng: &mut StdRng,
    ) -> DelveResult<GeneratedLevel> {
        let config = GenerationConfig {
            width,
            height,
            ..GenerationConfig::default()
        };
        Self::generate_with(&config, depth, rng)
    }

    /// Parses a level description into a floor.
    pub fn load_from_description(text: &str) -> DelveResult<Level> {
        Level::parse(text)
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    /// Rooms of the active floor. Empty for described floors.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn source(&self) -> &LevelSource {
        &self.source
    }

    /// Depth of the active floor as recorded on the level.
    pub fn depth(&self) -> u32 {
        self.level.depth
    }

    /// Zero-based index of the active floor.
    pub fn depth_index(&self) -> usize {
        self.index
    }

    pub fn level_count(&self) -> usize {
        self.source.level_count()
    }

    pub fn is_last_level(&self) -> bool {
        self.index + 1 >= self.level_count()
    }

    pub fn player_start_position(&self) -> Position {
        self.level.player_start_position()
    }

    pub fn random_room_center(&self, rng: &mut StdRng) -> Option<Position> {
        self.rooms.choose(rng).map(Room::center)
    }

    /// Replaces the active floor with the floor at `index`.
    ///
    /// The new floor is fully built before the swap, so a failure leaves the
    /// active floor untouched.
    pub fn change_depth(&mut self, index: usize, rng: &mut StdRng) -> DelveResult<()> {
        if index >= self.level_count() {
            return Err(DelveError::InvalidState(format!(
                "level index {} is outside a dungeon of {} levels",
                index,
                self.level_count()
            )));
        }

        let (level, rooms) = Self::build_level(&self.source, index, rng)?;
        info!("Moving from depth {} to depth {}", self.level.depth, level.depth);
        self.level = level;
        self.rooms = rooms;
        self.index = index;
        Ok(())
    }

    pub fn descend(&mut self, rng: &mut StdRng) -> DelveResult<()> {
        self.change_depth(self.index + 1, rng)
    }

    pub fn ascend(&mut self, rng: &mut StdRng) -> DelveResult<()> {
        let index = self.index.checked_sub(1).ok_or_else(|| {
            DelveError::InvalidState("already on the first level".to_string())
        })?;
        self.change_depth(index, rng)
    }

    fn generate_with(
        config: &GenerationConfig,
        depth: u32,
        rng: &mut StdRng,
    ) -> DelveResult<GeneratedLevel> {
        let mut generated = RoomCorridorGenerator::new().generate(config, rng)?;
        generated.level.depth = depth.max(1);
        Ok(generated)
    }

    fn build_level(
        source: &LevelSource,
        index: usize,
        rng: &mut StdRng,
    ) -> DelveResult<(Level, Vec<Room>)> {
        let is_last = index + 1 >= source.level_count();
        match source {
            LevelSource::Procedural { config, .. } => {
                let generator = RoomCorridorGenerator::new();
                let mut generated = Self::generate_with(config, index as u32 + 1, rng)?;
                generator.furnish(&mut generated, config, !is_last, rng)?;
                Ok((generated.level, generated.rooms))
            }
            LevelSource::Descriptions(texts) => {
                let text = texts.get(index).ok_or_else(|| {
                    DelveError::InvalidState(format!("no description for level {}", index + 1))
                })?;
                let level = Self::load_from_description(text)?;
                if !level.has_walkable_tile() {
                    return Err(DelveError::format(
                        1,
                        format!("level {} has no tile the player can stand on", level.depth),
                    ));
                }
                if !is_last && level.stairs_down().is_none() {
                    return Err(DelveError::format(
                        1,
                        format!("level {} needs a `>` staircase to continue", level.depth),
                    ));
                }
                Ok((level, Vec::new()))
            }
        }
    }
}
