//! # Delve
//!
//! A deterministic, turn-based dungeon crawler engine.
//!
//! ## Architecture Overview
//!
//! Delve is split into a small number of cooperating systems:
//!
//! - **Game State**: the turn engine that owns the dungeon, the monsters and the player
//! - **World**: tile grids, level descriptions and the multi-floor dungeon
//! - **Entities**: the player character, monsters, items and their combat rules
//! - **Generation System**: procedural rooms, corridors, monsters and loot
//! - **Presentation helpers**: text command parsing and text frame rendering
//!
//! ## Determinism
//!
//! Every random decision draws from an explicitly passed [`rand::rngs::StdRng`].
//! Seeding the engine with the same value replays the same game, which is what
//! the test-suite relies on.

pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;
pub use utils::*;

/// Core error type for the Delve engine.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A level description could not be parsed
    #[error("Level format error on line {line}: {message}")]
    Format { line: usize, message: String },

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

impl DelveError {
    /// Builds a [`DelveError::Format`] for the given 1-based line.
    pub fn format(line: usize, message: impl Into<String>) -> Self {
        DelveError::Format {
            line,
            message: message.into(),
        }
    }
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default dungeon width in tiles
    pub const DEFAULT_DUNGEON_WIDTH: u32 = 60;

    /// Default dungeon height in tiles
    pub const DEFAULT_DUNGEON_HEIGHT: u32 = 24;

    /// Default number of floors in a procedural dungeon
    pub const DEFAULT_MAX_DEPTH: u32 = 5;

    /// Monsters requested on the first floor
    pub const DEFAULT_MONSTER_COUNT: usize = 4;

    /// Extra monsters requested per floor below the first
    pub const MONSTERS_PER_DEPTH: usize = 1;

    /// Default number of inventory slots
    pub const DEFAULT_INVENTORY_CAPACITY: usize = 10;

    /// Default player starting health
    pub const DEFAULT_PLAYER_HEALTH: i32 = 20;

    /// Default player starting strength
    pub const DEFAULT_PLAYER_STRENGTH: i32 = 5;

    /// Hunger meter when completely fed
    pub const DEFAULT_MAX_HUNGER: f32 = 20.0;

    /// Hunger spent for every step taken
    pub const HUNGER_PER_STEP: f32 = 0.1;

    /// Damage dealt per step while starving
    pub const STARVATION_DAMAGE: i32 = 1;

    /// Experience needed to reach level 2
    pub const FIRST_LEVEL_THRESHOLD: u32 = 10;

    /// Growth applied to the experience threshold on every level up
    pub const LEVEL_UP_MULTIPLIER: f64 = 1.5;

    /// Base max health gained per level
    pub const LEVEL_UP_HEALTH: i32 = 5;

    /// Base strength gained per level
    pub const LEVEL_UP_STRENGTH: i32 = 1;

    /// Chance of a boss joining a floor at depth 2 or deeper
    pub const BOSS_CHANCE: f64 = 0.3;

    /// Chance that a slain monster leaves an item behind
    pub const LOOT_DROP_CHANCE: f64 = 0.25;

    /// Start coordinate used when a level has no walkable tile at all
    pub const FALLBACK_START: (i32, i32) = (1, 1);
}
