//! # Game State Module
//!
//! The turn engine and the coordination point for every game system.
//!
//! [`GameState`] owns the dungeon, the monsters, the player and the single
//! seeded random number generator. One call to [`GameState::perform`] is one
//! turn: the player's action resolves first, then the monsters act, then the
//! caller may query state for display.

use crate::{
    config, ActionError, DelveResult, Dungeon, GenerationConfig, Level, LevelSource,
    MonsterManager, Player, PlayerAction, PlayerStats, Tile,
};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Settings for a whole game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for every random decision in the game
    pub seed: u64,
    /// Layout settings for procedural floors
    pub generation: GenerationConfig,
    /// Number of procedural floors
    pub max_depth: u32,
    /// Monsters requested on the first floor
    pub base_monster_count: usize,
    /// Extra monsters requested per floor below the first
    pub monsters_per_depth: usize,
    /// Player inventory slots
    pub inventory_capacity: usize,
}

impl GameConfig {
    /// Creates a configuration with the default dungeon settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::GameConfig;
    ///
    /// let config = GameConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert_eq!(config.max_depth, 5);
    /// assert_eq!(config.monster_count(3), 6);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            generation: GenerationConfig::new(),
            max_depth: config::DEFAULT_MAX_DEPTH,
            base_monster_count: config::DEFAULT_MONSTER_COUNT,
            monsters_per_depth: config::MONSTERS_PER_DEPTH,
            inventory_capacity: config::DEFAULT_INVENTORY_CAPACITY,
        }
    }

    /// Creates a smaller, shallower configuration for tests.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            generation: GenerationConfig::for_testing(),
            max_depth: 3,
            ..Self::new(seed)
        }
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> DelveResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Monsters requested for a floor at `depth`.
    pub fn monster_count(&self, depth: u32) -> usize {
        self.base_monster_count + self.monsters_per_depth * depth.saturating_sub(1) as usize
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Game completion state for handling endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCompletionState {
    /// Game is still in progress
    Playing,
    /// Player climbed out from the first floor
    EscapedEarly,
    /// Player took the stairs down on the last floor
    CompletedDungeon,
    /// Player died
    PlayerDied,
}

/// Direction of travel on a staircase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StairDirection {
    Up,
    Down,
}

impl StairDirection {
    fn tile(self) -> Tile {
        match self {
            StairDirection::Up => Tile::StairsUp,
            StairDirection::Down => Tile::StairsDown,
        }
    }

    fn label(self) -> &'static str {
        match self {
            StairDirection::Up => "up",
            StairDirection::Down => "down",
        }
    }
}

/// Central game state.
///
/// Owns every game system and runs turns. The presentation side only reads
/// from it between calls to [`GameState::perform`].
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    dungeon: Dungeon,
    monsters: MonsterManager,
    player: Player,
    rng: StdRng,
    turn_number: u64,
    completion_state: GameCompletionState,
    messages: Vec<String>,
}

impl GameState {
    /// Starts a game in a procedural dungeon.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{GameCompletionState, GameConfig, GameState, PlayerAction};
    ///
    /// let mut game = GameState::new(GameConfig::for_testing(3)).unwrap();
    /// assert_eq!(game.completion_state(), GameCompletionState::Playing);
    ///
    /// assert!(game.perform(PlayerAction::Wait));
    /// assert_eq!(game.turn_number(), 1);
    /// ```
    pub fn new(config: GameConfig) -> DelveResult<Self> {
        let source = LevelSource::Procedural {
            config: config.generation.clone(),
            max_depth: config.max_depth,
        };
        Self::with_source(config, source)
    }

    /// Starts a game on floors parsed from level descriptions, in order.
    pub fn from_descriptions(config: GameConfig, texts: Vec<String>) -> DelveResult<Self> {
        Self::with_source(config, LevelSource::Descriptions(texts))
    }

    fn with_source(config: GameConfig, source: LevelSource) -> DelveResult<Self> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let dungeon = Dungeon::new(source, &mut rng)?;
        let mut player =
            Player::with_capacity(dungeon.player_start_position(), config.inventory_capacity);
        player.on_level_change(dungeon.depth());

        let mut state = Self {
            config,
            dungeon,
            monsters: MonsterManager::new(),
            player,
            rng,
            turn_number: 0,
            completion_state: GameCompletionState::Playing,
            messages: Vec::new(),
        };
        state.populate_monsters();
        state.greet();

        info!(
            "New game with seed {} across {} levels",
            state.config.seed,
            state.dungeon.level_count()
        );
        Ok(state)
    }

    /// Starts over from the first floor with the same seed and level source.
    pub fn restart(&mut self) -> DelveResult<()> {
        let source = self.dungeon.source().clone();
        self.rng = StdRng::seed_from_u64(self.config.seed);
        self.dungeon = Dungeon::new(source, &mut self.rng)?;
        self.player.reset(self.dungeon.player_start_position());
        self.player.on_level_change(self.dungeon.depth());
        self.populate_monsters();
        self.turn_number = 0;
        self.completion_state = GameCompletionState::Playing;
        self.greet();

        info!("Game restarted with seed {}", self.config.seed);
        Ok(())
    }

    /// Resolves one player action and, if it succeeded, the monster turn.
    ///
    /// Returns false when the action was rejected or the game is over.
    /// Rejected actions cost no turn.
    pub fn perform(&mut self, action: PlayerAction) -> bool {
        self.messages.clear();
        if self.is_game_ended() {
            self.messages.push("The game is over.".to_string());
            return false;
        }

        debug!("Turn {}: {}", self.turn_number, action.name());
        let succeeded = self.resolve_player_action(action);
        self.messages.push(self.player.status_message().to_string());
        // A level change hands the new floor's monsters a fresh start
        let changes_level = matches!(action, PlayerAction::Descend | PlayerAction::Ascend);
        if succeeded && !changes_level && self.player.is_alive() {
            let events = self
                .monsters
                .step_turn(&mut self.player, self.dungeon.level(), &mut self.rng);
            self.messages.extend(events);
        }

        if succeeded {
            self.turn_number += 1;
        }
        if !self.player.is_alive() && !self.is_game_ended() {
            warn!("Game over on turn {}", self.turn_number);
            self.completion_state = GameCompletionState::PlayerDied;
        }
        self.messages.retain(|message| !message.is_empty());
        succeeded
    }

    fn resolve_player_action(&mut self, action: PlayerAction) -> bool {
        match action {
            PlayerAction::Move(direction) => self.player.move_in(
                direction,
                self.dungeon.level_mut(),
                &mut self.monsters,
                &mut self.rng,
            ),
            PlayerAction::Attack(direction) => {
                let target = self.player.position() + direction.to_delta();
                let depth = self.dungeon.depth();
                let monster = self.monsters.monster_at_mut(target);
                self.player.attack(monster, depth, &mut self.rng)
            }
            PlayerAction::UseItem(index) => self.player.use_consumable(index),
            PlayerAction::Equip(slot, index) => self.player.equip(slot, index),
            PlayerAction::Unequip(slot) => self.player.unequip(slot),
            PlayerAction::Drop(index) => self.player.drop_item(index),
            PlayerAction::Wait => self.player.wait(),
            PlayerAction::Descend => self.use_stairs(StairDirection::Down),
            PlayerAction::Ascend => self.use_stairs(StairDirection::Up),
        }
    }

    /// Handles level progression when the player uses stairs.
    ///
    /// Going up from the first floor or down from the last ends the game.
    fn use_stairs(&mut self, direction: StairDirection) -> bool {
        if !self.player.is_alive() {
            return self.player.reject(ActionError::PlayerDead);
        }
        if self.dungeon.level().get_tile(self.player.position()) != Some(direction.tile()) {
            return self.player.reject(ActionError::InvalidTarget(format!(
                "There are no stairs leading {} here.",
                direction.label()
            )));
        }

        match direction {
            StairDirection::Down if self.dungeon.is_last_level() => {
                info!("Dungeon completed on turn {}", self.turn_number);
                self.completion_state = GameCompletionState::CompletedDungeon;
                self.player
                    .set_status("You reach the bottom of the dungeon. Victory!");
                return true;
            }
            StairDirection::Up if self.dungeon.depth_index() == 0 => {
                info!("Player escaped on turn {}", self.turn_number);
                self.completion_state = GameCompletionState::EscapedEarly;
                self.player.set_status("You climb back into daylight and escape.");
                return true;
            }
            _ => {}
        }

        let changed = match direction {
            StairDirection::Down => self.dungeon.descend(&mut self.rng),
            StairDirection::Up => self.dungeon.ascend(&mut self.rng),
        };
        match changed {
            Ok(()) => {
                self.enter_level(direction);
                true
            }
            Err(error) => {
                warn!("Level change failed: {}", error);
                self.player.reject(ActionError::InvalidTarget(format!(
                    "The way {} is blocked.",
                    direction.label()
                )))
            }
        }
    }

    fn enter_level(&mut self, direction: StairDirection) {
        let depth = self.dungeon.depth();
        let modifiers = self.player.modifiers().len();
        self.player.on_level_change(depth);
        self.player.set_position(self.dungeon.player_start_position());
        self.populate_monsters();

        let verb = match direction {
            StairDirection::Down => "descend",
            StairDirection::Up => "climb",
        };
        let mut message = format!("You {} to depth {}.", verb, depth);
        if self.player.modifiers().len() < modifiers {
            message.push_str(" The magic of the previous floor fades.");
        }
        self.player.set_status(message);
    }

    fn populate_monsters(&mut self) {
        let count = self.config.monster_count(self.dungeon.depth());
        self.monsters
            .populate(self.dungeon.level(), count, &mut self.rng);
    }

    fn greet(&mut self) {
        let message = format!("You enter depth {} of the dungeon.", self.dungeon.depth());
        self.player.set_status(message.clone());
        self.messages = vec![message];
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn level(&self) -> &Level {
        self.dungeon.level()
    }

    pub fn monsters(&self) -> &MonsterManager {
        &self.monsters
    }

    pub fn monsters_mut(&mut self) -> &mut MonsterManager {
        &mut self.monsters
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn stats(&self) -> PlayerStats {
        self.player.stats()
    }

    /// The active floor with monsters and the player drawn on top.
    ///
    /// Start markers are drawn as floor.
    pub fn render_grid(&self) -> Vec<Vec<char>> {
        let level = self.dungeon.level();
        let mut grid = level.to_char_grid();
        for pos in level.positions_of(Tile::PlayerStart) {
            grid[pos.y as usize][pos.x as usize] = Tile::Floor.symbol();
        }
        self.monsters.render_overlay(&mut grid);

        let pos = self.player.position();
        if level.is_valid_position(pos) {
            grid[pos.y as usize][pos.x as usize] = '@';
        }
        grid
    }

    /// Messages produced by the last call to [`GameState::perform`].
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn turn_number(&self) -> u64 {
        self.turn_number
    }

    pub fn completion_state(&self) -> GameCompletionState {
        self.completion_state
    }

    /// Checks if the game has ended.
    pub fn is_game_ended(&self) -> bool {
        self.completion_state != GameCompletionState::Playing
    }
}
