//! # Input Module
//!
//! Text command parsing for player interactions.
//!
//! A line typed by the player becomes a [`PlayerInput`], which
//! [`InputHandler::input_to_action`] turns into a [`PlayerAction`] for the
//! turn engine. Inputs that only concern the interface (help, inventory, quit)
//! have no action.

use crate::game::{Direction, EquipmentSlot, GameState, ItemCategory, PlayerAction};
use crate::{DelveError, DelveResult};
use std::path::Path;

/// Command summary shown by the `?` command.
pub const HELP_TEXT: &str = "\
Movement:  w/a/s/d or h/j/k/l, diagonals y/u/b/n
Attack:    f <direction>        e.g. `f d`
Items:     u <slot> use   e <slot> equip   x <slot> drop
Unequip:   r w (weapon) or r a (armor)
Stairs:    > descend   < ascend
Other:     . wait   i inventory   ? help   q quit";

/// Input handler for processing player commands.
///
/// Handles typed commands and converts them to game actions that can be
/// processed by the game state.
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjkl, yubn)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Direction, InputHandler, PlayerInput};
    ///
    /// let input_handler = InputHandler::new();
    /// assert_eq!(input_handler.parse("k"), Some(PlayerInput::Move(Direction::North)));
    /// assert_eq!(input_handler.parse("u 2"), Some(PlayerInput::Use(2)));
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// Parses one command line. Returns None for blank or unknown commands.
    pub fn parse(&self, line: &str) -> Option<PlayerInput> {
        let lowered = line.trim().to_lowercase();
        let mut tokens = lowered.split_whitespace();
        let command = tokens.next()?;
        let argument = tokens.next();
        if tokens.next().is_some() {
            return None;
        }

        match (command, argument) {
            ("f", Some(direction)) => self.direction_for(direction).map(PlayerInput::Attack),
            ("u", Some(index)) => index.parse().ok().map(PlayerInput::Use),
            ("e", Some(index)) => index.parse().ok().map(PlayerInput::Equip),
            ("x", Some(index)) => index.parse().ok().map(PlayerInput::Drop),
            ("r", Some("w" | "weapon")) => Some(PlayerInput::Unequip(EquipmentSlot::Weapon)),
            ("r", Some("a" | "armor")) => Some(PlayerInput::Unequip(EquipmentSlot::Armor)),
            (">", None) => Some(PlayerInput::Descend),
            ("<", None) => Some(PlayerInput::Ascend),
            (".", None) => Some(PlayerInput::Wait),
            ("i", None) => Some(PlayerInput::ShowInventory),
            ("?", None) => Some(PlayerInput::Help),
            ("q" | "quit", None) => Some(PlayerInput::Quit),
            (key, None) => self.direction_for(key).map(PlayerInput::Move),
            _ => None,
        }
    }

    fn direction_for(&self, key: &str) -> Option<Direction> {
        let direction = match key {
            "w" | "north" => Direction::North,
            "s" | "south" => Direction::South,
            "a" | "west" => Direction::West,
            "d" | "east" => Direction::East,
            "nw" => Direction::Northwest,
            "ne" => Direction::Northeast,
            "sw" => Direction::Southwest,
            "se" => Direction::Southeast,
            _ if !self.vi_keys_enabled => return None,
            "k" => Direction::North,
            "j" => Direction::South,
            "h" => Direction::West,
            "l" => Direction::East,
            "y" => Direction::Northwest,
            "u" => Direction::Northeast,
            "b" => Direction::Southwest,
            "n" => Direction::Southeast,
            _ => return None,
        };
        Some(direction)
    }

    /// Converts player input to a concrete game action.
    ///
    /// Equip picks the slot from the category of the chosen item. Inputs that
    /// only affect the interface produce no action.
    pub fn input_to_action(
        &self,
        input: PlayerInput,
        game_state: &GameState,
    ) -> Option<PlayerAction> {
        match input {
            PlayerInput::Move(direction) => Some(PlayerAction::Move(direction)),
            PlayerInput::Attack(direction) => Some(PlayerAction::Attack(direction)),
            PlayerInput::Use(index) => Some(PlayerAction::UseItem(index)),
            PlayerInput::Equip(index) => {
                let category = game_state.player().inventory().get(index).map(|item| item.category());
                let slot = match category {
                    Some(ItemCategory::Armor) => EquipmentSlot::Armor,
                    _ => EquipmentSlot::Weapon,
                };
                Some(PlayerAction::Equip(slot, index))
            }
            PlayerInput::Unequip(slot) => Some(PlayerAction::Unequip(slot)),
            PlayerInput::Drop(index) => Some(PlayerAction::Drop(index)),
            PlayerInput::Descend => Some(PlayerAction::Descend),
            PlayerInput::Ascend => Some(PlayerAction::Ascend),
            PlayerInput::Wait => Some(PlayerAction::Wait),
            PlayerInput::ShowInventory | PlayerInput::Help | PlayerInput::Quit => None,
        }
    }
}

/// Player input types that can be processed by the input handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Move in a given direction
    Move(Direction),
    /// Attack the neighbouring tile in a direction
    Attack(Direction),
    /// Use the item in an inventory slot
    Use(usize),
    /// Equip the item in an inventory slot
    Equip(usize),
    Unequip(EquipmentSlot),
    /// Drop the item in an inventory slot
    Drop(usize),
    Descend,
    Ascend,
    /// Wait/rest for one turn
    Wait,
    /// Toggle the inventory listing
    ShowInventory,
    /// Show help information
    Help,
    /// Quit the game
    Quit,
}

/// Reads level description files in the given order.
pub fn read_level_files<P: AsRef<Path>>(paths: &[P]) -> DelveResult<Vec<String>> {
    paths
        .iter()
        .map(|path| std::fs::read_to_string(path).map_err(DelveError::from))
        .collect()
}
