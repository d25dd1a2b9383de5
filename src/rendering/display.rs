//! # Display Management
//!
//! Plain-text frames of the game: the map with monsters and the player drawn
//! on top, a stats panel and the recent message history.

use crate::game::{GameCompletionState, GameState, Tile};

/// Text display for the game.
///
/// Keeps a bounded message history between frames. [`TextDisplay::render`]
/// only reads the game state.
#[derive(Debug, Clone)]
pub struct TextDisplay {
    /// Whether the inventory listing is drawn under the map
    pub show_inventory: bool,
    /// Message history, oldest first
    pub messages: Vec<String>,
    /// Maximum number of messages to keep
    pub max_messages: usize,
    /// Number of recent messages drawn per frame
    pub visible_messages: usize,
}

impl Default for TextDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TextDisplay {
    /// Creates a display with an empty message history.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{GameConfig, GameState, TextDisplay};
    ///
    /// let game = GameState::new(GameConfig::for_testing(4)).unwrap();
    /// let frame = TextDisplay::new().render(&game);
    /// assert!(frame.contains('@'));
    /// assert!(frame.contains("HP 20/20"));
    /// ```
    pub fn new() -> Self {
        Self {
            show_inventory: false,
            messages: Vec::new(),
            max_messages: 100,
            visible_messages: 3,
        }
    }

    /// Adds a message to the message history.
    pub fn add_message(&mut self, message: String) {
        self.messages.push(message);

        // Keep only the most recent messages
        if self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }

    /// Copies the messages of the last turn into the history.
    pub fn record_turn(&mut self, game_state: &GameState) {
        for message in game_state.messages() {
            self.add_message(message.clone());
        }
    }

    /// Renders the complete frame.
    pub fn render(&self, game_state: &GameState) -> String {
        let mut lines = Vec::new();
        lines.push(format!(
            "DELVE  Depth {}/{}  Turn {}",
            game_state.dungeon().depth(),
            game_state.dungeon().level_count(),
            game_state.turn_number()
        ));

        lines.extend(
            game_state
                .render_grid()
                .into_iter()
                .map(|row| row.into_iter().collect::<String>()),
        );

        lines.push(self.stats_line(game_state));
        lines.push(self.standing_on(game_state));
        lines.extend(self.recent_messages(game_state));

        if self.show_inventory {
            lines.extend(self.inventory_lines(game_state));
        }
        if let Some(ending) = ending_banner(game_state.completion_state()) {
            lines.push(ending.to_string());
        }

        lines.join("\n")
    }

    fn stats_line(&self, game_state: &GameState) -> String {
        let stats = game_state.stats();
        format!(
            "HP {}/{}  Hunger {:.1}/{:.0}  Lvl {} ({}/{} XP)  Str {}  Arm {}  Gold {}",
            stats.hp,
            stats.max_hp,
            stats.hunger,
            stats.max_hunger,
            stats.level,
            stats.experience,
            stats.exp_to_next,
            stats.strength,
            stats.armor,
            stats.gold
        )
    }

    fn standing_on(&self, game_state: &GameState) -> String {
        let tile = game_state.level().get_tile(game_state.player().position());
        let name = match tile {
            Some(Tile::StairsUp) => "Stairs Up",
            Some(Tile::StairsDown) => "Stairs Down",
            Some(Tile::Corridor) => "Corridor",
            Some(Tile::Item) => "an item",
            _ => "Floor",
        };
        format!("Standing on: {}", name)
    }

    /// The last few history messages, or the status line when the history is empty.
    fn recent_messages(&self, game_state: &GameState) -> Vec<String> {
        if self.messages.is_empty() {
            let status = game_state.player().status_message();
            return if status.is_empty() {
                Vec::new()
            } else {
                vec![status.to_string()]
            };
        }

        let start = self.messages.len().saturating_sub(self.visible_messages);
        self.messages[start..].to_vec()
    }

    fn inventory_lines(&self, game_state: &GameState) -> Vec<String> {
        let player = game_state.player();
        let mut lines = vec![format!(
            "Inventory ({}/{}):",
            player.inventory().len(),
            player.capacity()
        )];

        if player.inventory().is_empty() {
            lines.push("  (empty)".to_string());
        }
        for (index, item) in player.inventory().iter().enumerate() {
            lines.push(format!(
                "  [{}] {} {} - {}",
                index,
                item.symbol(),
                item.display_name(),
                item.display_description()
            ));
        }

        let weapon = player.equipped_weapon().map_or("none", |item| item.name());
        let armor = player.equipped_armor().map_or("none", |item| item.name());
        lines.push(format!("Weapon: {}  Armor: {}", weapon, armor));
        lines
    }
}

fn ending_banner(state: GameCompletionState) -> Option<&'static str> {
    match state {
        GameCompletionState::Playing => None,
        GameCompletionState::EscapedEarly => Some("*** You escaped the dungeon. ***"),
        GameCompletionState::CompletedDungeon => Some("*** You conquered the dungeon! ***"),
        GameCompletionState::PlayerDied => Some("*** You have died. ***"),
    }
}
