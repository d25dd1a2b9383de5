//! # Player Module
//!
//! The player character and every action it can resolve.
//!
//! Action entry points (`move_in`, `attack`, `use_consumable`, ...) return a
//! success flag and record a status message. Rejected actions also record an
//! [`ActionError`] in [`Player::last_error`]. Internally each entry point is a
//! `try_*` method returning [`ActionResult`], folded into the status fields by
//! a single helper.
//!
//! Max health, strength and armor are never stored. They are derived on
//! demand from the base stats, equipment and depth-scoped [`StatModifier`]s.

use crate::{
    config, Direction, EquipmentSlot, Item, ItemCategory, ItemEffect, ItemFactory, Level, Monster,
    MonsterManager, Position, Tile,
};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Why a player action was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionError {
    #[error("You can't go that way.")]
    OutOfBounds,

    #[error("You bump into a wall.")]
    Blocked,

    #[error("Your inventory is full ({capacity} items).")]
    InventoryFull { capacity: usize },

    #[error("There is no item in slot {index}.")]
    InvalidIndex { index: usize },

    #[error("{0}")]
    InvalidTarget(String),

    #[error("You are dead.")]
    PlayerDead,
}

/// Outcome of a player action: the status message, or why it was rejected.
pub type ActionResult = Result<String, ActionError>;

/// Kinds of temporary stat changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatModifierKind {
    MaxHealthMultiplier(i32),
    StrengthMultiplier(i32),
    StrengthBonus(i32),
}

/// A stat change that lasts while the player stays on `depth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatModifier {
    pub kind: StatModifierKind,
    pub depth: u32,
}

/// Read-only snapshot of the numbers a display needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub hp: i32,
    pub max_hp: i32,
    pub hunger: f32,
    pub max_hunger: f32,
    pub level: u32,
    pub experience: u32,
    pub exp_to_next: u32,
    pub strength: i32,
    pub armor: i32,
    pub gold: u32,
    pub depth: u32,
    pub inventory_used: usize,
    pub inventory_capacity: usize,
}

/// The player character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    position: Position,
    hp: i32,
    base_max_hp: i32,
    hunger: f32,
    max_hunger: f32,
    level: u32,
    experience: u32,
    exp_to_next: u32,
    base_strength: i32,
    gold: u32,
    inventory: Vec<Item>,
    capacity: usize,
    weapon: Option<Item>,
    armor: Option<Item>,
    modifiers: Vec<StatModifier>,
    identified_scrolls: HashSet<ItemEffect>,
    depth: u32,
    status_message: String,
    last_error: Option<ActionError>,
}

impl Player {
    /// Creates a fresh level-1 player on depth 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Player, Position};
    ///
    /// let player = Player::new(Position::new(1, 1));
    /// assert_eq!(player.hp(), 20);
    /// assert_eq!(player.strength(), 5);
    /// assert_eq!(player.capacity(), 10);
    /// ```
    pub fn new(position: Position) -> Self {
        Self::with_capacity(position, config::DEFAULT_INVENTORY_CAPACITY)
    }

    pub fn with_capacity(position: Position, capacity: usize) -> Self {
        Self {
            position,
            hp: config::DEFAULT_PLAYER_HEALTH,
            base_max_hp: config::DEFAULT_PLAYER_HEALTH,
            hunger: config::DEFAULT_MAX_HUNGER,
            max_hunger: config::DEFAULT_MAX_HUNGER,
            level: 1,
            experience: 0,
            exp_to_next: config::FIRST_LEVEL_THRESHOLD,
            base_strength: config::DEFAULT_PLAYER_STRENGTH,
            gold: 0,
            inventory: Vec::new(),
            capacity,
            weapon: None,
            armor: None,
            modifiers: Vec::new(),
            identified_scrolls: HashSet::new(),
            depth: 1,
            status_message: String::new(),
            last_error: None,
        }
    }

    /// Starts over as a fresh character at `position`, keeping the capacity.
    pub fn reset(&mut self, position: Position) {
        *self = Self::with_capacity(position, self.capacity);
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Places the player without resolving tile effects.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    /// Sets current health, clamped to `0..=max_hp`.
    pub fn set_health(&mut self, hp: i32) {
        self.hp = hp.clamp(0, self.max_hp());
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn base_max_hp(&self) -> i32 {
        self.base_max_hp
    }

    /// Base max health times every active max-health multiplier.
    pub fn max_hp(&self) -> i32 {
        let factor: i32 = self
            .modifiers
            .iter()
            .filter_map(|modifier| match modifier.kind {
                StatModifierKind::MaxHealthMultiplier(factor) => Some(factor),
                _ => None,
            })
            .product();
        self.base_max_hp * factor
    }

    pub fn hunger(&self) -> f32 {
        self.hunger
    }

    pub fn max_hunger(&self) -> f32 {
        self.max_hunger
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn exp_to_next(&self) -> u32 {
        self.exp_to_next
    }

    pub fn base_strength(&self) -> i32 {
        self.base_strength
    }

    /// Base strength plus weapon and bonuses, times every strength multiplier.
    pub fn strength(&self) -> i32 {
        let weapon_bonus = self.weapon.as_ref().map_or(0, Item::magnitude);
        let mut bonus = 0;
        let mut factor = 1;
        for modifier in &self.modifiers {
            match modifier.kind {
                StatModifierKind::StrengthBonus(amount) => bonus += amount,
                StatModifierKind::StrengthMultiplier(multiplier) => factor *= multiplier,
                StatModifierKind::MaxHealthMultiplier(_) => {}
            }
        }
        (self.base_strength + weapon_bonus + bonus) * factor
    }

    /// Protection of the worn armor, 0 when none.
    pub fn armor(&self) -> i32 {
        self.armor.as_ref().map_or(0, Item::magnitude)
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn inventory(&self) -> &[Item] {
        &self.inventory
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn equipped_weapon(&self) -> Option<&Item> {
        self.weapon.as_ref()
    }

    pub fn equipped_armor(&self) -> Option<&Item> {
        self.armor.as_ref()
    }

    pub fn equipped(&self, slot: EquipmentSlot) -> Option<&Item> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
        }
    }

    pub fn modifiers(&self) -> &[StatModifier] {
        &self.modifiers
    }

    /// Whether scrolls with this effect are known by name.
    pub fn knows_scroll(&self, effect: ItemEffect) -> bool {
        self.identified_scrolls.contains(&effect)
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    pub fn last_error(&self) -> Option<&ActionError> {
        self.last_error.as_ref()
    }

    /// Records a rejected action and returns false.
    pub fn reject(&mut self, error: ActionError) -> bool {
        self.resolve(Err(error))
    }

    pub fn stats(&self) -> PlayerStats {
        PlayerStats {
            hp: self.hp,
            max_hp: self.max_hp(),
            hunger: self.hunger,
            max_hunger: self.max_hunger,
            level: self.level,
            experience: self.experience,
            exp_to_next: self.exp_to_next,
            strength: self.strength(),
            armor: self.armor(),
            gold: self.gold,
            depth: self.depth,
            inventory_used: self.inventory.len(),
            inventory_capacity: self.capacity,
        }
    }

    /// Steps one tile, or fights the hostile monster standing there.
    ///
    /// A surviving monster strikes back. Stepping spends hunger and triggers
    /// the tile underfoot once: pickups are collected and become floor.
    pub fn move_in(
        &mut self,
        direction: Direction,
        level: &mut Level,
        monsters: &mut MonsterManager,
        rng: &mut StdRng,
    ) -> bool {
        let result = self.try_move(direction, level, monsters, rng);
        self.resolve(result)
    }

    /// Strikes `target` without moving.
    pub fn attack(&mut self, target: Option<&mut Monster>, depth: u32, rng: &mut StdRng) -> bool {
        let result = self.try_attack(target, depth, rng);
        self.resolve(result)
    }

    /// Applies an incoming hit and returns the damage actually taken.
    ///
    /// Armor absorbs half its value, but every hit deals at least 1 damage.
    pub fn take_damage(&mut self, amount: i32) -> u32 {
        let dealt = (amount - self.armor() / 2).max(1);
        let was_alive = self.is_alive();
        self.hp = (self.hp - dealt).max(0);

        if self.hp == 0 {
            self.status_message = format!("You take {} damage and die...", dealt);
            if was_alive {
                warn!("Player died on depth {} at level {}", self.depth, self.level);
            }
        } else {
            self.status_message = format!("You take {} damage!", dealt);
        }
        dealt as u32
    }

    pub fn use_consumable(&mut self, index: usize) -> bool {
        let result = self.try_use(index);
        self.resolve(result)
    }

    pub fn equip_weapon(&mut self, index: usize) -> bool {
        self.equip(EquipmentSlot::Weapon, index)
    }

    pub fn equip_armor(&mut self, index: usize) -> bool {
        self.equip(EquipmentSlot::Armor, index)
    }

    /// Moves an inventory item into `slot`. A previously equipped item takes
    /// its inventory index.
    pub fn equip(&mut self, slot: EquipmentSlot, index: usize) -> bool {
        let result = self.try_equip(slot, index);
        self.resolve(result)
    }

    pub fn unequip_weapon(&mut self) -> bool {
        self.unequip(EquipmentSlot::Weapon)
    }

    pub fn unequip_armor(&mut self) -> bool {
        self.unequip(EquipmentSlot::Armor)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> bool {
        let result = self.try_unequip(slot);
        self.resolve(result)
    }

    pub fn drop_item(&mut self, index: usize) -> bool {
        let result = self.try_drop(index);
        self.resolve(result)
    }

    pub fn add_item(&mut self, item: Item) -> bool {
        let name = item.display_name().to_string();
        let result = self
            .store_item(item)
            .map(|_| format!("You pick up the {}.", name));
        self.resolve(result)
    }

    /// Passes the turn.
    pub fn wait(&mut self) -> bool {
        let result = self.ensure_alive().map(|_| "You wait.".to_string());
        self.resolve(result)
    }

    /// Adds experience and returns how many levels were gained.
    pub fn add_experience(&mut self, amount: u32) -> u32 {
        self.experience += amount;
        let mut gained = 0;
        while self.experience >= self.exp_to_next {
            self.level_up();
            gained += 1;
        }
        gained
    }

    /// Raises the level by one, carrying over excess experience.
    pub fn level_up(&mut self) {
        self.experience = self.experience.saturating_sub(self.exp_to_next);
        self.level += 1;
        self.exp_to_next =
            ((self.exp_to_next as f64 * config::LEVEL_UP_MULTIPLIER).floor() as u32).max(1);
        self.base_max_hp += config::LEVEL_UP_HEALTH;
        self.base_strength += config::LEVEL_UP_STRENGTH;
        self.hp = self.max_hp();
        info!("Player reached level {}", self.level);
    }

    /// Drops modifiers scoped to other floors. Returns false if the depth is unchanged.
    pub fn on_level_change(&mut self, new_depth: u32) -> bool {
        if new_depth == self.depth {
            return false;
        }

        let before = self.modifiers.len();
        self.modifiers.retain(|modifier| modifier.depth == new_depth);
        self.depth = new_depth;
        self.hp = self.hp.min(self.max_hp());

        if self.modifiers.len() != before {
            debug!("{} modifiers expired on leaving the floor", before - self.modifiers.len());
        }
        true
    }

    fn resolve(&mut self, result: ActionResult) -> bool {
        match result {
            Ok(message) => {
                self.status_message = message;
                self.last_error = None;
                true
            }
            Err(error) => {
                debug!("Action rejected: {:?}", error);
                self.status_message = error.to_string();
                self.last_error = Some(error);
                false
            }
        }
    }

    fn ensure_alive(&self) -> Result<(), ActionError> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(ActionError::PlayerDead)
        }
    }

    fn try_move(
        &mut self,
        direction: Direction,
        level: &mut Level,
        monsters: &mut MonsterManager,
        rng: &mut StdRng,
    ) -> ActionResult {
        self.ensure_alive()?;
        let target = self.position + direction.to_delta();
        let tile = level.get_tile(target).ok_or(ActionError::OutOfBounds)?;
        if !tile.is_walkable() {
            return Err(ActionError::Blocked);
        }

        if let Some(monster) = monsters.monster_at_mut(target) {
            if !monster.hostile {
                return Err(ActionError::InvalidTarget(format!(
                    "The {} is in your way.",
                    monster.name
                )));
            }
            return Ok(self.melee(monster, level.depth, rng));
        }

        self.position = target;
        let mut messages = Vec::new();
        if let Some(message) = self.spend_hunger() {
            messages.push(message);
        }
        if let Some(message) = self.enter_tile(tile, level, rng) {
            messages.push(message);
        }
        Ok(messages.join(" "))
    }

    fn try_attack(
        &mut self,
        target: Option<&mut Monster>,
        depth: u32,
        rng: &mut StdRng,
    ) -> ActionResult {
        self.ensure_alive()?;
        match target {
            Some(monster) if monster.is_alive() => Ok(self.strike(monster, depth, rng)),
            _ => Err(ActionError::InvalidTarget(
                "There is nothing there to attack.".to_string(),
            )),
        }
    }

    /// Player strikes first; a survivor answers.
    fn melee(&mut self, monster: &mut Monster, depth: u32, rng: &mut StdRng) -> String {
        let mut message = self.strike(monster, depth, rng);
        if monster.is_alive() {
            let dealt = self.take_damage(monster.attack_damage(rng));
            message.push_str(&format!(" The {} hits back for {} damage!", monster.name, dealt));
            if !self.is_alive() {
                message.push_str(" You die...");
            }
        }
        message
    }

    fn strike(&mut self, monster: &mut Monster, depth: u32, rng: &mut StdRng) -> String {
        let damage = self.strength() + rng.gen_range(0..=2);
        let dealt = monster.take_damage(damage);
        let mut message = format!("You hit the {} for {} damage.", monster.name, dealt);
        if !monster.is_alive() {
            message.push_str(&self.claim_kill(monster, depth, rng));
        }
        message
    }

    fn claim_kill(&mut self, monster: &Monster, depth: u32, rng: &mut StdRng) -> String {
        let gold = monster.exp_value / 3;
        self.gold += gold;
        let mut message = format!(
            " The {} dies! You gain {} experience and {} gold.",
            monster.name, monster.exp_value, gold
        );

        if rng.gen_bool(config::LOOT_DROP_CHANCE) {
            let item = ItemFactory::create_random_item(depth, rng);
            let name = item.display_name().to_string();
            match self.store_item(item) {
                Ok(()) => message.push_str(&format!(" It dropped a {}, which you take.", name)),
                Err(_) => message.push_str(&format!(" It dropped a {}, but your pack is full.", name)),
            }
        }

        if self.add_experience(monster.exp_value) > 0 {
            message.push_str(&format!(" You reach level {}!", self.level));
        }
        message
    }

    fn spend_hunger(&mut self) -> Option<String> {
        if self.hunger > 0.0 {
            self.hunger = (self.hunger - config::HUNGER_PER_STEP).max(0.0);
            return (self.hunger <= 0.0).then(|| "You are starving!".to_string());
        }

        let dealt = self.take_damage(config::STARVATION_DAMAGE);
        Some(if self.is_alive() {
            format!("You are starving! You take {} damage.", dealt)
        } else {
            "You starve to death...".to_string()
        })
    }

    fn enter_tile(&mut self, tile: Tile, level: &mut Level, rng: &mut StdRng) -> Option<String> {
        match tile {
            Tile::Item => {
                if self.inventory.len() >= self.capacity {
                    return Some(format!(
                        "There is an item here, but your inventory is full ({} items).",
                        self.capacity
                    ));
                }
                level.take_pickup(self.position);
                let item = ItemFactory::create_random_item(level.depth, rng);
                let name = item.display_name().to_string();
                Some(match self.store_item(item) {
                    Ok(()) => format!("You pick up a {}.", name),
                    Err(error) => error.to_string(),
                })
            }
            Tile::Gold => {
                level.take_pickup(self.position);
                let amount = level.depth.max(1) * rng.gen_range(5..=15);
                self.gold += amount;
                Some(format!("You pick up {} gold.", amount))
            }
            Tile::StairsDown => Some("There is a staircase leading down here.".to_string()),
            Tile::StairsUp => Some("There is a staircase leading up here.".to_string()),
            _ => None,
        }
    }

    fn store_item(&mut self, mut item: Item) -> Result<(), ActionError> {
        if self.inventory.len() >= self.capacity {
            return Err(ActionError::InventoryFull {
                capacity: self.capacity,
            });
        }
        if item.category() == ItemCategory::Scroll && self.knows_scroll(item.effect()) {
            item.identify();
        }
        self.inventory.push(item);
        Ok(())
    }

    fn try_use(&mut self, index: usize) -> ActionResult {
        self.ensure_alive()?;
        let item = self
            .inventory
            .get(index)
            .ok_or(ActionError::InvalidIndex { index })?;
        if !item.is_consumable() {
            return Err(ActionError::InvalidTarget(format!(
                "You can't use the {}. Try equipping it.",
                item.display_name()
            )));
        }

        let item = self.inventory.remove(index);
        let effect = self.apply_effect(&item);

        if item.category() != ItemCategory::Scroll {
            return Ok(format!("You use the {}. {}", item.display_name(), effect));
        }

        let was_known = item.is_identified();
        self.learn_scroll(item.effect());
        if was_known {
            Ok(format!("You read the {}. {}", item.name(), effect))
        } else {
            Ok(format!(
                "You read the {}. It was a {}! {}",
                item.display_name(),
                item.name(),
                effect
            ))
        }
    }

    fn apply_effect(&mut self, item: &Item) -> String {
        let magnitude = item.magnitude();
        match item.effect() {
            ItemEffect::Health => {
                let before = self.hp;
                self.hp = (self.hp + magnitude).min(self.max_hp());
                format!("You recover {} health.", self.hp - before)
            }
            ItemEffect::Hunger => {
                let before = self.hunger;
                self.hunger = (self.hunger + magnitude as f32).min(self.max_hunger);
                format!("You feel less hungry (+{:.1}).", self.hunger - before)
            }
            ItemEffect::Strength => {
                self.add_modifier(StatModifierKind::StrengthBonus(magnitude));
                format!("You feel stronger! (+{} strength on this floor)", magnitude)
            }
            ItemEffect::Giant => {
                self.add_modifier(StatModifierKind::MaxHealthMultiplier(2));
                self.hp = self.max_hp();
                "You grow to giant size! Your max HP doubles on this floor.".to_string()
            }
            ItemEffect::Berserk => {
                self.add_modifier(StatModifierKind::StrengthMultiplier(2));
                "A berserk rage doubles your strength on this floor.".to_string()
            }
            ItemEffect::Armor | ItemEffect::None => "Nothing happens.".to_string(),
        }
    }

    fn add_modifier(&mut self, kind: StatModifierKind) {
        self.modifiers.push(StatModifier {
            kind,
            depth: self.depth,
        });
    }

    /// Marks a scroll effect as known and reveals every carried copy.
    fn learn_scroll(&mut self, effect: ItemEffect) {
        self.identified_scrolls.insert(effect);
        for item in self
            .inventory
            .iter_mut()
            .filter(|item| item.category() == ItemCategory::Scroll && item.effect() == effect)
        {
            item.identify();
        }
    }

    fn try_equip(&mut self, slot: EquipmentSlot, index: usize) -> ActionResult {
        self.ensure_alive()?;
        let item = self
            .inventory
            .get(index)
            .ok_or(ActionError::InvalidIndex { index })?;
        if item.category() != slot.category() {
            let wanted = match slot {
                EquipmentSlot::Weapon => "a weapon",
                EquipmentSlot::Armor => "armor",
            };
            return Err(ActionError::InvalidTarget(format!(
                "The {} is not {}.",
                item.display_name(),
                wanted
            )));
        }

        let item = self.inventory.remove(index);
        let name = item.name().to_string();
        let slot_item = match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
        };

        match slot_item.replace(item) {
            Some(previous) => {
                let message = format!("You swap your {} for the {}.", previous.name(), name);
                self.inventory.insert(index, previous);
                Ok(message)
            }
            None => Ok(format!("You equip the {}.", name)),
        }
    }

    fn try_unequip(&mut self, slot: EquipmentSlot) -> ActionResult {
        self.ensure_alive()?;
        if self.equipped(slot).is_none() {
            return Err(ActionError::InvalidTarget(format!(
                "You have no {} equipped.",
                slot.label()
            )));
        }
        if self.inventory.len() >= self.capacity {
            return Err(ActionError::InventoryFull {
                capacity: self.capacity,
            });
        }

        let slot_item = match slot {
            EquipmentSlot::Weapon => self.weapon.take(),
            EquipmentSlot::Armor => self.armor.take(),
        };
        match slot_item {
            Some(item) => {
                let message = format!("You unequip the {}.", item.name());
                self.inventory.push(item);
                Ok(message)
            }
            None => Err(ActionError::InvalidTarget(format!(
                "You have no {} equipped.",
                slot.label()
            ))),
        }
    }

    fn try_drop(&mut self, index: usize) -> ActionResult {
        self.ensure_alive()?;
        if index >= self.inventory.len() {
            return Err(ActionError::InvalidIndex { index });
        }
        let item = self.inventory.remove(index);
        Ok(format!("You drop the {}.", item.display_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConsumableKind, MonsterArchetype, MonsterId};
    use rand::SeedableRng;

    const ROOM: &str = "LEVEL 1
#######
#P$!..#
#.....#
#..>..#
#######";

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1234)
    }

    fn room() -> Level {
        Level::parse(ROOM).unwrap()
    }

    fn dummy(position: Position, hp: i32, defense: i32, exp: u32) -> Monster {
        Monster::new(
            MonsterId::from_u128(position.x as u128 * 100 + position.y as u128),
            "Goblin Scout",
            MonsterArchetype::Humanoid,
            position,
            hp,
            2,
            defense,
            exp,
        )
    }

    #[test]
    fn test_new_player_defaults() {
        let player = Player::new(Position::new(1, 1));
        let stats = player.stats();
        assert_eq!(stats.hp, 20);
        assert_eq!(stats.max_hp, 20);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.exp_to_next, 10);
        assert_eq!(stats.armor, 0);
        assert_eq!(stats.depth, 1);
        assert!(player.last_error().is_none());
    }

    #[test]
    fn test_move_into_wall_is_blocked() {
        let mut level = room();
        let mut monsters = MonsterManager::new();
        let mut player = Player::new(Position::new(1, 1));

        assert!(!player.move_in(Direction::North, &mut level, &mut monsters, &mut rng()));
        assert_eq!(player.position(), Position::new(1, 1));
        assert_eq!(player.last_error(), Some(&ActionError::Blocked));
        assert!(player.status_message().contains("bump"));
        assert_eq!(player.hunger(), 20.0);
    }

    #[test]
    fn test_move_off_grid_is_out_of_bounds() {
        let mut level = Level::parse("LEVEL 1\n..\n..").unwrap();
        let mut monsters = MonsterManager::new();
        let mut player = Player::new(Position::new(0, 0));

        assert!(!player.move_in(Direction::West, &mut level, &mut monsters, &mut rng()));
        assert_eq!(player.last_error(), Some(&ActionError::OutOfBounds));
    }

    #[test]
    fn test_move_spends_hunger() {
        let mut level = room();
        let mut monsters = MonsterManager::new();
        let mut player = Player::new(Position::new(1, 1));

        assert!(player.move_in(Direction::South, &mut level, &mut monsters, &mut rng()));
        assert_eq!(player.position(), Position::new(1, 2));
        assert!((player.hunger() - 19.9).abs() < 1e-4);
        assert!(player.last_error().is_none());
    }

    #[test]
    fn test_starvation_damage() {
        let mut level = room();
        let mut monsters = MonsterManager::new();
        let mut player = Player::new(Position::new(1, 1));
        player.hunger = 0.0;

        assert!(player.move_in(Direction::South, &mut level, &mut monsters, &mut rng()));
        assert_eq!(player.hp(), 19);
        assert!(player.status_message().contains("starving"));
    }

    #[test]
    fn test_gold_pickup_clears_tile() {
        let mut level = room();
        let mut monsters = MonsterManager::new();
        let mut player = Player::new(Position::new(1, 1));

        assert!(player.move_in(Direction::East, &mut level, &mut monsters, &mut rng()));
        assert!((5..=15).contains(&player.gold()));
        assert_eq!(level.get_tile(Position::new(2, 1)), Some(Tile::Floor));
    }

    #[test]
    fn test_item_pickup_clears_tile() {
        let mut level = room();
        let mut monsters = MonsterManager::new();
        let mut player = Player::new(Position::new(2, 1));

        assert!(player.move_in(Direction::East, &mut level, &mut monsters, &mut rng()));
        assert_eq!(player.inventory().len(), 1);
        assert_eq!(level.get_tile(Position::new(3, 1)), Some(Tile::Floor));
    }

    #[test]
    fn test_item_stays_when_inventory_full() {
        let mut level = room();
        let mut monsters = MonsterManager::new();
        let mut player = Player::with_capacity(Position::new(2, 1), 1);
        assert!(player.add_item(Item::from_kind(ConsumableKind::Apple)));

        assert!(player.move_in(Direction::East, &mut level, &mut monsters, &mut rng()));
        assert_eq!(player.position(), Position::new(3, 1));
        assert_eq!(player.inventory().len(), 1);
        assert_eq!(level.get_tile(Position::new(3, 1)), Some(Tile::Item));
        assert!(player.status_message().contains("full"));
    }

    #[test]
    fn test_stairs_message() {
        let mut level = room();
        let mut monsters = MonsterManager::new();
        let mut player = Player::new(Position::new(3, 2));

        assert!(player.move_in(Direction::South, &mut level, &mut monsters, &mut rng()));
        assert!(player.status_message().contains("leading down"));
    }

    #[test]
    fn test_moving_into_hostile_monster_fights() {
        let mut level = room();
        let mut monsters = MonsterManager::new();
        assert!(monsters.spawn(dummy(Position::new(1, 2), 100, 0, 5)));
        let mut player = Player::new(Position::new(1, 1));

        assert!(player.move_in(Direction::South, &mut level, &mut monsters, &mut rng()));
        assert_eq!(player.position(), Position::new(1, 1));

        let monster = monsters.monster_at(Position::new(1, 2)).unwrap();
        assert!((93..=95).contains(&monster.hp()));
        // The survivor strikes back
        assert!(player.hp() < 20);
        assert!(player.status_message().contains("hits back"));
    }

    #[test]
    fn test_passive_monster_blocks() {
        let mut level = room();
        let mut monsters = MonsterManager::new();
        let mut passive = dummy(Position::new(1, 2), 10, 0, 5);
        passive.hostile = false;
        monsters.spawn(passive);
        let mut player = Player::new(Position::new(1, 1));

        assert!(!player.move_in(Direction::South, &mut level, &mut monsters, &mut rng()));
        assert!(matches!(player.last_error(), Some(ActionError::InvalidTarget(_))));
        assert_eq!(monsters.monster_at(Position::new(1, 2)).unwrap().hp(), 10);
    }

    #[test]
    fn test_attack_requires_live_target() {
        let mut player = Player::new(Position::new(1, 1));
        assert!(!player.attack(None, 1, &mut rng()));
        assert!(matches!(player.last_error(), Some(ActionError::InvalidTarget(_))));

        let mut corpse = dummy(Position::new(1, 2), 1, 0, 5);
        corpse.take_damage(10);
        assert!(!player.attack(Some(&mut corpse), 1, &mut rng()));
    }

    #[test]
    fn test_attack_kill_rewards() {
        let mut player = Player::new(Position::new(1, 1));
        let mut monster = dummy(Position::new(1, 2), 1, 0, 9);

        assert!(player.attack(Some(&mut monster), 1, &mut rng()));
        assert!(!monster.is_alive());
        assert_eq!(player.gold(), 3);
        assert_eq!(player.experience(), 9);
        assert!(player.status_message().contains("dies"));
    }

    #[test]
    fn test_take_damage_messages_and_floor() {
        let mut player = Player::new(Position::new(1, 1));
        player.set_health(10);
        assert_eq!(player.take_damage(4), 4);
        assert_eq!(player.hp(), 6);
        assert!(player.status_message().contains("4 damage"));

        player.take_damage(50);
        assert_eq!(player.hp(), 0);
        assert!(!player.is_alive());
        assert!(player.status_message().contains("die"));

        let mut level = room();
        let mut monsters = MonsterManager::new();
        assert!(!player.move_in(Direction::South, &mut level, &mut monsters, &mut rng()));
        assert_eq!(player.last_error(), Some(&ActionError::PlayerDead));
    }

    #[test]
    fn test_armor_absorbs_half() {
        let mut player = Player::new(Position::new(1, 1));
        player.add_item(Item::armor("Plate Armor", 6));
        assert!(player.equip_armor(0));
        assert_eq!(player.armor(), 6);
        assert_eq!(player.take_damage(5), 2);
        assert_eq!(player.take_damage(2), 1);
    }

    #[test]
    fn test_health_potion_clamps() {
        let mut player = Player::new(Position::new(1, 1));
        player.set_health(18);
        player.add_item(Item::from_kind(ConsumableKind::HealingPotion));

        assert!(player.use_consumable(0));
        assert_eq!(player.hp(), 20);
        assert!(player.inventory().is_empty());
    }

    #[test]
    fn test_food_clamps_hunger() {
        let mut player = Player::new(Position::new(1, 1));
        player.hunger = 17.0;
        player.add_item(Item::from_kind(ConsumableKind::CookedMeat));
        assert!(player.use_consumable(0));
        assert_eq!(player.hunger(), 20.0);
    }

    #[test]
    fn test_use_rejections() {
        let mut player = Player::new(Position::new(1, 1));
        assert!(!player.use_consumable(0));
        assert_eq!(player.last_error(), Some(&ActionError::InvalidIndex { index: 0 }));

        player.add_item(Item::weapon("Dagger", 1));
        assert!(!player.use_consumable(0));
        assert!(matches!(player.last_error(), Some(ActionError::InvalidTarget(_))));
        assert_eq!(player.inventory().len(), 1);
    }

    #[test]
    fn test_strength_potion_is_floor_scoped() {
        let mut player = Player::new(Position::new(1, 1));
        player.add_item(Item::from_kind(ConsumableKind::StrengthPotion));
        assert!(player.use_consumable(0));
        assert_eq!(player.strength(), 7);

        assert!(player.on_level_change(2));
        assert_eq!(player.strength(), 5);
    }

    #[test]
    fn test_berserk_scroll_doubles_strength() {
        let mut player = Player::new(Position::new(1, 1));
        player.add_item(Item::weapon("Short Sword", 2));
        player.equip_weapon(0);
        player.add_item(Item::scroll(ItemEffect::Berserk, 50, "scroll labeled VERR YED"));

        assert!(player.use_consumable(0));
        assert_eq!(player.strength(), 14);
        assert!(player.status_message().contains("Scroll of Berserking"));
    }

    #[test]
    fn test_reading_a_scroll_identifies_copies() {
        let mut player = Player::new(Position::new(1, 1));
        player.add_item(Item::scroll(ItemEffect::Giant, 50, "scroll labeled FOO"));
        player.add_item(Item::scroll(ItemEffect::Giant, 50, "scroll labeled FOO"));
        player.add_item(Item::scroll(ItemEffect::Berserk, 50, "scroll labeled ZY"));

        assert!(player.use_consumable(0));
        assert!(player.knows_scroll(ItemEffect::Giant));
        assert!(player.inventory()[0].is_identified());
        assert!(!player.inventory()[1].is_identified());

        // Later pickups of a known scroll arrive identified
        player.add_item(Item::scroll(ItemEffect::Giant, 50, "scroll labeled FOO"));
        assert!(player.inventory()[2].is_identified());
    }

    #[test]
    fn test_equip_swaps_into_same_index() {
        let mut player = Player::new(Position::new(1, 1));
        player.add_item(Item::weapon("Dagger", 1));
        player.add_item(Item::from_kind(ConsumableKind::Bread));
        player.add_item(Item::weapon("Long Sword", 3));

        assert!(player.equip_weapon(0));
        assert_eq!(player.equipped_weapon().unwrap().name(), "Dagger");
        assert_eq!(player.inventory().len(), 2);
        assert_eq!(player.strength(), 6);

        assert!(player.equip_weapon(1));
        assert_eq!(player.equipped_weapon().unwrap().name(), "Long Sword");
        assert_eq!(player.inventory()[1].name(), "Dagger");
        assert_eq!(player.strength(), 8);
    }

    #[test]
    fn test_equip_wrong_category() {
        let mut player = Player::new(Position::new(1, 1));
        player.add_item(Item::weapon("Dagger", 1));
        assert!(!player.equip_armor(0));
        assert!(matches!(player.last_error(), Some(ActionError::InvalidTarget(_))));
        assert!(player.equipped_armor().is_none());
    }

    #[test]
    fn test_unequip_rules() {
        let mut player = Player::with_capacity(Position::new(1, 1), 1);
        assert!(!player.unequip_weapon());
        assert!(matches!(player.last_error(), Some(ActionError::InvalidTarget(_))));

        player.add_item(Item::armor("Chain Mail", 2));
        assert!(player.equip_armor(0));
        player.add_item(Item::from_kind(ConsumableKind::Apple));

        assert!(!player.unequip_armor());
        assert_eq!(player.last_error(), Some(&ActionError::InventoryFull { capacity: 1 }));
        assert!(player.equipped_armor().is_some());

        player.drop_item(0);
        assert!(player.unequip_armor());
        assert_eq!(player.armor(), 0);
        assert_eq!(player.inventory()[0].name(), "Chain Mail");
    }

    #[test]
    fn test_drop_item() {
        let mut player = Player::new(Position::new(1, 1));
        assert!(!player.drop_item(3));
        assert_eq!(player.last_error(), Some(&ActionError::InvalidIndex { index: 3 }));

        player.add_item(Item::from_kind(ConsumableKind::Apple));
        assert!(player.drop_item(0));
        assert!(player.inventory().is_empty());
    }

    #[test]
    fn test_level_up_carries_remainder() {
        let mut player = Player::new(Position::new(1, 1));
        player.set_health(3);

        assert_eq!(player.add_experience(12), 1);
        assert_eq!(player.level(), 2);
        assert_eq!(player.experience(), 2);
        assert_eq!(player.exp_to_next(), 15);
        assert_eq!(player.max_hp(), 25);
        assert_eq!(player.hp(), 25);
        assert_eq!(player.base_strength(), 6);
    }

    #[test]
    fn test_on_level_change_same_depth_is_noop() {
        let mut player = Player::new(Position::new(1, 1));
        player.add_item(Item::scroll(ItemEffect::Giant, 50, "scroll labeled ZEL"));
        player.use_consumable(0);
        assert!(!player.on_level_change(1));
        assert_eq!(player.max_hp(), 40);
    }

    #[test]
    fn test_reset() {
        let mut player = Player::with_capacity(Position::new(1, 1), 4);
        player.take_damage(100);
        player.reset(Position::new(2, 2));
        assert!(player.is_alive());
        assert_eq!(player.position(), Position::new(2, 2));
        assert_eq!(player.capacity(), 4);
    }
}
