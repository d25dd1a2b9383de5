//! # Monsters Module
//!
//! The monster model: archetypes, combat numbers and status effects.

use crate::{MonsterId, Position};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Monster families. Each has its own symbol, name pool and stat table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterArchetype {
    Undead,
    Beast,
    Humanoid,
    Construct,
    Elemental,
    Aberration,
}

impl MonsterArchetype {
    pub const ALL: [MonsterArchetype; 6] = [
        MonsterArchetype::Undead,
        MonsterArchetype::Beast,
        MonsterArchetype::Humanoid,
        MonsterArchetype::Construct,
        MonsterArchetype::Elemental,
        MonsterArchetype::Aberration,
    ];

    pub fn symbol(self) -> char {
        match self {
            MonsterArchetype::Undead => 'Z',
            MonsterArchetype::Beast => 'B',
            MonsterArchetype::Humanoid => 'H',
            MonsterArchetype::Construct => 'C',
            MonsterArchetype::Elemental => 'E',
            MonsterArchetype::Aberration => 'A',
        }
    }

    pub fn names(self) -> &'static [&'static str] {
        match self {
            MonsterArchetype::Undead => &[
                "Skeleton Warrior",
                "Zombie",
                "Ghost",
                "Wraith",
                "Vampire Thrall",
                "Bone Collector",
            ],
            MonsterArchetype::Beast => &[
                "Dire Rat",
                "Giant Spider",
                "Cave Bear",
                "Venomous Snake",
                "Blood Bat",
                "Dungeon Wolf",
            ],
            MonsterArchetype::Humanoid => &[
                "Goblin Scout",
                "Orc Warrior",
                "Kobold Trapper",
                "Dark Elf Assassin",
                "Troll Brute",
                "Hobgoblin",
            ],
            MonsterArchetype::Construct => &[
                "Stone Golem",
                "Mechanical Sentinel",
                "Animated Armor",
                "Clockwork Beast",
                "Living Statue",
                "Arcane Turret",
            ],
            MonsterArchetype::Elemental => &[
                "Fire Wisp",
                "Water Sprite",
                "Earth Rumbler",
                "Wind Harrier",
                "Shadow Elemental",
                "Crystal Guardian",
            ],
            MonsterArchetype::Aberration => &[
                "Mind Flayer",
                "Gelatinous Cube",
                "Rust Monster",
                "Beholder Spawn",
                "Chaos Tendril",
                "Reality Warper",
            ],
        }
    }
}

/// A single active status effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusEffect {
    Normal,
    Poisoned,
    Burning,
    /// Skips its action while active
    Stunned,
    /// Deals half damage while active
    Weakened,
}

impl StatusEffect {
    /// Damage taken at the start of each monster step.
    pub fn periodic_damage(self) -> i32 {
        match self {
            StatusEffect::Poisoned => 1,
            StatusEffect::Burning => 2,
            _ => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusEffect::Normal => "normal",
            StatusEffect::Poisoned => "poisoned",
            StatusEffect::Burning => "burning",
            StatusEffect::Stunned => "stunned",
            StatusEffect::Weakened => "weakened",
        }
    }
}

/// A monster on the current floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub name: String,
    pub archetype: MonsterArchetype,
    pub position: Position,
    hp: i32,
    max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub exp_value: u32,
    pub symbol: char,
    /// Passive monsters wander instead of hunting the player
    pub hostile: bool,
    pub boss: bool,
    status: StatusEffect,
    status_turns: u32,
    status_resistant: bool,
}

impl Monster {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: MonsterId,
        name: impl Into<String>,
        archetype: MonsterArchetype,
        position: Position,
        hp: i32,
        attack: i32,
        defense: i32,
        exp_value: u32,
    ) -> Self {
        let hp = hp.max(1);
        Self {
            id,
            name: name.into(),
            archetype,
            position,
            hp,
            max_hp: hp,
            attack,
            defense,
            exp_value,
            symbol: archetype.symbol(),
            hostile: true,
            boss: false,
            status: StatusEffect::Normal,
            status_turns: 0,
            status_resistant: false,
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn status(&self) -> StatusEffect {
        self.status
    }

    pub fn status_turns(&self) -> u32 {
        self.status_turns
    }

    pub fn is_status_resistant(&self) -> bool {
        self.status_resistant
    }

    pub fn set_status_resistant(&mut self, resistant: bool) {
        self.status_resistant = resistant;
    }

    pub fn is_stunned(&self) -> bool {
        self.status == StatusEffect::Stunned
    }

    /// Applies a status effect for `turns` steps. Resistant monsters shrug it off.
    pub fn apply_status(&mut self, effect: StatusEffect, turns: u32) -> bool {
        if effect == StatusEffect::Normal || turns == 0 {
            self.status = StatusEffect::Normal;
            self.status_turns = 0;
            return true;
        }
        if self.status_resistant {
            return false;
        }
        self.status = effect;
        self.status_turns = turns;
        true
    }

    /// Advances the active effect by one step and returns the damage it dealt.
    pub fn update_status(&mut self) -> i32 {
        if self.status == StatusEffect::Normal {
            return 0;
        }

        let damage = self.status.periodic_damage().min(self.hp);
        self.hp -= damage;

        self.status_turns = self.status_turns.saturating_sub(1);
        if self.status_turns == 0 {
            self.status = StatusEffect::Normal;
        }
        damage
    }

    /// Rolls melee damage: attack power plus a jitter of -1..=1, at least 1.
    pub fn attack_damage(&self, rng: &mut StdRng) -> i32 {
        let mut damage = self.attack + rng.gen_range(-1..=1);
        if self.status == StatusEffect::Weakened {
            damage /= 2;
        }
        damage.max(1)
    }

    /// Applies an incoming hit after defense and returns the damage dealt.
    ///
    /// Every hit deals at least 1 damage and hp never drops below 0.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let damage = (amount - self.defense).max(1);
        self.hp = (self.hp - damage).max(0);
        damage
    }

    pub fn health_label(&self) -> &'static str {
        let percent = self.hp * 100 / self.max_hp.max(1);
        if percent > 75 {
            "Healthy"
        } else if percent > 50 {
            "Injured"
        } else if percent > 25 {
            "Badly Wounded"
        } else {
            "Near Death"
        }
    }

    /// One-line description for look and combat messages.
    pub fn describe(&self) -> String {
        let mut text = format!(
            "{} ({}) - {} [{}/{} HP]",
            self.name,
            self.symbol,
            self.health_label(),
            self.hp,
            self.max_hp
        );
        if self.status != StatusEffect::Normal {
            text.push_str(&format!(", {}", self.status.label()));
        }
        if !self.hostile {
            text.push_str(", passive");
        }
        text
    }
}
