//! # Items Module
//!
//! The item model shared by the inventory, equipment slots and loot tables.
//!
//! Scrolls carry an identification record: until the player learns what a
//! scroll does, only its random label is shown. Identification never changes
//! what an item does, only how it is displayed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad item category used for equip and use checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Consumable,
    Weapon,
    Armor,
    Scroll,
}

impl ItemCategory {
    pub fn label(self) -> &'static str {
        match self {
            ItemCategory::Consumable => "consumable",
            ItemCategory::Weapon => "weapon",
            ItemCategory::Armor => "armor",
            ItemCategory::Scroll => "scroll",
        }
    }
}

/// What an item does when used or equipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemEffect {
    Health,
    Hunger,
    Strength,
    Armor,
    /// Doubles max health for the current floor
    Giant,
    /// Doubles strength for the current floor
    Berserk,
    None,
}

/// The fixed catalog of everyday consumables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsumableKind {
    HealingPotion,
    Bread,
    Apple,
    CookedMeat,
    StrengthPotion,
}

impl ConsumableKind {
    pub const ALL: [ConsumableKind; 5] = [
        ConsumableKind::HealingPotion,
        ConsumableKind::Bread,
        ConsumableKind::Apple,
        ConsumableKind::CookedMeat,
        ConsumableKind::StrengthPotion,
    ];

    /// Returns the display name, effect and magnitude of this consumable.
    pub fn profile(self) -> (&'static str, ItemEffect, i32) {
        match self {
            ConsumableKind::HealingPotion => ("Healing Potion", ItemEffect::Health, 5),
            ConsumableKind::Bread => ("Bread", ItemEffect::Hunger, 4),
            ConsumableKind::Apple => ("Apple", ItemEffect::Hunger, 2),
            ConsumableKind::CookedMeat => ("Cooked Meat", ItemEffect::Hunger, 6),
            ConsumableKind::StrengthPotion => ("Strength Potion", ItemEffect::Strength, 2),
        }
    }
}

/// Identification record carried by scrolls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollIdentity {
    pub identified: bool,
    /// Label shown while the scroll is unidentified
    pub label: String,
}

/// An item that can sit in the inventory or an equipment slot.
///
/// # Examples
///
/// ```
/// use delve::{ConsumableKind, Item, ItemEffect};
///
/// let bread = Item::from_kind(ConsumableKind::Bread);
/// assert_eq!(bread.name(), "Bread");
/// assert_eq!(bread.effect(), ItemEffect::Hunger);
/// assert!(bread.is_consumable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    name: String,
    category: ItemCategory,
    description: String,
    value: u32,
    consumable: bool,
    effect: ItemEffect,
    magnitude: i32,
    symbol: char,
    scroll: Option<ScrollIdentity>,
}

impl Item {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        category: ItemCategory,
        description: impl Into<String>,
        value: u32,
        consumable: bool,
        effect: ItemEffect,
        magnitude: i32,
        symbol: char,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            description: description.into(),
            value,
            consumable,
            effect,
            magnitude,
            symbol,
            scroll: None,
        }
    }

    /// Builds a consumable whose description, value and symbol follow its effect.
    pub fn consumable(name: impl Into<String>, effect: ItemEffect, magnitude: i32) -> Self {
        let (description, value, symbol) = match effect {
            ItemEffect::Health => (
                format!("Restores {} health.", magnitude),
                5 * magnitude,
                '+',
            ),
            ItemEffect::Hunger => (
                format!("Restores {} hunger.", magnitude),
                3 * magnitude,
                '%',
            ),
            ItemEffect::Strength => (
                format!("Grants {} strength while you remain on this floor.", magnitude),
                10 * magnitude,
                '^',
            ),
            _ => ("A curious thing.".to_string(), magnitude, '*'),
        };
        Self::new(
            name,
            ItemCategory::Consumable,
            description,
            value.max(0) as u32,
            true,
            effect,
            magnitude,
            symbol,
        )
    }

    /// Builds one of the catalog consumables at its base strength.
    pub fn from_kind(kind: ConsumableKind) -> Self {
        let (name, effect, magnitude) = kind.profile();
        Self::consumable(name, effect, magnitude)
    }

    pub fn weapon(name: impl Into<String>, bonus: i32) -> Self {
        Self::new(
            name,
            ItemCategory::Weapon,
            format!("Adds {} to your strength while wielded.", bonus),
            20 * bonus.max(0) as u32,
            false,
            ItemEffect::Strength,
            bonus,
            'W',
        )
    }

    pub fn armor(name: impl Into<String>, protection: i32) -> Self {
        Self::new(
            name,
            ItemCategory::Armor,
            format!("Provides {} armor while worn.", protection),
            15 * protection.max(0) as u32,
            false,
            ItemEffect::Armor,
            protection,
            'A',
        )
    }

    /// Builds an unidentified scroll. Only `Giant` and `Berserk` make sense here.
    pub fn scroll(effect: ItemEffect, value: u32, label: impl Into<String>) -> Self {
        let (name, description) = match effect {
            ItemEffect::Giant => (
                "Scroll of the Giant",
                "Doubles your max HP for the current level.",
            ),
            ItemEffect::Berserk => (
                "Scroll of Berserking",
                "Doubles your strength for the current level.",
            ),
            _ => ("Blank Scroll", "Nothing is written on it."),
        };
        let mut item = Self::new(
            name,
            ItemCategory::Scroll,
            description,
            value,
            true,
            effect,
            0,
            '?',
        );
        item.scroll = Some(ScrollIdentity {
            identified: false,
            label: label.into(),
        });
        item
    }

    /// Returns a deeper-floor variant: stronger by `bonus` and worth `2 * bonus` more.
    pub fn scaled(mut self, depth: u32, bonus: i32) -> Self {
        self.description = format!("Level {} {}", depth, self.description);
        self.magnitude += bonus;
        self.value += 2 * bonus.max(0) as u32;
        self
    }

    /// The true name, regardless of identification.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name shown to the player.
    pub fn display_name(&self) -> &str {
        match &self.scroll {
            Some(identity) if !identity.identified => &identity.label,
            _ => &self.name,
        }
    }

    /// The true description, regardless of identification.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn display_description(&self) -> &str {
        match &self.scroll {
            Some(identity) if !identity.identified => {
                "An unidentified scroll. Read it to learn its power."
            }
            _ => &self.description,
        }
    }

    pub fn category(&self) -> ItemCategory {
        self.category
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn is_consumable(&self) -> bool {
        self.consumable
    }

    pub fn effect(&self) -> ItemEffect {
        self.effect
    }

    pub fn magnitude(&self) -> i32 {
        self.magnitude
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    /// Non-scroll items are always identified.
    pub fn is_identified(&self) -> bool {
        self.scroll.as_ref().map_or(true, |identity| identity.identified)
    }

    /// Reveals the true name and description. Calling it again changes nothing.
    pub fn identify(&mut self) {
        if let Some(identity) = self.scroll.as_mut() {
            identity.identified = true;
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.display_description())
    }
}
