//! # Loot Generation
//!
//! Loot tables for consumables, weapons, armor and unidentified scrolls.

use crate::game::{ConsumableKind, Item, ItemEffect};
use crate::utils::{depth_index, jitter};
use rand::rngs::StdRng;
use rand::Rng;

/// Armor names by depth tier.
pub const ARMOR_NAMES: [&str; 4] = ["Leather Armor", "Chain Mail", "Plate Armor", "Dragon Scale"];

/// Weapon names by depth tier.
pub const WEAPON_NAMES: [&str; 5] = [
    "Dagger",
    "Short Sword",
    "Long Sword",
    "Battle Axe",
    "War Hammer",
];

const SCROLL_SYLLABLES: [&str; 16] = [
    "ZEL", "GO", "MER", "XYZ", "ZY", "FOO", "ELBIB", "YLOH", "VERR", "YED", "KIRJE", "ANDOVA",
    "THARR", "NIHIL", "PRATYAVAYAH", "VELOX",
];

/// Builds random loot scaled to the current depth.
pub struct ItemFactory;

impl ItemFactory {
    /// Rolls a random item: 60% consumable, 15% armor, 15% weapon, 10% scroll.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::ItemFactory;
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut a = StdRng::seed_from_u64(11);
    /// let mut b = StdRng::seed_from_u64(11);
    /// assert_eq!(
    ///     ItemFactory::create_random_item(2, &mut a),
    ///     ItemFactory::create_random_item(2, &mut b)
    /// );
    /// ```
    pub fn create_random_item(depth: u32, rng: &mut StdRng) -> Item {
        let roll: f64 = rng.gen();
        if roll < 0.6 {
            Self::create_consumable(depth, rng)
        } else if roll < 0.75 {
            Self::create_armor(depth, rng)
        } else if roll < 0.9 {
            Self::create_weapon(depth, rng)
        } else {
            Self::create_scroll(depth, rng)
        }
    }

    /// Picks a catalog consumable. Deeper floors add a bonus to its strength.
    pub fn create_consumable(depth: u32, rng: &mut StdRng) -> Item {
        let kind = ConsumableKind::ALL[rng.gen_range(0..ConsumableKind::ALL.len())];
        let item = Item::from_kind(kind);
        if depth > 1 {
            let bonus = jitter(rng, depth as i32);
            item.scaled(depth, bonus)
        } else {
            item
        }
    }

    pub fn create_armor(depth: u32, rng: &mut StdRng) -> Item {
        let index = depth_index(depth, ARMOR_NAMES.len());
        let protection = 1 + index as i32 + jitter(rng, depth as i32);
        Item::armor(ARMOR_NAMES[index], protection)
    }

    pub fn create_weapon(depth: u32, rng: &mut StdRng) -> Item {
        let index = depth_index(depth, WEAPON_NAMES.len());
        let bonus = 1 + index as i32 + jitter(rng, depth as i32);
        Item::weapon(WEAPON_NAMES[index], bonus)
    }

    /// Creates a giant or berserk scroll under a random label.
    pub fn create_scroll(depth: u32, rng: &mut StdRng) -> Item {
        let effect = if rng.gen_bool(0.5) {
            ItemEffect::Giant
        } else {
            ItemEffect::Berserk
        };
        let label = Self::scroll_label(rng);
        Item::scroll(effect, 50 * depth.max(1), label)
    }

    fn scroll_label(rng: &mut StdRng) -> String {
        let words: Vec<&str> = (0..2)
            .map(|_| SCROLL_SYLLABLES[rng.gen_range(0..SCROLL_SYLLABLES.len())])
            .collect();
        format!("scroll labeled {}", words.join(" "))
    }
}
