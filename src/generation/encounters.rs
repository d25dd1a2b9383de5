//! # Encounter Generation
//!
//! The monster factory: depth-scaled regular monsters, archetype-specific
//! monsters and named bosses.

use crate::game::{new_monster_id, Monster, MonsterArchetype, Position};
use crate::utils::jitter;
use rand::rngs::StdRng;
use rand::Rng;

/// Names rolled by [`MonsterFactory::random_boss`].
pub const BOSS_NAMES: [&str; 6] = [
    "Grimclaw the Destroyer",
    "Nightwhisper",
    "The Ancient Golem",
    "Flameheart the Corrupted",
    "King Rotface",
    "Voidwalker Prime",
];

/// Chance that a beast is a passive wanderer rather than a hunter.
pub const PASSIVE_BEAST_CHANCE: f64 = 0.1;

/// Chance that a boss is permanently immune to status effects.
pub const BOSS_RESISTANCE_CHANCE: f64 = 0.5;

/// Builds monsters scaled to the current depth.
pub struct MonsterFactory;

impl MonsterFactory {
    /// Creates a random regular monster for the given depth.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{MonsterFactory, Position};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let monster = MonsterFactory::create_for_depth(3, Position::new(4, 4), &mut rng);
    /// assert!(monster.max_hp() >= 11);
    /// assert_eq!(monster.position, Position::new(4, 4));
    /// ```
    pub fn create_for_depth(depth: u32, position: Position, rng: &mut StdRng) -> Monster {
        let d = depth.max(1) as i32;
        let id = new_monster_id(rng);
        let archetype = MonsterArchetype::ALL[rng.gen_range(0..MonsterArchetype::ALL.len())];
        let name = Self::pick_name(archetype, rng);

        let hp = 5 + 2 * d + jitter(rng, 3 * d);
        let attack = 2 + d + jitter(rng, 2);
        let defense = d / 2 + jitter(rng, 2);
        let exp = 5 * d + jitter(rng, 5 * d);

        let mut monster = Monster::new(
            id,
            name,
            archetype,
            position,
            hp,
            attack,
            defense,
            exp as u32,
        );
        if archetype == MonsterArchetype::Beast && rng.gen_bool(PASSIVE_BEAST_CHANCE) {
            monster.hostile = false;
        }
        monster
    }

    /// Creates a monster of a specific archetype using its own stat table.
    pub fn create_archetype(
        archetype: MonsterArchetype,
        depth: u32,
        position: Position,
        rng: &mut StdRng,
    ) -> Monster {
        let d = depth.max(1) as i32;
        let id = new_monster_id(rng);
        let name = Self::pick_name(archetype, rng);

        let (hp, attack, defense, exp) = match archetype {
            MonsterArchetype::Undead => (6 * d, 3 + d, d, 6 * d),
            MonsterArchetype::Beast => (4 * d, 4 + d, d / 2, 5 * d),
            MonsterArchetype::Humanoid => (5 * d, 3 + d, 1 + d, 7 * d),
            MonsterArchetype::Construct => (8 * d, 2 + d, 2 + d, 8 * d),
            MonsterArchetype::Elemental => (4 * d, 5 + d, d / 2, 7 * d),
            MonsterArchetype::Aberration => (6 * d, 4 + d, 1 + d, 10 * d),
        };

        Monster::new(
            id,
            name,
            archetype,
            position,
            hp + jitter(rng, 2 * d),
            attack + jitter(rng, 2),
            defense + jitter(rng, d / 2),
            exp as u32,
        )
    }

    /// Creates a named boss. The name decides its archetype and symbol.
    pub fn create_boss(name: &str, depth: u32, position: Position, rng: &mut StdRng) -> Monster {
        let d = depth.max(1) as i32;
        let id = new_monster_id(rng);
        let (archetype, symbol) = Self::boss_kind(name);

        let mut boss = Monster::new(
            id,
            name,
            archetype,
            position,
            15 * d + jitter(rng, 10),
            5 + 2 * d,
            2 + d,
            (20 * d) as u32,
        );
        boss.symbol = symbol;
        boss.boss = true;
        if rng.gen_bool(BOSS_RESISTANCE_CHANCE) {
            boss.set_status_resistant(true);
        }
        boss
    }

    /// Creates a boss with a name drawn from [`BOSS_NAMES`].
    pub fn random_boss(depth: u32, position: Position, rng: &mut StdRng) -> Monster {
        let name = BOSS_NAMES[rng.gen_range(0..BOSS_NAMES.len())];
        Self::create_boss(name, depth, position, rng)
    }

    fn pick_name(archetype: MonsterArchetype, rng: &mut StdRng) -> &'static str {
        let names = archetype.names();
        names[rng.gen_range(0..names.len())]
    }

    fn boss_kind(name: &str) -> (MonsterArchetype, char) {
        let has = |keywords: &[&str]| keywords.iter().any(|keyword| name.contains(keyword));
        if has(&["Lich", "Death"]) {
            (MonsterArchetype::Undead, 'L')
        } else if has(&["Dragon", "Beast"]) {
            (MonsterArchetype::Beast, 'D')
        } else if has(&["Lord", "King"]) {
            (MonsterArchetype::Humanoid, 'K')
        } else if has(&["Golem", "Sentinel"]) {
            (MonsterArchetype::Construct, 'G')
        } else if has(&["Elemental", "Essence"]) {
            (MonsterArchetype::Elemental, 'Ω')
        } else {
            (MonsterArchetype::Aberration, 'X')
        }
    }
}
