//! Property tests for the game rules.

use delve::{
    reachable_from, Direction, EquipmentSlot, GameConfig, GameState, GenerationConfig, Generator,
    Item, ItemEffect, Level, Player, PlayerAction, Position, RoomCorridorGenerator, Tile,
};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use std::collections::HashSet;

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

fn arb_action() -> impl Strategy<Value = PlayerAction> {
    prop_oneof![
        4 => arb_direction().prop_map(PlayerAction::Move),
        1 => arb_direction().prop_map(PlayerAction::Attack),
        1 => Just(PlayerAction::Wait),
        1 => (0usize..3).prop_map(PlayerAction::UseItem),
    ]
}

/// Equip/unequip operations over a small inventory.
#[derive(Debug, Clone, Copy)]
enum GearOp {
    Equip(EquipmentSlot, usize),
    Unequip(EquipmentSlot),
}

fn arb_slot() -> impl Strategy<Value = EquipmentSlot> {
    prop_oneof![Just(EquipmentSlot::Weapon), Just(EquipmentSlot::Armor)]
}

fn arb_gear_op() -> impl Strategy<Value = GearOp> {
    prop_oneof![
        (arb_slot(), 0usize..6).prop_map(|(slot, index)| GearOp::Equip(slot, index)),
        arb_slot().prop_map(GearOp::Unequip),
    ]
}

/// Rows over wall, void, corridor and pickup tiles. No row is all spaces,
/// since those read as blank lines.
fn arb_floorless_rows() -> impl Strategy<Value = Vec<String>> {
    let lead = prop::sample::select(vec!['#', ',', '$', '!']);
    let rest = prop::sample::select(vec!['#', ' ', ',', '$', '!']);
    (0usize..7, 1usize..8).prop_flat_map(move |(extra, height)| {
        let row = (lead.clone(), prop::collection::vec(rest.clone(), extra))
            .prop_map(|(first, tail)| std::iter::once(first).chain(tail).collect::<String>());
        prop::collection::vec(row, height)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_generated_rooms_are_connected(seed in any::<u64>()) {
        let config = GenerationConfig::for_testing();
        let mut rng = StdRng::seed_from_u64(seed);
        let generated = RoomCorridorGenerator::new().generate(&config, &mut rng).unwrap();

        let reachable = reachable_from(&generated.level, generated.rooms[0].center());
        for room in &generated.rooms {
            for pos in room.floor_positions() {
                prop_assert!(reachable.contains(&pos), "room {} cut off at {:?}", room.id, pos);
            }
        }
    }

    #[test]
    fn prop_furnished_stairs_are_reachable(seed in any::<u64>()) {
        let config = GenerationConfig::for_testing();
        let mut rng = StdRng::seed_from_u64(seed);
        let generator = RoomCorridorGenerator::new();
        let mut generated = generator.generate(&config, &mut rng).unwrap();
        generator.furnish(&mut generated, &config, true, &mut rng).unwrap();

        let start = generated.level.player_start_position();
        let stairs = generated.level.stairs_down().unwrap();
        prop_assert!(reachable_from(&generated.level, start).contains(&stairs));
    }

    #[test]
    fn prop_start_without_floor_is_walkable(rows in arb_floorless_rows()) {
        let level = Level::parse(&format!("LEVEL 1\n{}", rows.join("\n"))).unwrap();
        let start = level.player_start_position();

        let first_walkable = (0..level.height as i32)
            .flat_map(|y| (0..level.width as i32).map(move |x| Position::new(x, y)))
            .find(|pos| level.is_walkable(*pos));
        match first_walkable {
            Some(pos) => {
                prop_assert_eq!(start, pos);
                prop_assert!(level.is_walkable(start));
            }
            None => prop_assert_eq!(start, Position::new(1, 1)),
        }
    }

    #[test]
    fn prop_start_is_first_floor(width in 2u32..10, height in 1u32..8, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut level = Level::filled(1, width, height, Tile::Wall);
        let pos = Position::new(
            rand::Rng::gen_range(&mut rng, 0..width as i32),
            rand::Rng::gen_range(&mut rng, 0..height as i32),
        );
        level.set_tile(pos, Tile::Floor).unwrap();
        prop_assert_eq!(level.player_start_position(), pos);
        prop_assert!(level.is_walkable(level.player_start_position()));
    }

    #[test]
    fn prop_take_damage_floor_and_armor(
        hp in 1i32..=20,
        amount in -5i32..40,
        protection in 0i32..12,
    ) {
        let mut player = Player::new(Position::new(1, 1));
        player.set_health(hp);
        if protection > 0 {
            player.add_item(Item::armor("Test Plate", protection));
            player.equip_armor(0);
        }

        let dealt = player.take_damage(amount);
        prop_assert_eq!(dealt as i32, (amount - protection / 2).max(1));
        prop_assert_eq!(player.hp(), (hp - dealt as i32).max(0));
        prop_assert!(player.hp() >= 0);
    }

    #[test]
    fn prop_equipment_slots_hold_one_item(ops in prop::collection::vec(arb_gear_op(), 0..30)) {
        let mut player = Player::new(Position::new(1, 1));
        player.add_item(Item::weapon("Dagger", 1));
        player.add_item(Item::weapon("Long Sword", 3));
        player.add_item(Item::armor("Chain Mail", 2));
        player.add_item(Item::armor("Plate Armor", 3));

        for op in ops {
            match op {
                GearOp::Equip(slot, index) => player.equip(slot, index),
                GearOp::Unequip(slot) => player.unequip(slot),
            };

            let carried = player.inventory().len()
                + player.equipped_weapon().map_or(0, |_| 1)
                + player.equipped_armor().map_or(0, |_| 1);
            prop_assert_eq!(carried, 4);
            if let Some(weapon) = player.equipped_weapon() {
                prop_assert_eq!(weapon.category(), EquipmentSlot::Weapon.category());
            }
            if let Some(armor) = player.equipped_armor() {
                prop_assert_eq!(armor.category(), EquipmentSlot::Armor.category());
            }
        }
    }

    #[test]
    fn prop_identify_is_idempotent(giant in any::<bool>(), times in 1usize..4) {
        let effect = if giant { ItemEffect::Giant } else { ItemEffect::Berserk };
        let mut once = Item::scroll(effect, 50, "scroll labeled ZEL GO");
        once.identify();
        let mut many = Item::scroll(effect, 50, "scroll labeled ZEL GO");
        for _ in 0..times {
            many.identify();
        }
        prop_assert_eq!(once.display_name(), many.display_name());
        prop_assert_eq!(&once, &many);
        prop_assert_eq!(once.display_name(), once.name());
    }

    #[test]
    fn prop_experience_levels_up_repeatedly(amount in 0u32..2000) {
        let mut player = Player::new(Position::new(1, 1));
        let gained = player.add_experience(amount);

        prop_assert_eq!(player.level(), 1 + gained);
        prop_assert!(player.experience() < player.exp_to_next());
        prop_assert_eq!(player.max_hp(), 20 + 5 * gained as i32);
        prop_assert_eq!(player.hp(), player.max_hp());
        prop_assert_eq!(player.base_strength(), 5 + gained as i32);
    }

    #[test]
    fn prop_monsters_never_share_tiles(
        seed in 0u64..500,
        actions in prop::collection::vec(arb_action(), 1..40),
    ) {
        let mut game_state = GameState::new(GameConfig::for_testing(seed)).unwrap();
        for action in actions {
            game_state.perform(action);

            let mut seen = HashSet::new();
            for monster in game_state.monsters().monsters().iter().filter(|m| m.is_alive()) {
                prop_assert!(seen.insert(monster.position), "two monsters on {:?}", monster.position);
                prop_assert_ne!(monster.position, game_state.player().position());
            }
        }
    }
}
