//! # Monster Manager
//!
//! Owns the monsters of the current floor: spawning, lookup, overlays and the
//! monster half of every turn.

use crate::{
    config, greedy_steps, Direction, Level, Monster, MonsterFactory, Player, Position, Tile,
};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The monsters living on the active floor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonsterManager {
    monsters: Vec<Monster>,
}

impl MonsterManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    pub fn clear(&mut self) {
        self.monsters.clear();
    }

    /// Adds a monster unless a live one already stands on its tile.
    pub fn spawn(&mut self, monster: Monster) -> bool {
        if self.monster_at(monster.position).is_some() {
            return false;
        }
        self.monsters.push(monster);
        true
    }

    /// The live monster on a tile, if any.
    pub fn monster_at(&self, pos: Position) -> Option<&Monster> {
        self.monsters
            .iter()
            .find(|monster| monster.is_alive() && monster.position == pos)
    }

    pub fn monster_at_mut(&mut self, pos: Position) -> Option<&mut Monster> {
        self.monsters
            .iter_mut()
            .find(|monster| monster.is_alive() && monster.position == pos)
    }

    /// Live monsters within `range` tiles (Chebyshev) of `center`.
    pub fn visible_monsters(&self, center: Position, range: u32) -> Vec<&Monster> {
        self.monsters
            .iter()
            .filter(|monster| {
                monster.is_alive() && monster.position.chebyshev_distance(center) <= range
            })
            .collect()
    }

    /// Drops dead monsters and returns how many were removed.
    pub fn remove_dead(&mut self) -> usize {
        let before = self.monsters.len();
        self.monsters.retain(Monster::is_alive);
        before - self.monsters.len()
    }

    /// Replaces the population with up to `count - 1` regular monsters and,
    /// from depth 2 on, a chance of one boss.
    ///
    /// Spawn hints from the level description are used first, then the
    /// remaining floor in random order. The player start is never used. When
    /// floor runs short fewer monsters are placed. Returns the number placed.
    pub fn populate(&mut self, level: &Level, count: usize, rng: &mut StdRng) -> usize {
        self.monsters.clear();
        let start = level.player_start_position();

        let hints: Vec<Position> = level
            .monster_spawns()
            .iter()
            .copied()
            .filter(|pos| *pos != start && level.get_tile(*pos) == Some(Tile::Floor))
            .collect();
        let mut rest: Vec<Position> = level
            .positions_of(Tile::Floor)
            .into_iter()
            .filter(|pos| *pos != start && !hints.contains(pos))
            .collect();
        rest.shuffle(rng);
        let mut spots = hints.into_iter().chain(rest);

        for _ in 0..count.saturating_sub(1) {
            match spots.next() {
                Some(pos) => self
                    .monsters
                    .push(MonsterFactory::create_for_depth(level.depth, pos, rng)),
                None => {
                    debug!("Depth {} ran out of floor for monsters", level.depth);
                    break;
                }
            }
        }

        if level.depth >= 2 {
            if let Some(pos) = spots.next() {
                if rng.gen_bool(config::BOSS_CHANCE) {
                    let boss = MonsterFactory::random_boss(level.depth, pos, rng);
                    warn!("{} lurks on depth {}", boss.name, level.depth);
                    self.monsters.push(boss);
                }
            }
        }

        debug!("Placed {} monsters on depth {}", self.monsters.len(), level.depth);
        self.monsters.len()
    }

    /// Runs one monster turn and returns what happened, in order.
    ///
    /// Each monster advances its status effect first. Stunned monsters then
    /// skip their action. Hostile monsters next to a living player attack it,
    /// otherwise they step toward it. Passive monsters wander.
    pub fn step_turn(
        &mut self,
        player: &mut Player,
        level: &Level,
        rng: &mut StdRng,
    ) -> Vec<String> {
        self.remove_dead();
        let mut messages = Vec::new();

        for index in 0..self.monsters.len() {
            let monster = &mut self.monsters[index];
            if !monster.is_alive() {
                continue;
            }

            let stunned = monster.is_stunned();
            let status = monster.status();
            let status_damage = monster.update_status();
            if status_damage > 0 {
                messages.push(format!(
                    "The {} takes {} damage from being {}.",
                    monster.name,
                    status_damage,
                    status.label().to_lowercase()
                ));
                if !monster.is_alive() {
                    messages.push(format!("The {} succumbs.", monster.name));
                    continue;
                }
            }
            if stunned {
                continue;
            }

            let position = monster.position;
            if monster.hostile && player.is_alive() {
                if position.chebyshev_distance(player.position()) <= 1 {
                    let dealt = player.take_damage(monster.attack_damage(rng));
                    messages.push(format!("The {} hits you for {} damage!", monster.name, dealt));
                    if !player.is_alive() {
                        messages.push(format!("You were slain by the {}.", monster.name));
                    }
                    continue;
                }

                let step = greedy_steps(position, player.position())
                    .into_iter()
                    .find(|step| self.can_enter(level, *step, player.position(), index));
                if let Some(step) = step {
                    self.monsters[index].position = step;
                }
            } else if !monster.hostile {
                let directions = Direction::cardinal();
                let step = directions
                    .choose(rng)
                    .map(|direction| position + direction.to_delta());
                let player_pos = player.position();
                if let Some(step) = step.filter(|step| self.can_enter(level, *step, player_pos, index))
                {
                    self.monsters[index].position = step;
                }
            }
        }

        self.remove_dead();
        messages
    }

    /// Writes live monster symbols onto a copy of the level grid.
    pub fn render_overlay(&self, grid: &mut [Vec<char>]) {
        for monster in self.monsters.iter().filter(|monster| monster.is_alive()) {
            if monster.position.x < 0 || monster.position.y < 0 {
                continue;
            }
            let cell = grid
                .get_mut(monster.position.y as usize)
                .and_then(|row| row.get_mut(monster.position.x as usize));
            if let Some(cell) = cell {
                *cell = monster.symbol;
            }
        }
    }

    fn can_enter(&self, level: &Level, pos: Position, player_pos: Position, mover: usize) -> bool {
        level.get_tile(pos).map_or(false, Tile::is_monster_walkable)
            && pos != player_pos
            && !self
                .monsters
                .iter()
                .enumerate()
                .any(|(index, other)| index != mover && other.is_alive() && other.position == pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MonsterArchetype, MonsterId, StatusEffect};
    use rand::SeedableRng;
    use std::collections::HashSet;

    const HALL: &str = "LEVEL 1
#########
#P......#
#########";

    const ROOM: &str = "LEVEL 2
########
#P.....#
#......#
#..M...#
#......#
########";

    fn rng() -> StdRng {
        StdRng::seed_from_u64(77)
    }

    fn grunt(x: i32, y: i32) -> Monster {
        Monster::new(
            MonsterId::from_u128((x * 100 + y) as u128),
            "Skeleton",
            MonsterArchetype::Undead,
            Position::new(x, y),
            10,
            3,
            0,
            5,
        )
    }

    #[test]
    fn test_spawn_rejects_occupied_tile() {
        let mut manager = MonsterManager::new();
        assert!(manager.spawn(grunt(3, 1)));
        assert!(!manager.spawn(grunt(3, 1)));
        assert_eq!(manager.len(), 1);
        assert!(manager.monster_at(Position::new(3, 1)).is_some());
        assert!(manager.monster_at(Position::new(4, 1)).is_none());
    }

    #[test]
    fn test_populate_uses_hints_and_distinct_tiles() {
        let level = Level::parse(ROOM).unwrap();
        let mut manager = MonsterManager::new();
        let placed = manager.populate(&level, 6, &mut rng());
        assert!(placed >= 5);

        // Spawn hints are filled first
        assert_eq!(manager.monsters()[0].position, Position::new(3, 3));

        let positions: HashSet<Position> = manager.monsters().iter().map(|m| m.position).collect();
        assert_eq!(positions.len(), placed);
        assert!(!positions.contains(&level.player_start_position()));
        for pos in &positions {
            assert_eq!(level.get_tile(*pos), Some(Tile::Floor));
        }
    }

    #[test]
    fn test_populate_fails_soft_when_floor_runs_short() {
        let level = Level::parse(HALL).unwrap();
        let mut manager = MonsterManager::new();
        assert_eq!(manager.populate(&level, 50, &mut rng()), 6);
    }

    #[test]
    fn test_populate_clears_previous_monsters() {
        let level = Level::parse(HALL).unwrap();
        let mut manager = MonsterManager::new();
        manager.spawn(grunt(7, 1));
        assert_eq!(manager.populate(&level, 1, &mut rng()), 0);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_hostile_monster_chases_player() {
        let level = Level::parse(HALL).unwrap();
        let mut player = Player::new(Position::new(1, 1));
        let mut manager = MonsterManager::new();
        manager.spawn(grunt(5, 1));

        manager.step_turn(&mut player, &level, &mut rng());
        assert_eq!(manager.monsters()[0].position, Position::new(4, 1));
        assert_eq!(player.hp(), 20);
    }

    #[test]
    fn test_adjacent_hostile_attacks() {
        let level = Level::parse(HALL).unwrap();
        let mut player = Player::new(Position::new(1, 1));
        let mut manager = MonsterManager::new();
        manager.spawn(grunt(2, 1));

        let messages = manager.step_turn(&mut player, &level, &mut rng());
        assert!(player.hp() < 20);
        assert!(messages[0].contains("hits you"));
        assert_eq!(manager.monsters()[0].position, Position::new(2, 1));
    }

    #[test]
    fn test_diagonal_hostile_attacks() {
        let level = Level::parse(ROOM).unwrap();
        let mut player = Player::new(Position::new(2, 1));
        let mut manager = MonsterManager::new();
        manager.spawn(grunt(3, 2));

        let messages = manager.step_turn(&mut player, &level, &mut rng());
        assert!(player.hp() < 20);
        assert!(messages[0].contains("hits you"));
        assert_eq!(manager.monsters()[0].position, Position::new(3, 2));
    }

    #[test]
    fn test_chase_steps_along_short_axis_around_wall() {
        let level = Level::parse("LEVEL 1\n#######\n#P....#\n#..#..#\n#######").unwrap();
        let mut player = Player::new(Position::new(1, 1));
        let mut manager = MonsterManager::new();
        manager.spawn(grunt(4, 2));

        manager.step_turn(&mut player, &level, &mut rng());
        assert_eq!(manager.monsters()[0].position, Position::new(4, 1));
        assert_eq!(player.hp(), 20);
    }

    #[test]
    fn test_chase_steps_along_short_axis_around_monster() {
        let level = Level::parse(ROOM).unwrap();
        let mut player = Player::new(Position::new(1, 1));
        let mut manager = MonsterManager::new();
        let mut blocker = grunt(3, 2);
        blocker.apply_status(StatusEffect::Stunned, 2);
        manager.spawn(blocker);
        manager.spawn(grunt(4, 2));

        manager.step_turn(&mut player, &level, &mut rng());
        assert_eq!(manager.monsters()[0].position, Position::new(3, 2));
        assert_eq!(manager.monsters()[1].position, Position::new(4, 1));
    }

    #[test]
    fn test_blocked_monster_waits() {
        let level = Level::parse(HALL).unwrap();
        let mut player = Player::new(Position::new(1, 1));
        let mut manager = MonsterManager::new();
        let mut front = grunt(4, 1);
        front.apply_status(StatusEffect::Stunned, 2);
        manager.spawn(front);
        manager.spawn(grunt(5, 1));

        manager.step_turn(&mut player, &level, &mut rng());
        assert_eq!(manager.monsters()[0].position, Position::new(4, 1));
        assert_eq!(manager.monsters()[1].position, Position::new(5, 1));
    }

    #[test]
    fn test_status_death_is_removed() {
        let level = Level::parse(HALL).unwrap();
        let mut player = Player::new(Position::new(1, 1));
        let mut manager = MonsterManager::new();
        let mut victim = Monster::new(
            MonsterId::from_u128(1),
            "Rat",
            MonsterArchetype::Beast,
            Position::new(6, 1),
            2,
            1,
            0,
            1,
        );
        victim.apply_status(StatusEffect::Burning, 3);
        manager.spawn(victim);

        let messages = manager.step_turn(&mut player, &level, &mut rng());
        assert!(manager.is_empty());
        assert!(messages.iter().any(|message| message.contains("succumbs")));
    }

    #[test]
    fn test_passive_monsters_wander_on_open_tiles() {
        let level = Level::parse(ROOM).unwrap();
        let mut player = Player::new(Position::new(1, 1));
        let mut manager = MonsterManager::new();
        let mut deer = grunt(4, 3);
        deer.hostile = false;
        manager.spawn(deer);

        let mut rng = rng();
        for _ in 0..30 {
            manager.step_turn(&mut player, &level, &mut rng);
            let pos = manager.monsters()[0].position;
            assert_ne!(pos, player.position());
            assert!(level.get_tile(pos).unwrap().is_monster_walkable());
        }
        assert_eq!(player.hp(), 20);
    }

    #[test]
    fn test_overlay_and_visibility() {
        let level = Level::parse(HALL).unwrap();
        let mut manager = MonsterManager::new();
        manager.spawn(grunt(3, 1));
        manager.spawn(grunt(7, 1));

        let mut grid = level.to_char_grid();
        manager.render_overlay(&mut grid);
        assert_eq!(grid[1][3], 'Z');
        assert_eq!(grid[1][7], 'Z');

        assert_eq!(manager.visible_monsters(Position::new(1, 1), 2).len(), 1);
        assert_eq!(manager.visible_monsters(Position::new(1, 1), 6).len(), 2);
    }
}
