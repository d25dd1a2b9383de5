//! # Pathfinding Algorithms
//!
//! Reachability checks for generated floors and the greedy chase step used by
//! monster AI.

use crate::game::{Level, Position};
use ::pathfinding::prelude::bfs_reach;
use std::collections::HashSet;

/// Collects every tile reachable from `start` through cardinal moves over
/// player-walkable tiles. Empty when `start` itself is not walkable.
pub fn reachable_from(level: &Level, start: Position) -> HashSet<Position> {
    if !level.is_walkable(start) {
        return HashSet::new();
    }

    bfs_reach(start, |pos: &Position| {
        pos.cardinal_adjacent_positions()
            .into_iter()
            .filter(|next| level.is_walkable(*next))
            .collect::<Vec<_>>()
    })
    .collect()
}

/// Checks whether `to` can be reached from `from` on foot.
pub fn is_reachable(level: &Level, from: Position, to: Position) -> bool {
    reachable_from(level, from).contains(&to)
}

/// Candidate single steps from `from` toward `to`, best first.
///
/// The axis with the larger distance comes first; ties go to the horizontal
/// axis. Axes that are already aligned produce no candidate.
///
/// # Examples
///
/// ```
/// use delve::{greedy_steps, Position};
///
/// let steps = greedy_steps(Position::new(0, 0), Position::new(1, 4));
/// assert_eq!(steps, vec![Position::new(0, 1), Position::new(1, 0)]);
/// ```
pub fn greedy_steps(from: Position, to: Position) -> Vec<Position> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let horizontal = Position::new(from.x + dx.signum(), from.y);
    let vertical = Position::new(from.x, from.y + dy.signum());

    let ordered = if dx.abs() >= dy.abs() {
        [(dx != 0, horizontal), (dy != 0, vertical)]
    } else {
        [(dy != 0, vertical), (dx != 0, horizontal)]
    };

    ordered
        .into_iter()
        .filter(|(moves, _)| *moves)
        .map(|(_, step)| step)
        .collect()
}
