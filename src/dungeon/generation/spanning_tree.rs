//! Spanning-tree maze strategy
//!
//! Explicit-stack depth-first carve from the entrance, touching every cell
//! exactly once, then a sprinkle of extra doors so the tree gains loops
//! and shortcuts.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::dungeon::map::Dungeon;
use crate::dungeon::room::Direction;

/// Chance of an extra east/south door per cell after the tree is carved.
const EXTRA_DOOR_CHANCE: f64 = 0.15;

pub(super) fn carve(rng: &mut StdRng, width: i32, height: i32) -> Dungeon {
    let mut dungeon = Dungeon::new(width, height);
    let mut visited = vec![false; (width * height) as usize];
    let cell_idx = |(x, y): (i32, i32)| (y * width + x) as usize;

    let mut stack = vec![dungeon.entrance()];
    visited[cell_idx(dungeon.entrance())] = true;

    while let Some(&current) = stack.last() {
        let unvisited: Vec<(Direction, (i32, i32))> = Direction::ALL
            .iter()
            .filter_map(|&direction| {
                dungeon
                    .neighbor(current, direction)
                    .filter(|&next| !visited[cell_idx(next)])
                    .map(|next| (direction, next))
            })
            .collect();

        if let Some(&(direction, next)) = unvisited.choose(rng) {
            dungeon.open_door_pair(current, direction);
            visited[cell_idx(next)] = true;
            stack.push(next);
        } else {
            // Dead end; backtrack.
            stack.pop();
        }
    }

    add_shortcuts(rng, &mut dungeon);
    dungeon
}

/// Open extra east/south door pairs with independent probability. Purely
/// additive: no door opened here or by the tree walk is ever removed.
fn add_shortcuts(rng: &mut StdRng, dungeon: &mut Dungeon) {
    for y in 0..dungeon.height() {
        for x in 0..dungeon.width() {
            if x < dungeon.width() - 1 && rng.gen_bool(EXTRA_DOOR_CHANCE) {
                dungeon.open_door_pair((x, y), Direction::East);
            }
            if y < dungeon.height() - 1 && rng.gen_bool(EXTRA_DOOR_CHANCE) {
                dungeon.open_door_pair((x, y), Direction::South);
            }
        }
    }
}
