//! Open-grid maze strategy
//!
//! Start fully connected, thin doors out behind a reachability gate, force
//! an L-shaped guaranteed route, then sweep for symmetry drift.

use rand::rngs::StdRng;
use rand::Rng;

use crate::dungeon::map::Dungeon;
use crate::dungeon::room::Direction;

/// Chance of attempting to remove each east/south edge.
const REMOVAL_CHANCE: f64 = 0.3;

pub(super) fn carve(rng: &mut StdRng, width: i32, height: i32) -> Dungeon {
    let mut dungeon = Dungeon::new(width, height);
    connect_all(&mut dungeon);
    thin_doors(rng, &mut dungeon);
    carve_guaranteed_route(&mut dungeon);
    enforce_door_symmetry(&mut dungeon);
    dungeon
}

/// Open every east/south door pair: a fully connected grid.
fn connect_all(dungeon: &mut Dungeon) {
    for y in 0..dungeon.height() {
        for x in 0..dungeon.width() {
            dungeon.open_door_pair((x, y), Direction::East);
            dungeon.open_door_pair((x, y), Direction::South);
        }
    }
}

/// Try to remove each east/south edge independently. A removal only sticks
/// when the exit stays reachable from the entrance; otherwise it is
/// restored on the spot.
fn thin_doors(rng: &mut StdRng, dungeon: &mut Dungeon) {
    let entrance = dungeon.entrance();
    let exit = dungeon.exit();
    for y in 0..dungeon.height() {
        for x in 0..dungeon.width() {
            for direction in [Direction::East, Direction::South] {
                if dungeon.neighbor((x, y), direction).is_none() {
                    continue;
                }
                if rng.gen_bool(REMOVAL_CHANCE) {
                    dungeon.close_door_pair((x, y), direction);
                    if !dungeon.is_reachable(entrance, exit) {
                        dungeon.open_door_pair((x, y), direction);
                    }
                }
            }
        }
    }
}

/// Force-open an L-shaped route: east along the entrance row, then south
/// down the exit column. The route may well already exist; the point is
/// the guarantee.
fn carve_guaranteed_route(dungeon: &mut Dungeon) {
    let (mut x, mut y) = dungeon.entrance();
    let (exit_x, exit_y) = dungeon.exit();
    while x < exit_x {
        dungeon.open_door_pair((x, y), Direction::East);
        x += 1;
    }
    while y < exit_y {
        dungeon.open_door_pair((x, y), Direction::South);
        y += 1;
    }
}

/// Close both sides of any asymmetric door pair, never open them. A
/// safety net against algorithmic drift, not the connectivity guarantee.
fn enforce_door_symmetry(dungeon: &mut Dungeon) {
    for y in 0..dungeon.height() {
        for x in 0..dungeon.width() {
            for direction in [Direction::East, Direction::South] {
                let Some((nx, ny)) = dungeon.neighbor((x, y), direction) else {
                    continue;
                };
                let near = dungeon.room(x, y).map_or(false, |r| r.door(direction));
                let far = dungeon
                    .room(nx, ny)
                    .map_or(false, |r| r.door(direction.opposite()));
                if near != far {
                    dungeon.close_door_pair((x, y), direction);
                }
            }
        }
    }
}
