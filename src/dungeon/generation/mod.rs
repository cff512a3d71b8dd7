//! Dungeon generation
//!
//! Two interchangeable maze strategies share a population pipeline:
//! pillars first, then monsters, then loose items. Pillar placement is the
//! load-bearing step: every pillar must be reachable from the entrance
//! and must itself reach the exit, or the dungeon is unwinnable.

pub mod open_grid;
pub mod spanning_tree;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::characters::{Monster, MonsterKind};
use crate::items::Pillar;

use super::map::Dungeon;
use super::room::Direction;

/// Chance of a monster spawning in an eligible room.
const MONSTER_CHANCE: f64 = 0.3;

/// Chance of each item kind appearing in an eligible room, rolled
/// independently, so one room may hold several.
const ITEM_CHANCE: f64 = 0.1;

/// Which maze-carving algorithm to run before population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStrategy {
    /// Depth-first spanning tree with extra shortcut doors. Denser walls,
    /// longer corridors.
    SpanningTree,
    /// Fully connected grid thinned by reachability-gated removal. Open
    /// and forgiving.
    OpenGrid,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("dungeon of {width}x{height} is too small to hold four pillars")]
    TooSmall { width: i32, height: i32 },
    #[error("could not place all four pillars in mutually reachable rooms")]
    PillarPlacement,
}

/// Carve a maze with the chosen strategy and populate it.
pub fn generate(
    rng: &mut StdRng,
    width: i32,
    height: i32,
    strategy: GenerationStrategy,
) -> Result<Dungeon, GenerationError> {
    // Four pillars plus entrance and exit need six distinct rooms.
    if width < 2 || height < 2 || width * height < 6 {
        return Err(GenerationError::TooSmall { width, height });
    }
    let mut dungeon = match strategy {
        GenerationStrategy::SpanningTree => spanning_tree::carve(rng, width, height),
        GenerationStrategy::OpenGrid => open_grid::carve(rng, width, height),
    };
    place_pillars(&mut dungeon, rng)?;
    place_monsters(&mut dungeon, rng);
    place_items(&mut dungeon, rng);
    log::info!("generated {}x{} dungeon ({:?})", width, height, strategy);
    Ok(dungeon)
}

/// Generate, regenerating on pillar-placement failure up to `attempts`
/// times. Size errors are not retried.
pub fn generate_with_retries(
    rng: &mut StdRng,
    width: i32,
    height: i32,
    strategy: GenerationStrategy,
    attempts: u32,
) -> Result<Dungeon, GenerationError> {
    let mut last_err = GenerationError::PillarPlacement;
    for attempt in 1..=attempts.max(1) {
        match generate(rng, width, height, strategy) {
            Ok(dungeon) => return Ok(dungeon),
            Err(err @ GenerationError::TooSmall { .. }) => return Err(err),
            Err(err) => {
                log::warn!("generation attempt {} failed: {}; regenerating", attempt, err);
                last_err = err;
            }
        }
    }
    Err(last_err)
}

/// Place the four pillars in shuffled candidate cells, requiring each cell
/// to be reachable from the entrance AND to reach the exit. When no cell
/// qualifies, force doors open until one does.
fn place_pillars(dungeon: &mut Dungeon, rng: &mut StdRng) -> Result<(), GenerationError> {
    let entrance = dungeon.entrance();
    let exit = dungeon.exit();

    let mut candidates: Vec<(i32, i32)> = Vec::new();
    for y in 0..dungeon.height() {
        for x in 0..dungeon.width() {
            if (x, y) != entrance && (x, y) != exit {
                candidates.push((x, y));
            }
        }
    }
    if candidates.len() < Pillar::ALL.len() {
        return Err(GenerationError::PillarPlacement);
    }
    candidates.shuffle(rng);

    let mut used: Vec<(i32, i32)> = Vec::with_capacity(Pillar::ALL.len());
    for pillar in Pillar::ALL {
        let cell = loop {
            match find_pillar_cell(dungeon, &candidates, &used) {
                Some(cell) => break cell,
                None => {
                    if !repair_connectivity(dungeon) {
                        // Every door is already open and a cell still
                        // cannot qualify; nothing left to try.
                        return Err(GenerationError::PillarPlacement);
                    }
                }
            }
        };
        if let Some(room) = dungeon.room_mut(cell.0, cell.1) {
            room.pillar = Some(pillar);
        }
        used.push(cell);
    }
    Ok(())
}

/// First unused candidate satisfying the double-reachability check.
fn find_pillar_cell(
    dungeon: &Dungeon,
    candidates: &[(i32, i32)],
    used: &[(i32, i32)],
) -> Option<(i32, i32)> {
    let entrance = dungeon.entrance();
    let exit = dungeon.exit();
    candidates.iter().copied().find(|&cell| {
        !used.contains(&cell)
            && dungeon.is_reachable(entrance, cell)
            && dungeon.is_reachable(cell, exit)
    })
}

/// Force-open the first closed adjacent door pair, scanning row-major.
/// Returns false when every pair is already open.
fn repair_connectivity(dungeon: &mut Dungeon) -> bool {
    for y in 0..dungeon.height() {
        for x in 0..dungeon.width() {
            for direction in [Direction::East, Direction::South] {
                if dungeon.neighbor((x, y), direction).is_none() {
                    continue;
                }
                let open = dungeon.room(x, y).map_or(true, |r| r.door(direction));
                if !open {
                    dungeon.open_door_pair((x, y), direction);
                    return true;
                }
            }
        }
    }
    false
}

/// Spawn monsters in rooms that hold neither a pillar nor an endpoint.
fn place_monsters(dungeon: &mut Dungeon, rng: &mut StdRng) {
    let entrance = dungeon.entrance();
    let exit = dungeon.exit();
    for y in 0..dungeon.height() {
        for x in 0..dungeon.width() {
            if (x, y) == entrance || (x, y) == exit {
                continue;
            }
            if let Some(room) = dungeon.room_mut(x, y) {
                if room.pillar.is_some() {
                    continue;
                }
                if rng.gen_bool(MONSTER_CHANCE) {
                    if let Some(&kind) = MonsterKind::ALL.choose(rng) {
                        room.monster = Some(Monster::new(kind));
                    }
                }
            }
        }
    }
}

/// Scatter potions and pits through the same eligible rooms.
fn place_items(dungeon: &mut Dungeon, rng: &mut StdRng) {
    let entrance = dungeon.entrance();
    let exit = dungeon.exit();
    for y in 0..dungeon.height() {
        for x in 0..dungeon.width() {
            if (x, y) == entrance || (x, y) == exit {
                continue;
            }
            let eligible = dungeon
                .room(x, y)
                .map_or(false, |room| room.pillar.is_none());
            if !eligible {
                continue;
            }
            let health = rng.gen_bool(ITEM_CHANCE);
            let vision = rng.gen_bool(ITEM_CHANCE);
            let pit = rng.gen_bool(ITEM_CHANCE);
            if let Some(room) = dungeon.room_mut(x, y) {
                room.has_health_potion = health;
                room.has_vision_potion = vision;
                room.has_pit = pit;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn assert_doors_symmetric(dungeon: &Dungeon) {
        for ((x, y), room) in dungeon.rooms() {
            for direction in Direction::ALL {
                match dungeon.neighbor((x, y), direction) {
                    Some((nx, ny)) => {
                        let far = dungeon.room(nx, ny).unwrap().door(direction.opposite());
                        assert_eq!(
                            room.door(direction),
                            far,
                            "asymmetric door at ({}, {}) going {}",
                            x,
                            y,
                            direction
                        );
                    }
                    // Border walls never carry doors.
                    None => assert!(!room.door(direction)),
                }
            }
        }
    }

    fn pillar_cells(dungeon: &Dungeon) -> Vec<((i32, i32), Pillar)> {
        dungeon
            .rooms()
            .filter_map(|(pos, room)| room.pillar.map(|p| (pos, p)))
            .collect()
    }

    #[test]
    fn test_bidirectional_doors_hold_for_both_strategies() {
        for strategy in [GenerationStrategy::SpanningTree, GenerationStrategy::OpenGrid] {
            for seed in 0..10 {
                let mut rng = StdRng::seed_from_u64(seed);
                let dungeon = generate(&mut rng, 6, 6, strategy).unwrap();
                assert_doors_symmetric(&dungeon);
            }
        }
    }

    #[test]
    fn test_global_reachability_and_pillar_cardinality() {
        for strategy in [GenerationStrategy::SpanningTree, GenerationStrategy::OpenGrid] {
            for seed in 0..10 {
                let mut rng = StdRng::seed_from_u64(seed);
                let dungeon = generate(&mut rng, 8, 8, strategy).unwrap();

                assert!(dungeon.is_reachable(dungeon.entrance(), dungeon.exit()));

                let pillars = pillar_cells(&dungeon);
                assert_eq!(pillars.len(), 4);
                for (pos, _) in &pillars {
                    assert_ne!(*pos, dungeon.entrance());
                    assert_ne!(*pos, dungeon.exit());
                    assert!(dungeon.is_reachable(dungeon.entrance(), *pos));
                    assert!(dungeon.is_reachable(*pos, dungeon.exit()));
                }
                // All four symbols, each exactly once.
                let mut kinds: Vec<Pillar> = pillars.iter().map(|(_, p)| *p).collect();
                kinds.sort_by_key(|p| p.symbol());
                kinds.dedup();
                assert_eq!(kinds.len(), 4);
            }
        }
    }

    #[test]
    fn test_population_respects_exclusions() {
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let dungeon =
                generate(&mut rng, 8, 8, GenerationStrategy::SpanningTree).unwrap();
            for ((x, y), room) in dungeon.rooms() {
                let endpoint = (x, y) == dungeon.entrance() || (x, y) == dungeon.exit();
                if endpoint {
                    assert!(room.monster.is_none());
                    assert!(!room.has_pit && !room.has_health_potion && !room.has_vision_potion);
                    assert!(room.pillar.is_none());
                }
                if room.pillar.is_some() {
                    assert!(room.monster.is_none());
                    assert!(!room.has_pit && !room.has_health_potion && !room.has_vision_potion);
                }
            }
        }
    }

    #[test]
    fn test_too_small_grid_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            generate(&mut rng, 1, 8, GenerationStrategy::OpenGrid),
            Err(GenerationError::TooSmall { .. })
        ));
        assert!(matches!(
            generate(&mut rng, 2, 2, GenerationStrategy::OpenGrid),
            Err(GenerationError::TooSmall { .. })
        ));
        // 2x3 is the smallest playable grid.
        assert!(generate(&mut rng, 2, 3, GenerationStrategy::OpenGrid).is_ok());
    }

    #[test]
    fn test_repair_opens_first_closed_pair_row_major() {
        let mut dungeon = Dungeon::new(3, 3);
        assert!(repair_connectivity(&mut dungeon));
        assert!(dungeon.room(0, 0).unwrap().door(Direction::East));
        assert!(dungeon.room(1, 0).unwrap().door(Direction::West));
    }

    #[test]
    fn test_pillar_placement_repairs_disconnected_grid() {
        // A grid with no doors at all forces the repair loop to carve
        // enough connectivity for four double-reachable pillar cells.
        let mut rng = StdRng::seed_from_u64(7);
        let mut dungeon = Dungeon::new(3, 3);
        place_pillars(&mut dungeon, &mut rng).unwrap();

        let pillars = pillar_cells(&dungeon);
        assert_eq!(pillars.len(), 4);
        for (pos, _) in pillars {
            assert!(dungeon.is_reachable(dungeon.entrance(), pos));
            assert!(dungeon.is_reachable(pos, dungeon.exit()));
        }
    }

    #[test]
    fn test_generate_with_retries_passes_through_success() {
        let mut rng = StdRng::seed_from_u64(3);
        let dungeon =
            generate_with_retries(&mut rng, 6, 6, GenerationStrategy::OpenGrid, 8).unwrap();
        assert_eq!(pillar_cells(&dungeon).len(), 4);
    }
}
