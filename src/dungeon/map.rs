//! Dungeon grid
//!
//! The 2-D grid of rooms plus the movement, reachability, and room-effect
//! logic that runs on top of it.

use rand::Rng;

use crate::characters::{Combatant, Hero};
use crate::items::{PotionKind, PIT_DAMAGE_MAX, PIT_DAMAGE_MIN};

use super::room::{Direction, Room};

/// The dungeon: a flat row-major grid of rooms with entrance and exit
/// pinned to opposite corners. Shape is immutable after generation; only
/// room contents mutate during play.
#[derive(Debug, Clone)]
pub struct Dungeon {
    width: i32,
    height: i32,
    rooms: Vec<Room>,
    entrance: (i32, i32),
    exit: (i32, i32),
}

/// Result of a single movement attempt.
#[derive(Debug)]
pub struct MoveOutcome {
    pub moved: bool,
    pub messages: Vec<String>,
    /// Coordinates of a living-monster room the hero just walked into.
    pub encounter: Option<(i32, i32)>,
}

impl MoveOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            moved: false,
            messages: vec![message.into()],
            encounter: None,
        }
    }
}

impl Dungeon {
    /// Create an empty grid. Entrance sits at (0,0), exit at the far corner.
    pub fn new(width: i32, height: i32) -> Self {
        let rooms = vec![Room::new(); (width * height) as usize];
        let mut dungeon = Self {
            width,
            height,
            rooms,
            entrance: (0, 0),
            exit: (width - 1, height - 1),
        };
        let entrance = dungeon.entrance;
        let exit = dungeon.exit;
        let entrance_idx = dungeon.idx(entrance.0, entrance.1);
        let exit_idx = dungeon.idx(exit.0, exit.1);
        dungeon.rooms[entrance_idx].is_entrance = true;
        dungeon.rooms[exit_idx].is_exit = true;
        dungeon
    }

    /// Rebuild a dungeon from saved parts. Returns None when the room list
    /// does not match the declared size.
    pub fn from_parts(
        width: i32,
        height: i32,
        entrance: (i32, i32),
        exit: (i32, i32),
        rooms: Vec<Room>,
    ) -> Option<Self> {
        if width < 1 || height < 1 || rooms.len() != (width * height) as usize {
            return None;
        }
        let dungeon = Self {
            width,
            height,
            rooms,
            entrance,
            exit,
        };
        if !dungeon.in_bounds(entrance.0, entrance.1) || !dungeon.in_bounds(exit.0, exit.1) {
            return None;
        }
        Some(dungeon)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn entrance(&self) -> (i32, i32) {
        self.entrance
    }

    pub fn exit(&self) -> (i32, i32) {
        self.exit
    }

    #[inline]
    fn idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Bounds-checked room lookup.
    pub fn room(&self, x: i32, y: i32) -> Option<&Room> {
        if self.in_bounds(x, y) {
            Some(&self.rooms[self.idx(x, y)])
        } else {
            None
        }
    }

    pub fn room_mut(&mut self, x: i32, y: i32) -> Option<&mut Room> {
        if self.in_bounds(x, y) {
            let idx = self.idx(x, y);
            Some(&mut self.rooms[idx])
        } else {
            None
        }
    }

    /// Iterate all rooms with their coordinates, row-major.
    pub fn rooms(&self) -> impl Iterator<Item = ((i32, i32), &Room)> {
        self.rooms.iter().enumerate().map(|(i, room)| {
            let x = i as i32 % self.width;
            let y = i as i32 / self.width;
            ((x, y), room)
        })
    }

    /// Neighboring coordinates in `direction`, if in bounds.
    pub fn neighbor(&self, (x, y): (i32, i32), direction: Direction) -> Option<(i32, i32)> {
        let (dx, dy) = direction.delta();
        let (nx, ny) = (x + dx, y + dy);
        if self.in_bounds(nx, ny) {
            Some((nx, ny))
        } else {
            None
        }
    }

    /// Open the door pair between a room and its neighbor. Returns false
    /// when the neighbor is out of bounds; no single-sided door is ever
    /// created.
    pub fn open_door_pair(&mut self, from: (i32, i32), direction: Direction) -> bool {
        let Some(to) = self.neighbor(from, direction) else {
            return false;
        };
        let from_idx = self.idx(from.0, from.1);
        let to_idx = self.idx(to.0, to.1);
        self.rooms[from_idx].set_door(direction, true);
        self.rooms[to_idx].set_door(direction.opposite(), true);
        true
    }

    /// Close the door pair between a room and its neighbor.
    pub fn close_door_pair(&mut self, from: (i32, i32), direction: Direction) {
        let Some(to) = self.neighbor(from, direction) else {
            return;
        };
        let from_idx = self.idx(from.0, from.1);
        let to_idx = self.idx(to.0, to.1);
        self.rooms[from_idx].set_door(direction, false);
        self.rooms[to_idx].set_door(direction.opposite(), false);
    }

    /// Whether a door-connected path exists from `start` to `target`.
    ///
    /// Explicit-stack search; an edge is only traversed when the near side
    /// has a door toward the far side.
    pub fn is_reachable(&self, start: (i32, i32), target: (i32, i32)) -> bool {
        if !self.in_bounds(start.0, start.1) || !self.in_bounds(target.0, target.1) {
            return false;
        }
        let mut seen = vec![false; self.rooms.len()];
        let mut stack = vec![start];
        while let Some((x, y)) = stack.pop() {
            if (x, y) == target {
                return true;
            }
            let idx = self.idx(x, y);
            if seen[idx] {
                continue;
            }
            seen[idx] = true;
            for direction in Direction::ALL {
                if self.rooms[idx].door(direction) {
                    if let Some(next) = self.neighbor((x, y), direction) {
                        if !seen[self.idx(next.0, next.1)] {
                            stack.push(next);
                        }
                    }
                }
            }
        }
        false
    }

    /// Attempt to move the hero one room over.
    ///
    /// Movement failures are non-fatal: the outcome carries a single
    /// explanatory message and the hero stays put. On success the
    /// destination is marked visited, room effects run, an active vision
    /// potion reveals the surroundings, and a living monster in the
    /// destination is reported as an encounter.
    pub fn move_hero(
        &mut self,
        hero: &mut Hero,
        direction: Direction,
        rng: &mut impl Rng,
    ) -> MoveOutcome {
        let Some(from) = hero.location() else {
            return MoveOutcome::failed("The hero has not entered the dungeon yet.");
        };
        let Some(current) = self.room(from.0, from.1) else {
            return MoveOutcome::failed("The hero is standing outside the dungeon.");
        };
        if !current.door(direction) {
            return MoveOutcome::failed(format!("There is no door to the {}.", direction));
        }
        let Some(to) = self.neighbor(from, direction) else {
            return MoveOutcome::failed(format!("Solid rock blocks the way {}.", direction));
        };
        let dest_idx = self.idx(to.0, to.1);
        if !self.rooms[dest_idx].door(direction.opposite()) {
            return MoveOutcome::failed(format!(
                "The door to the {} is sealed from the other side.",
                direction
            ));
        }

        hero.set_location(to);
        self.rooms[dest_idx].visited = true;
        let mut messages = self.apply_room_effects(hero, rng);

        if hero.active_vision() {
            let revealed = self.reveal_adjacent_rooms(to);
            hero.expire_vision();
            messages.push(format!(
                "The vision potion reveals {} nearby rooms.",
                revealed.len()
            ));
        }

        let mut encounter = None;
        let dest = &self.rooms[dest_idx];
        if dest.has_living_monster() {
            if let Some(monster) = dest.monster.as_ref() {
                messages.push(format!("A {} blocks your path!", monster.name()));
            }
            encounter = Some(to);
        }

        MoveOutcome {
            moved: true,
            messages,
            encounter,
        }
    }

    /// Apply the effects of the hero's current room, in fixed precedence:
    /// pillar pickup, pit damage, health potion, vision potion.
    ///
    /// Pit damage goes through the hero's damage path, so a block negates
    /// it. Each pickup clears its room flag exactly once.
    pub fn apply_room_effects(&mut self, hero: &mut Hero, rng: &mut impl Rng) -> Vec<String> {
        let mut messages = Vec::new();
        let Some((x, y)) = hero.location() else {
            return messages;
        };
        let Some(room) = self.room_mut(x, y) else {
            return messages;
        };

        if let Some(pillar) = room.pillar {
            if hero.collect_pillar(pillar) {
                room.pillar = None;
                messages.push(format!("You found the Pillar of {}!", pillar));
            } else {
                messages.push(format!(
                    "You have already collected the Pillar of {}.",
                    pillar
                ));
            }
        }

        if room.has_pit {
            let damage = rng.gen_range(PIT_DAMAGE_MIN..=PIT_DAMAGE_MAX);
            if hero.take_damage(damage, rng) {
                messages.push("You tumble into a pit but roll clear unharmed!".to_string());
            } else {
                messages.push(format!("You fell into a pit and took {} damage!", damage));
            }
        }

        if room.has_health_potion {
            room.has_health_potion = false;
            hero.collect_potion(PotionKind::Healing);
            messages.push("You found a healing potion!".to_string());
        }

        if room.has_vision_potion {
            room.has_vision_potion = false;
            hero.collect_potion(PotionKind::Vision);
            messages.push("You found a vision potion!".to_string());
        }

        messages
    }

    /// Mark the four cardinal neighbors of `center` as visited. Returns the
    /// coordinates that were newly revealed.
    pub fn reveal_adjacent_rooms(&mut self, center: (i32, i32)) -> Vec<(i32, i32)> {
        let mut revealed = Vec::new();
        for direction in Direction::ALL {
            if let Some((nx, ny)) = self.neighbor(center, direction) {
                let idx = self.idx(nx, ny);
                if !self.rooms[idx].visited {
                    self.rooms[idx].visited = true;
                    revealed.push((nx, ny));
                }
            }
        }
        revealed
    }

    /// Render the grid as a text minimap. Unvisited rooms show as `?`
    /// unless `reveal_all` is set; the hero's room shows as `@`.
    pub fn ascii_map(&self, hero_pos: Option<(i32, i32)>, reveal_all: bool) -> String {
        let mut lines = Vec::new();
        for y in 0..self.height {
            let mut top = String::new();
            let mut mid = String::new();
            let mut bottom = String::new();
            for x in 0..self.width {
                let room = &self.rooms[self.idx(x, y)];
                let known = reveal_all || room.visited;
                top.push('*');
                top.push(if known && room.door(Direction::North) { '-' } else { '*' });
                top.push('*');
                mid.push(if known && room.door(Direction::West) { '|' } else { '*' });
                mid.push(if hero_pos == Some((x, y)) {
                    '@'
                } else if known {
                    room.display_glyph()
                } else {
                    '?'
                });
                mid.push(if known && room.door(Direction::East) { '|' } else { '*' });
                bottom.push('*');
                bottom.push(if known && room.door(Direction::South) { '-' } else { '*' });
                bottom.push('*');
                if x < self.width - 1 {
                    top.push(' ');
                    mid.push(' ');
                    bottom.push(' ');
                }
            }
            lines.push(top);
            lines.push(mid);
            lines.push(bottom);
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::{HeroClass, Monster, MonsterKind};
    use crate::items::Pillar;
    use rand::rngs::mock::StepRng;

    // Forces hit/heal rolls on and pins uniform rolls to their minimum.
    fn always() -> StepRng {
        StepRng::new(0, 0)
    }

    // Forces block/heal rolls off and pins uniform rolls to their maximum.
    fn never() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    fn open_corridor(dungeon: &mut Dungeon, from: (i32, i32), direction: Direction) {
        assert!(dungeon.open_door_pair(from, direction));
    }

    fn hero_at_entrance(dungeon: &Dungeon) -> Hero {
        let mut hero = Hero::new(HeroClass::Warrior, "Brand");
        hero.set_location(dungeon.entrance());
        hero
    }

    #[test]
    fn test_room_lookup_bounds() {
        let dungeon = Dungeon::new(4, 4);
        assert!(dungeon.room(0, 0).is_some());
        assert!(dungeon.room(3, 3).is_some());
        assert!(dungeon.room(4, 0).is_none());
        assert!(dungeon.room(-1, 0).is_none());
    }

    #[test]
    fn test_entrance_exit_corners() {
        let dungeon = Dungeon::new(5, 3);
        assert_eq!(dungeon.entrance(), (0, 0));
        assert_eq!(dungeon.exit(), (4, 2));
        assert!(dungeon.room(0, 0).unwrap().is_entrance);
        assert!(dungeon.room(4, 2).unwrap().is_exit);
    }

    #[test]
    fn test_door_pairs_stay_symmetric() {
        let mut dungeon = Dungeon::new(4, 4);
        assert!(dungeon.open_door_pair((1, 1), Direction::East));
        assert!(dungeon.room(1, 1).unwrap().door(Direction::East));
        assert!(dungeon.room(2, 1).unwrap().door(Direction::West));
        dungeon.close_door_pair((1, 1), Direction::East);
        assert!(!dungeon.room(1, 1).unwrap().door(Direction::East));
        assert!(!dungeon.room(2, 1).unwrap().door(Direction::West));
        // Out-of-bounds pairs are refused outright.
        assert!(!dungeon.open_door_pair((0, 0), Direction::North));
    }

    #[test]
    fn test_reachability_follows_doors() {
        let mut dungeon = Dungeon::new(3, 3);
        assert!(!dungeon.is_reachable((0, 0), (2, 0)));
        open_corridor(&mut dungeon, (0, 0), Direction::East);
        open_corridor(&mut dungeon, (1, 0), Direction::East);
        assert!(dungeon.is_reachable((0, 0), (2, 0)));
        assert!(dungeon.is_reachable((2, 0), (0, 0)));
        assert!(!dungeon.is_reachable((0, 0), (0, 2)));
        assert!(dungeon.is_reachable((0, 0), (0, 0)));
    }

    #[test]
    fn test_basic_movement() {
        let mut dungeon = Dungeon::new(4, 4);
        open_corridor(&mut dungeon, (0, 0), Direction::East);
        let mut hero = hero_at_entrance(&dungeon);

        let outcome = dungeon.move_hero(&mut hero, Direction::East, &mut never());
        assert!(outcome.moved);
        assert_eq!(hero.location(), Some((1, 0)));
        assert!(dungeon.room(1, 0).unwrap().visited);
    }

    #[test]
    fn test_invalid_movement_keeps_hero_in_place() {
        let mut dungeon = Dungeon::new(4, 4);
        let mut hero = hero_at_entrance(&dungeon);

        let outcome = dungeon.move_hero(&mut hero, Direction::East, &mut never());
        assert!(!outcome.moved);
        assert_eq!(outcome.messages.len(), 1);
        assert_eq!(hero.location(), Some((0, 0)));
    }

    #[test]
    fn test_boundary_movement() {
        let mut dungeon = Dungeon::new(4, 4);
        let mut hero = hero_at_entrance(&dungeon);
        let outcome = dungeon.move_hero(&mut hero, Direction::West, &mut never());
        assert!(!outcome.moved);
        assert_eq!(hero.location(), Some((0, 0)));
    }

    #[test]
    fn test_pit_damage_applies_through_block_path() {
        let mut dungeon = Dungeon::new(4, 4);
        open_corridor(&mut dungeon, (0, 0), Direction::East);
        dungeon.room_mut(1, 0).unwrap().has_pit = true;
        let mut hero = hero_at_entrance(&dungeon);

        // never(): pit roll pinned to 20, block roll fails.
        let outcome = dungeon.move_hero(&mut hero, Direction::East, &mut never());
        assert!(outcome.moved);
        assert_eq!(hero.hp(), 125 - 20);
        // The pit stays armed for the next visit.
        assert!(dungeon.room(1, 0).unwrap().has_pit);
    }

    #[test]
    fn test_pit_damage_can_be_blocked() {
        let mut dungeon = Dungeon::new(4, 4);
        open_corridor(&mut dungeon, (0, 0), Direction::East);
        dungeon.room_mut(1, 0).unwrap().has_pit = true;
        let mut hero = hero_at_entrance(&dungeon);

        let outcome = dungeon.move_hero(&mut hero, Direction::East, &mut always());
        assert!(outcome.moved);
        assert_eq!(hero.hp(), 125);
    }

    #[test]
    fn test_potion_pickup_clears_flag() {
        let mut dungeon = Dungeon::new(4, 4);
        open_corridor(&mut dungeon, (0, 0), Direction::East);
        {
            let room = dungeon.room_mut(1, 0).unwrap();
            room.has_health_potion = true;
            room.has_vision_potion = true;
        }
        let mut hero = hero_at_entrance(&dungeon);

        let outcome = dungeon.move_hero(&mut hero, Direction::East, &mut never());
        assert!(outcome.moved);
        assert_eq!(hero.healing_potions(), 1);
        assert_eq!(hero.vision_potions(), 1);
        let room = dungeon.room(1, 0).unwrap();
        assert!(!room.has_health_potion);
        assert!(!room.has_vision_potion);
    }

    #[test]
    fn test_pillar_pickup_and_duplicate() {
        let mut dungeon = Dungeon::new(4, 4);
        open_corridor(&mut dungeon, (0, 0), Direction::East);
        dungeon.room_mut(1, 0).unwrap().pillar = Some(Pillar::Aether);
        let mut hero = hero_at_entrance(&dungeon);

        let outcome = dungeon.move_hero(&mut hero, Direction::East, &mut never());
        assert!(outcome.moved);
        assert!(hero.has_pillar(Pillar::Aether));
        assert!(dungeon.room(1, 0).unwrap().pillar.is_none());

        // Walking into another room holding an already-collected pillar
        // reports it without duplicating the collection.
        open_corridor(&mut dungeon, (1, 0), Direction::East);
        dungeon.room_mut(2, 0).unwrap().pillar = Some(Pillar::Aether);
        let outcome = dungeon.move_hero(&mut hero, Direction::East, &mut never());
        assert!(outcome.moved);
        assert!(outcome
            .messages
            .iter()
            .any(|m| m.contains("already collected")));
        assert_eq!(hero.pillars().len(), 1);
    }

    #[test]
    fn test_monster_encounter_reported() {
        let mut dungeon = Dungeon::new(4, 4);
        open_corridor(&mut dungeon, (0, 0), Direction::East);
        dungeon.room_mut(1, 0).unwrap().monster = Some(Monster::new(MonsterKind::Skeleton));
        let mut hero = hero_at_entrance(&dungeon);

        let outcome = dungeon.move_hero(&mut hero, Direction::East, &mut never());
        assert!(outcome.moved);
        assert_eq!(outcome.encounter, Some((1, 0)));
        assert!(outcome.messages.iter().any(|m| m.contains("Skeleton")));
    }

    #[test]
    fn test_vision_reveals_neighbors_on_move() {
        let mut dungeon = Dungeon::new(4, 4);
        open_corridor(&mut dungeon, (0, 0), Direction::East);
        let mut hero = hero_at_entrance(&dungeon);
        hero.collect_potion(PotionKind::Vision);
        assert!(hero.use_vision_potion());

        let outcome = dungeon.move_hero(&mut hero, Direction::East, &mut never());
        assert!(outcome.moved);
        assert!(!hero.active_vision());
        // Neighbors of (1,0): (0,0), (2,0), (1,1) - all marked visited.
        assert!(dungeon.room(2, 0).unwrap().visited);
        assert!(dungeon.room(1, 1).unwrap().visited);
    }

    #[test]
    fn test_reveal_reports_only_new_rooms() {
        let mut dungeon = Dungeon::new(3, 3);
        dungeon.room_mut(1, 0).unwrap().visited = true;
        let revealed = dungeon.reveal_adjacent_rooms((1, 1));
        assert_eq!(revealed.len(), 3);
        assert!(!revealed.contains(&(1, 0)));
    }

    #[test]
    fn test_ascii_map_hides_unvisited() {
        let mut dungeon = Dungeon::new(2, 1);
        open_corridor(&mut dungeon, (0, 0), Direction::East);
        dungeon.room_mut(0, 0).unwrap().visited = true;
        let map = dungeon.ascii_map(Some((0, 0)), false);
        assert!(map.contains('@'));
        assert!(map.contains('?'));
        let all = dungeon.ascii_map(None, true);
        assert!(!all.contains('?'));
    }
}
