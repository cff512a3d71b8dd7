//! Game state machine
//!
//! Owns the dungeon, the hero, and the session RNG, and moves a run
//! through exploring, combat, and the two terminal states.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::characters::{Combatant, Hero, HeroClass};
use crate::combat::{CombatSystem, RoundResult, Victor};
use crate::dungeon::{
    generation, Direction, Dungeon, GenerationError, GenerationStrategy,
};
use crate::items::{Pillar, PotionKind};

/// Regenerations to attempt before giving up on a run.
const MAX_GENERATION_ATTEMPTS: u32 = 8;

/// Chance a slain monster leaves a healing potion behind.
const MONSTER_DROP_CHANCE: f64 = 0.25;

/// The main game struct holding one run's worth of state.
pub struct Game {
    state: GameState,
    dungeon: Dungeon,
    hero: Hero,
    /// Session RNG; seeded once so a run is reproducible.
    rng: StdRng,
    seed: u64,
    messages: Vec<GameMessage>,
}

/// All possible game states.
#[derive(Debug, Clone, PartialEq)]
pub enum GameState {
    /// Walking the halls.
    Exploring,
    /// Locked in combat with the monster at the given room.
    InCombat { monster_at: (i32, i32) },
    /// The hero died.
    GameOver { cause: String },
    /// Escaped with all four pillars.
    Victory,
}

/// A log entry for the driver to render.
#[derive(Debug, Clone)]
pub struct GameMessage {
    pub text: String,
    pub category: MessageCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCategory {
    Info,
    Combat,
    Loot,
    Warning,
}

impl Game {
    /// Start a new run: generate the dungeon (retrying on bad layouts) and
    /// drop the hero at the entrance.
    pub fn new(
        class: HeroClass,
        name: impl Into<String>,
        width: i32,
        height: i32,
        strategy: GenerationStrategy,
        seed: Option<u64>,
    ) -> Result<Self, GenerationError> {
        let seed = seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut dungeon =
            generation::generate_with_retries(&mut rng, width, height, strategy, MAX_GENERATION_ATTEMPTS)?;

        let mut hero = Hero::new(class, name);
        let entrance = dungeon.entrance();
        hero.set_location(entrance);
        if let Some(room) = dungeon.room_mut(entrance.0, entrance.1) {
            room.visited = true;
        }

        let mut game = Self {
            state: GameState::Exploring,
            dungeon,
            hero,
            rng,
            seed,
            messages: Vec::new(),
        };
        let welcome = format!(
            "Welcome, {} {}. Find the four pillars and reach the far gate.",
            game.hero.class().title(),
            game.hero.name()
        );
        game.push(MessageCategory::Info, welcome);
        Ok(game)
    }

    /// Rebuild a run from restored pieces (see the save module). The state
    /// is re-derived from the hero's situation.
    pub fn from_parts(hero: Hero, dungeon: Dungeon, seed: u64) -> Self {
        let at_exit = hero.location() == Some(dungeon.exit());
        let in_monster_room = hero
            .location()
            .and_then(|(x, y)| dungeon.room(x, y))
            .is_some_and(|room| room.has_living_monster());

        let state = if !hero.is_alive() {
            GameState::GameOver {
                cause: "slain in the depths".to_string(),
            }
        } else if at_exit && hero.has_all_pillars() {
            GameState::Victory
        } else if in_monster_room {
            GameState::InCombat {
                monster_at: hero.location().unwrap_or_default(),
            }
        } else {
            GameState::Exploring
        };

        Self {
            state,
            dungeon,
            hero,
            rng: StdRng::seed_from_u64(seed),
            seed,
            messages: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn messages(&self) -> &[GameMessage] {
        &self.messages
    }

    /// Hand the pending messages to the driver and clear the log.
    pub fn drain_messages(&mut self) -> Vec<GameMessage> {
        std::mem::take(&mut self.messages)
    }

    fn push(&mut self, category: MessageCategory, text: impl Into<String>) {
        self.messages.push(GameMessage {
            text: text.into(),
            category,
        });
    }

    /// Move the hero one room over, when exploring.
    pub fn handle_move(&mut self, direction: Direction) {
        match self.state {
            GameState::Exploring => {}
            GameState::InCombat { .. } => {
                self.push(
                    MessageCategory::Warning,
                    "You cannot walk away from combat!",
                );
                return;
            }
            _ => return,
        }

        let outcome = self.dungeon.move_hero(&mut self.hero, direction, &mut self.rng);
        let category = if outcome.moved {
            MessageCategory::Info
        } else {
            MessageCategory::Warning
        };
        for message in outcome.messages {
            self.push(category, message);
        }

        if !self.hero.is_alive() {
            self.push(MessageCategory::Warning, "The darkness takes you.");
            self.state = GameState::GameOver {
                cause: "swallowed by a pit".to_string(),
            };
            return;
        }

        if let Some(pos) = outcome.encounter {
            self.state = GameState::InCombat { monster_at: pos };
            return;
        }

        self.check_victory();
    }

    fn check_victory(&mut self) {
        if self.hero.location() != Some(self.dungeon.exit()) {
            return;
        }
        if self.hero.has_all_pillars() {
            self.push(
                MessageCategory::Info,
                "The gate swings open. You walk out into the light.",
            );
            self.state = GameState::Victory;
        } else {
            let missing = Pillar::ALL.len() - self.hero.pillars().len();
            self.push(
                MessageCategory::Info,
                format!("The gate stands sealed: {} pillars still missing.", missing),
            );
        }
    }

    /// Fight one round against the monster in the hero's room.
    pub fn combat_round(&mut self, use_special: bool) -> Option<RoundResult> {
        let monster_at = match &self.state {
            GameState::InCombat { monster_at } => *monster_at,
            _ => {
                self.push(MessageCategory::Warning, "There is nothing to fight here.");
                return None;
            }
        };

        let (result, victor) = {
            let Some(room) = self.dungeon.room_mut(monster_at.0, monster_at.1) else {
                self.state = GameState::Exploring;
                return None;
            };
            let Some(monster) = room.monster.as_mut() else {
                self.state = GameState::Exploring;
                return None;
            };
            let mut session = CombatSystem::new(&mut self.hero, monster);
            let result = session.execute_round(use_special, &mut self.rng);
            let victor = session.victor();
            (result, victor)
        };

        match victor {
            Some(Victor::Hero) => {
                self.collect_monster_drops(monster_at);
                self.state = GameState::Exploring;
                // The slain monster may have guarded the exit itself.
                self.check_victory();
            }
            Some(Victor::Monster) => {
                let name = self
                    .dungeon
                    .room(monster_at.0, monster_at.1)
                    .and_then(|room| room.monster.as_ref())
                    .map_or_else(|| "monster".to_string(), |m| m.name().to_string());
                self.push(MessageCategory::Warning, format!("The {} cuts you down.", name));
                self.state = GameState::GameOver {
                    cause: format!("slain by a {}", name),
                };
            }
            None => {}
        }

        Some(result)
    }

    /// Empty the slain monster's room slot and roll for drops.
    fn collect_monster_drops(&mut self, (x, y): (i32, i32)) {
        let Some(room) = self.dungeon.room_mut(x, y) else {
            return;
        };
        let Some(monster) = room.monster.take() else {
            return;
        };
        self.push(
            MessageCategory::Combat,
            format!("The {} collapses!", monster.name()),
        );
        if self.rng.gen_bool(MONSTER_DROP_CHANCE) {
            self.hero.collect_potion(PotionKind::Healing);
            self.push(
                MessageCategory::Loot,
                format!("The {} dropped a healing potion!", monster.name()),
            );
        }
    }

    /// Drink a healing potion, if the hero has one.
    pub fn drink_healing_potion(&mut self) {
        match self.hero.use_healing_potion(&mut self.rng) {
            Some(healed) => {
                let text = format!("You drink a healing potion and recover {} HP.", healed);
                self.push(MessageCategory::Info, text);
            }
            None => self.push(MessageCategory::Warning, "You have no healing potions."),
        }
    }

    /// Drink a vision potion: the surroundings light up now, and the
    /// lingering effect reveals again after the next move.
    pub fn drink_vision_potion(&mut self) {
        if self.hero.use_vision_potion() {
            if let Some(pos) = self.hero.location() {
                let revealed = self.dungeon.reveal_adjacent_rooms(pos);
                self.push(
                    MessageCategory::Info,
                    format!("The walls turn to glass: {} rooms revealed.", revealed.len()),
                );
            }
        } else {
            self.push(MessageCategory::Warning, "You have no vision potions.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::{Monster, MonsterKind};
    use crate::dungeon::Room;

    fn empty_dungeon(width: i32, height: i32) -> Dungeon {
        let mut dungeon = Dungeon::new(width, height);
        for y in 0..height {
            for x in 0..width {
                dungeon.open_door_pair((x, y), Direction::East);
                dungeon.open_door_pair((x, y), Direction::South);
            }
        }
        dungeon
    }

    fn game_with(hero: Hero, dungeon: Dungeon) -> Game {
        Game::from_parts(hero, dungeon, 99)
    }

    #[test]
    fn test_new_game_starts_at_entrance() {
        let game = Game::new(
            HeroClass::Warrior,
            "Brand",
            6,
            6,
            GenerationStrategy::OpenGrid,
            Some(11),
        )
        .unwrap();
        assert_eq!(*game.state(), GameState::Exploring);
        assert_eq!(game.hero().location(), Some((0, 0)));
        assert!(game.dungeon().room(0, 0).unwrap().visited);
        assert_eq!(game.seed(), 11);
        assert!(!game.messages().is_empty());
    }

    #[test]
    fn test_sealed_gate_without_pillars() {
        let dungeon = empty_dungeon(2, 3);
        let mut hero = Hero::new(HeroClass::Thief, "Nim");
        hero.set_location((1, 1));
        let mut game = game_with(hero, dungeon);

        game.handle_move(Direction::South);
        assert_eq!(*game.state(), GameState::Exploring);
        let messages = game.drain_messages();
        assert!(messages.iter().any(|m| m.text.contains("sealed")));
    }

    #[test]
    fn test_victory_with_all_pillars() {
        let dungeon = empty_dungeon(2, 3);
        let mut hero = Hero::new(HeroClass::Thief, "Nim");
        for pillar in Pillar::ALL {
            hero.collect_pillar(pillar);
        }
        hero.set_location((1, 1));
        let mut game = game_with(hero, dungeon);

        game.handle_move(Direction::South);
        assert_eq!(*game.state(), GameState::Victory);
    }

    #[test]
    fn test_encounter_enters_combat_and_blocks_movement() {
        let mut dungeon = empty_dungeon(3, 3);
        dungeon.room_mut(1, 0).unwrap().monster = Some(Monster::new(MonsterKind::Skeleton));
        let mut hero = Hero::new(HeroClass::Warrior, "Brand");
        hero.set_location((0, 0));
        let mut game = game_with(hero, dungeon);

        game.handle_move(Direction::East);
        assert_eq!(*game.state(), GameState::InCombat { monster_at: (1, 0) });

        game.handle_move(Direction::East);
        assert_eq!(game.hero().location(), Some((1, 0)));
        let messages = game.drain_messages();
        assert!(messages
            .iter()
            .any(|m| m.text.contains("cannot walk away")));
    }

    #[test]
    fn test_combat_round_outside_combat_is_refused() {
        let dungeon = empty_dungeon(2, 3);
        let mut hero = Hero::new(HeroClass::Warrior, "Brand");
        hero.set_location((0, 0));
        let mut game = game_with(hero, dungeon);
        assert!(game.combat_round(false).is_none());
    }

    #[test]
    fn test_winning_combat_clears_monster_slot() {
        let mut dungeon = empty_dungeon(3, 3);
        // A harmless husk: 1 HP, no damage, no healing.
        let husk = Monster::restore(MonsterKind::Gremlin, "Gremlin", 1, 1, 0, 0, 1, 0.0, 0.0, 0, 0);
        let mut room = Room::new();
        room.monster = Some(husk);
        *dungeon.room_mut(1, 1).unwrap() = room;
        let mut hero = Hero::new(HeroClass::Warrior, "Brand");
        hero.set_location((1, 1));
        let mut game = game_with(hero, dungeon);
        assert_eq!(*game.state(), GameState::InCombat { monster_at: (1, 1) });

        for _ in 0..50 {
            if *game.state() != (GameState::InCombat { monster_at: (1, 1) }) {
                break;
            }
            game.combat_round(false);
        }
        assert_eq!(*game.state(), GameState::Exploring);
        assert!(game.dungeon().room(1, 1).unwrap().monster.is_none());
        assert!(game.hero().is_alive());
    }

    #[test]
    fn test_losing_combat_ends_the_run() {
        let mut dungeon = empty_dungeon(3, 3);
        // An executioner: always hits, massive damage, unkillable pool.
        let brute = Monster::restore(
            MonsterKind::Dragon,
            "Dragon",
            100_000,
            100_000,
            999,
            999,
            10,
            1.0,
            0.0,
            0,
            0,
        );
        dungeon.room_mut(1, 1).unwrap().monster = Some(brute);
        let mut hero = Hero::new(HeroClass::Warrior, "Brand");
        hero.set_location((1, 1));
        let mut game = game_with(hero, dungeon);

        for _ in 0..50 {
            if matches!(game.state(), GameState::GameOver { .. }) {
                break;
            }
            game.combat_round(false);
        }
        assert!(matches!(game.state(), GameState::GameOver { cause } if cause.contains("Dragon")));
    }

    #[test]
    fn test_potion_messages() {
        let dungeon = empty_dungeon(2, 3);
        let mut hero = Hero::new(HeroClass::Priestess, "Vera");
        hero.set_location((0, 0));
        let mut game = game_with(hero, dungeon);

        game.drink_healing_potion();
        let messages = game.drain_messages();
        assert!(messages
            .iter()
            .any(|m| m.category == MessageCategory::Warning));

        game.drink_vision_potion();
        let messages = game.drain_messages();
        assert!(messages
            .iter()
            .any(|m| m.category == MessageCategory::Warning));
    }

    #[test]
    fn test_vision_potion_reveals_now() {
        let dungeon = empty_dungeon(3, 3);
        let mut hero = Hero::new(HeroClass::Thief, "Nim");
        hero.collect_potion(PotionKind::Vision);
        hero.set_location((1, 1));
        let mut game = game_with(hero, dungeon);

        game.drink_vision_potion();
        assert!(game.dungeon().room(1, 0).unwrap().visited);
        assert!(game.dungeon().room(0, 1).unwrap().visited);
        assert!(game.hero().active_vision());
    }
}
