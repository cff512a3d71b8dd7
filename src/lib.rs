//! Undervault - a turn-based dungeon crawler
//!
//! Delve a procedurally carved vault, claim the four pillars,
//! and escape through the far gate alive.

pub mod characters;
pub mod combat;
pub mod dungeon;
pub mod game;
pub mod items;
pub mod save;

// Re-export commonly used types
pub use characters::{Combatant, Hero, HeroClass, Monster, MonsterKind};
pub use combat::{CombatSystem, RoundResult, Victor};
pub use dungeon::{Direction, Dungeon, GenerationStrategy};
pub use game::{Game, GameState};
pub use items::Pillar;
