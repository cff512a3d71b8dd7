//! Dungeon module
//!
//! Room grid, movement, reachability, and procedural generation.

pub mod generation;
pub mod map;
pub mod room;

pub use generation::{generate, generate_with_retries, GenerationError, GenerationStrategy};
pub use map::{Dungeon, MoveOutcome};
pub use room::{Direction, Room};
