//! Combat engine

pub mod action;
pub mod engine;
pub mod log;

pub use action::{ActionKind, CombatAction, RoundResult};
pub use engine::{CombatSystem, Victor};
pub use log::format_round_result;
