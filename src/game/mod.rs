//! Game module - session state and control flow

mod state;

pub use state::{Game, GameMessage, GameState, MessageCategory};
