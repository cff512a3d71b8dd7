//! Save/load system
//!
//! Handles saving and loading a run to/from disk.

pub mod save_game;

pub use save_game::{
    delete_save, extract_save_data, load_game, restore_game, save_exists, save_game, save_path,
    SaveData, SaveError, SAVE_VERSION,
};
