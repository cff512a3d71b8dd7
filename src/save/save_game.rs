//! Run snapshots
//!
//! The core is reconstructible from primitive fields alone, so a save is
//! just those fields serialized into a JSON slot file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::characters::{Combatant, Hero, HeroClass, Monster, MonsterKind};
use crate::dungeon::{Dungeon, Room};
use crate::game::Game;
use crate::items::Pillar;

/// Save format version, checked on load.
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, Error)]
pub enum SaveError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("invalid save data: {0}")]
    InvalidData(String),
}

/// Complete save data structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub seed: u64,
    pub hero: HeroSaveData,
    pub dungeon: DungeonSaveData,
}

/// Hero-specific save data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroSaveData {
    pub class: HeroClass,
    pub name: String,
    pub hp: i32,
    pub healing_potions: u32,
    pub vision_potions: u32,
    pub active_vision: bool,
    pub pillars: Vec<Pillar>,
    pub location: Option<(i32, i32)>,
}

/// Dungeon save data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonSaveData {
    pub width: i32,
    pub height: i32,
    pub entrance: (i32, i32),
    pub exit: (i32, i32),
    pub rooms: Vec<RoomSaveData>,
}

/// Per-room save data, row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSaveData {
    pub doors: [bool; 4],
    pub has_pit: bool,
    pub has_health_potion: bool,
    pub has_vision_potion: bool,
    pub pillar: Option<Pillar>,
    pub is_entrance: bool,
    pub is_exit: bool,
    pub visited: bool,
    pub monster: Option<MonsterSaveData>,
}

/// Monster save data: the full stat block, so customized monsters survive
/// the trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterSaveData {
    pub kind: MonsterKind,
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub min_damage: i32,
    pub max_damage: i32,
    pub attack_speed: i32,
    pub hit_chance: f64,
    pub heal_chance: f64,
    pub min_heal: i32,
    pub max_heal: i32,
}

/// Snapshot a running game into primitive fields.
pub fn extract_save_data(game: &Game) -> SaveData {
    let hero = game.hero();
    let dungeon = game.dungeon();
    SaveData {
        version: SAVE_VERSION,
        seed: game.seed(),
        hero: HeroSaveData {
            class: hero.class(),
            name: hero.name().to_string(),
            hp: hero.hp(),
            healing_potions: hero.healing_potions(),
            vision_potions: hero.vision_potions(),
            active_vision: hero.active_vision(),
            pillars: hero.pillars().to_vec(),
            location: hero.location(),
        },
        dungeon: DungeonSaveData {
            width: dungeon.width(),
            height: dungeon.height(),
            entrance: dungeon.entrance(),
            exit: dungeon.exit(),
            rooms: dungeon
                .rooms()
                .map(|(_, room)| RoomSaveData {
                    doors: room.doors(),
                    has_pit: room.has_pit,
                    has_health_potion: room.has_health_potion,
                    has_vision_potion: room.has_vision_potion,
                    pillar: room.pillar,
                    is_entrance: room.is_entrance,
                    is_exit: room.is_exit,
                    visited: room.visited,
                    monster: room.monster.as_ref().map(|monster| MonsterSaveData {
                        kind: monster.kind(),
                        name: monster.name().to_string(),
                        hp: monster.hp(),
                        max_hp: monster.max_hp(),
                        min_damage: monster.damage_range().0,
                        max_damage: monster.damage_range().1,
                        attack_speed: monster.attack_speed(),
                        hit_chance: monster.hit_chance(),
                        heal_chance: monster.heal_chance(),
                        min_heal: monster.heal_range().0,
                        max_heal: monster.heal_range().1,
                    }),
                })
                .collect(),
        },
    }
}

/// Rebuild a game from a snapshot.
pub fn restore_game(data: SaveData) -> Result<Game, SaveError> {
    if data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: data.version,
        });
    }

    let rooms: Vec<Room> = data
        .dungeon
        .rooms
        .iter()
        .map(|saved| {
            let mut room = Room::new();
            room.set_doors(saved.doors);
            room.has_pit = saved.has_pit;
            room.has_health_potion = saved.has_health_potion;
            room.has_vision_potion = saved.has_vision_potion;
            room.pillar = saved.pillar;
            room.is_entrance = saved.is_entrance;
            room.is_exit = saved.is_exit;
            room.visited = saved.visited;
            room.monster = saved.monster.as_ref().map(|m| {
                Monster::restore(
                    m.kind,
                    m.name.clone(),
                    m.hp,
                    m.max_hp,
                    m.min_damage,
                    m.max_damage,
                    m.attack_speed,
                    m.hit_chance,
                    m.heal_chance,
                    m.min_heal,
                    m.max_heal,
                )
            });
            room
        })
        .collect();

    let dungeon = Dungeon::from_parts(
        data.dungeon.width,
        data.dungeon.height,
        data.dungeon.entrance,
        data.dungeon.exit,
        rooms,
    )
    .ok_or_else(|| SaveError::InvalidData("room list does not match dungeon size".to_string()))?;

    let hero = Hero::restore(
        data.hero.class,
        data.hero.name,
        data.hero.hp,
        data.hero.healing_potions,
        data.hero.vision_potions,
        data.hero.active_vision,
        data.hero.pillars,
        data.hero.location,
    );

    Ok(Game::from_parts(hero, dungeon, data.seed))
}

/// Resolve the save directory, falling back to the working directory when
/// no platform data dir is available.
fn save_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "undervault", "Undervault") {
        proj_dirs.data_dir().join("saves")
    } else {
        PathBuf::from("./saves")
    }
}

/// Full path of a slot file.
pub fn save_path(slot: u8) -> PathBuf {
    save_directory().join(format!("save_{}.json", slot))
}

/// Save the game to a slot.
pub fn save_game(game: &Game, slot: u8) -> Result<(), SaveError> {
    let data = extract_save_data(game);
    fs::create_dir_all(save_directory()).map_err(|e| SaveError::Io(e.to_string()))?;
    let json = serde_json::to_string_pretty(&data).map_err(|e| SaveError::Parse(e.to_string()))?;
    fs::write(save_path(slot), json).map_err(|e| SaveError::Io(e.to_string()))?;
    log::info!("game saved to slot {}", slot);
    Ok(())
}

/// Load a game from a slot.
pub fn load_game(slot: u8) -> Result<Game, SaveError> {
    let json =
        fs::read_to_string(save_path(slot)).map_err(|e| SaveError::Io(e.to_string()))?;
    let data: SaveData = serde_json::from_str(&json).map_err(|e| SaveError::Parse(e.to_string()))?;
    let game = restore_game(data)?;
    log::info!("game loaded from slot {}", slot);
    Ok(game)
}

pub fn save_exists(slot: u8) -> bool {
    save_path(slot).exists()
}

/// Delete a slot file, if present.
pub fn delete_save(slot: u8) -> Result<(), SaveError> {
    let path = save_path(slot);
    if path.exists() {
        fs::remove_file(path).map_err(|e| SaveError::Io(e.to_string()))?;
        log::info!("deleted save slot {}", slot);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::GenerationStrategy;
    use crate::game::GameState;

    #[test]
    fn test_snapshot_restores_the_run() {
        let game = Game::new(
            HeroClass::Priestess,
            "Vera",
            6,
            6,
            GenerationStrategy::SpanningTree,
            Some(21),
        )
        .unwrap();

        let data = extract_save_data(&game);
        // Through the wire format, as a real persistence layer would.
        let json = serde_json::to_string(&data).unwrap();
        let parsed: SaveData = serde_json::from_str(&json).unwrap();
        let restored = restore_game(parsed).unwrap();

        assert_eq!(restored.hero().class(), HeroClass::Priestess);
        assert_eq!(restored.hero().hp(), game.hero().hp());
        assert_eq!(restored.hero().location(), game.hero().location());
        assert_eq!(restored.seed(), 21);
        assert_eq!(*restored.state(), GameState::Exploring);

        // Structure survives: same doors and contents everywhere.
        for ((x, y), room) in game.dungeon().rooms() {
            let other = restored.dungeon().room(x, y).unwrap();
            assert_eq!(room.doors(), other.doors());
            assert_eq!(room.pillar, other.pillar);
            assert_eq!(room.has_pit, other.has_pit);
            assert_eq!(room.monster.is_some(), other.monster.is_some());
        }
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let game = Game::new(
            HeroClass::Warrior,
            "Brand",
            6,
            6,
            GenerationStrategy::OpenGrid,
            Some(4),
        )
        .unwrap();
        let mut data = extract_save_data(&game);
        data.version = 99;
        assert!(matches!(
            restore_game(data),
            Err(SaveError::VersionMismatch { found: 99, .. })
        ));
    }

    #[test]
    fn test_bad_room_count_is_rejected() {
        let game = Game::new(
            HeroClass::Warrior,
            "Brand",
            6,
            6,
            GenerationStrategy::OpenGrid,
            Some(4),
        )
        .unwrap();
        let mut data = extract_save_data(&game);
        data.dungeon.rooms.pop();
        assert!(matches!(restore_game(data), Err(SaveError::InvalidData(_))));
    }
}
