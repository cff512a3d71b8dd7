//! Room cells
//!
//! A single grid cell: door flags, content flags, visited state, and an
//! optional monster occupant.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::characters::{Combatant, Monster};
use crate::items::Pillar;

/// Cardinal movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Grid offset, with y growing southward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        };
        write!(f, "{}", name)
    }
}

/// One cell of the dungeon grid.
///
/// The room exclusively owns its monster; the slot empties when the
/// monster dies and its drops are collected.
#[derive(Debug, Clone, Default)]
pub struct Room {
    doors: [bool; 4],
    pub has_pit: bool,
    pub has_health_potion: bool,
    pub has_vision_potion: bool,
    pub pillar: Option<Pillar>,
    pub is_entrance: bool,
    pub is_exit: bool,
    pub visited: bool,
    pub monster: Option<Monster>,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn door(&self, direction: Direction) -> bool {
        self.doors[direction.index()]
    }

    pub fn set_door(&mut self, direction: Direction, open: bool) {
        self.doors[direction.index()] = open;
    }

    pub fn doors(&self) -> [bool; 4] {
        self.doors
    }

    pub fn set_doors(&mut self, doors: [bool; 4]) {
        self.doors = doors;
    }

    pub fn has_living_monster(&self) -> bool {
        self.monster.as_ref().is_some_and(|m| m.is_alive())
    }

    /// Map legend glyph for a visited room.
    pub fn display_glyph(&self) -> char {
        if self.is_entrance {
            return 'i';
        }
        if self.is_exit {
            return 'o';
        }
        if self.has_living_monster() {
            return 'M';
        }
        let contents = [
            self.has_pit,
            self.has_health_potion,
            self.has_vision_potion,
            self.pillar.is_some(),
        ];
        match contents.iter().filter(|&&c| c).count() {
            0 => ' ',
            1 if self.has_pit => 'X',
            1 if self.has_health_potion => 'H',
            1 if self.has_vision_potion => 'V',
            1 => self.pillar.map(|p| p.symbol()).unwrap_or(' '),
            _ => '*',
        }
    }
}
