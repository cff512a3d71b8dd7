//! Collectibles
//!
//! The four pillars the vault demands back, plus the tuning ranges for
//! potions and pit hazards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four relics required (all four) before the exit gate opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pillar {
    Aether,
    Ember,
    Iron,
    Pearl,
}

impl Pillar {
    pub const ALL: [Pillar; 4] = [Pillar::Aether, Pillar::Ember, Pillar::Iron, Pillar::Pearl];

    /// One-letter map symbol.
    pub fn symbol(&self) -> char {
        match self {
            Pillar::Aether => 'A',
            Pillar::Ember => 'E',
            Pillar::Iron => 'I',
            Pillar::Pearl => 'P',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Pillar::Aether => "Aether",
            Pillar::Ember => "Ember",
            Pillar::Iron => "Iron",
            Pillar::Pearl => "Pearl",
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Consumable potion kinds a room can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PotionKind {
    Healing,
    Vision,
}

/// Healing potion restore range.
pub const POTION_HEAL_MIN: i32 = 5;
pub const POTION_HEAL_MAX: i32 = 15;

/// Pit hazard damage range.
pub const PIT_DAMAGE_MIN: i32 = 10;
pub const PIT_DAMAGE_MAX: i32 = 20;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pillar_symbols_are_distinct() {
        let symbols: Vec<char> = Pillar::ALL.iter().map(|p| p.symbol()).collect();
        for (i, a) in symbols.iter().enumerate() {
            for b in &symbols[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_four_pillars() {
        assert_eq!(Pillar::ALL.len(), 4);
    }
}
