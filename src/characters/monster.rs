//! Monster archetypes
//!
//! Four archetypes with fixed stat tables and the shared heal-on-hit rule.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Combatant;

/// Monster archetype tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonsterKind {
    Ogre,
    Skeleton,
    Gremlin,
    Dragon,
}

/// Archetype definition with all combat stats.
pub struct MonsterDef {
    pub name: &'static str,
    pub hp: i32,
    pub min_damage: i32,
    pub max_damage: i32,
    pub attack_speed: i32,
    pub hit_chance: f64,
    pub heal_chance: f64,
    pub min_heal: i32,
    pub max_heal: i32,
}

pub const OGRE: MonsterDef = MonsterDef {
    name: "Ogre",
    hp: 200,
    min_damage: 30,
    max_damage: 60,
    attack_speed: 2,
    hit_chance: 0.6,
    heal_chance: 0.1,
    min_heal: 30,
    max_heal: 60,
};

pub const SKELETON: MonsterDef = MonsterDef {
    name: "Skeleton",
    hp: 100,
    min_damage: 30,
    max_damage: 50,
    attack_speed: 3,
    hit_chance: 0.8,
    heal_chance: 0.3,
    min_heal: 30,
    max_heal: 50,
};

pub const GREMLIN: MonsterDef = MonsterDef {
    name: "Gremlin",
    hp: 70,
    min_damage: 15,
    max_damage: 30,
    attack_speed: 5,
    hit_chance: 0.8,
    heal_chance: 0.4,
    min_heal: 20,
    max_heal: 40,
};

pub const DRAGON: MonsterDef = MonsterDef {
    name: "Dragon",
    hp: 300,
    min_damage: 35,
    max_damage: 75,
    attack_speed: 2,
    hit_chance: 0.6,
    heal_chance: 0.1,
    min_heal: 20,
    max_heal: 40,
};

impl MonsterKind {
    pub const ALL: [MonsterKind; 4] = [
        MonsterKind::Ogre,
        MonsterKind::Skeleton,
        MonsterKind::Gremlin,
        MonsterKind::Dragon,
    ];

    pub fn def(&self) -> &'static MonsterDef {
        match self {
            MonsterKind::Ogre => &OGRE,
            MonsterKind::Skeleton => &SKELETON,
            MonsterKind::Gremlin => &GREMLIN,
            MonsterKind::Dragon => &DRAGON,
        }
    }
}

/// A dungeon monster. Owned by the room it haunts.
#[derive(Debug, Clone)]
pub struct Monster {
    kind: MonsterKind,
    name: String,
    max_hp: i32,
    hp: i32,
    min_damage: i32,
    max_damage: i32,
    attack_speed: i32,
    hit_chance: f64,
    heal_chance: f64,
    min_heal: i32,
    max_heal: i32,
}

impl Monster {
    pub fn new(kind: MonsterKind) -> Self {
        let def = kind.def();
        Self {
            kind,
            name: def.name.to_string(),
            max_hp: def.hp,
            hp: def.hp,
            min_damage: def.min_damage,
            max_damage: def.max_damage,
            attack_speed: def.attack_speed,
            hit_chance: def.hit_chance,
            heal_chance: def.heal_chance,
            min_heal: def.min_heal,
            max_heal: def.max_heal,
        }
    }

    /// Rebuild a monster from explicit stats (saved games, tests).
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        kind: MonsterKind,
        name: impl Into<String>,
        hp: i32,
        max_hp: i32,
        min_damage: i32,
        max_damage: i32,
        attack_speed: i32,
        hit_chance: f64,
        heal_chance: f64,
        min_heal: i32,
        max_heal: i32,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            max_hp,
            hp: hp.clamp(0, max_hp),
            min_damage,
            max_damage,
            attack_speed: attack_speed.max(1),
            hit_chance,
            heal_chance,
            min_heal,
            max_heal,
        }
    }

    pub fn kind(&self) -> MonsterKind {
        self.kind
    }

    pub fn heal_chance(&self) -> f64 {
        self.heal_chance
    }

    pub fn heal_range(&self) -> (i32, i32) {
        (self.min_heal, self.max_heal)
    }

    fn set_hp(&mut self, value: i32) {
        self.hp = value.clamp(0, self.max_hp);
    }

    fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.set_hp(self.hp + amount);
        self.hp - before
    }

    /// Apply the damage, then roll the post-damage heal, but only while
    /// still alive. Returns the amount actually healed (after the max-HP
    /// clamp), or 0.
    pub fn take_damage(&mut self, amount: i32, rng: &mut impl Rng) -> i32 {
        self.set_hp(self.hp - amount);
        if self.is_alive() && rng.gen_bool(self.heal_chance) {
            let amount = rng.gen_range(self.min_heal..=self.max_heal);
            self.heal(amount)
        } else {
            0
        }
    }

    pub fn status_line(&self) -> String {
        format!("{} (HP: {}/{})", self.name, self.hp, self.max_hp)
    }
}

impl Combatant for Monster {
    fn name(&self) -> &str {
        &self.name
    }

    fn hp(&self) -> i32 {
        self.hp
    }

    fn max_hp(&self) -> i32 {
        self.max_hp
    }

    fn attack_speed(&self) -> i32 {
        self.attack_speed
    }

    fn hit_chance(&self) -> f64 {
        self.hit_chance
    }

    fn damage_range(&self) -> (i32, i32) {
        (self.min_damage, self.max_damage)
    }
}
