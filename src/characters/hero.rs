//! Hero classes
//!
//! Three playable classes share the block/potion/pillar kit; each brings
//! its own special skill to combat.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Combatant, Monster};
use crate::items::{Pillar, PotionKind, POTION_HEAL_MAX, POTION_HEAL_MIN};

/// Playable class tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeroClass {
    Warrior,
    Priestess,
    Thief,
}

/// Fixed per-class base stats.
struct ClassDef {
    hp: i32,
    min_damage: i32,
    max_damage: i32,
    attack_speed: i32,
    hit_chance: f64,
    block_chance: f64,
}

const WARRIOR: ClassDef = ClassDef {
    hp: 125,
    min_damage: 35,
    max_damage: 60,
    attack_speed: 4,
    hit_chance: 0.8,
    block_chance: 0.2,
};

const PRIESTESS: ClassDef = ClassDef {
    hp: 75,
    min_damage: 25,
    max_damage: 45,
    attack_speed: 5,
    hit_chance: 0.7,
    block_chance: 0.3,
};

const THIEF: ClassDef = ClassDef {
    hp: 75,
    min_damage: 20,
    max_damage: 40,
    attack_speed: 6,
    hit_chance: 0.8,
    block_chance: 0.4,
};

/// Crushing Blow success chance and damage range.
const CRUSHING_BLOW_CHANCE: f64 = 0.4;
const CRUSHING_BLOW_MIN: i32 = 75;
const CRUSHING_BLOW_MAX: i32 = 175;

/// Priestess self-heal range.
const DIVINE_HEAL_MIN: i32 = 25;
const DIVINE_HEAL_MAX: i32 = 50;

impl HeroClass {
    pub const ALL: [HeroClass; 3] = [HeroClass::Warrior, HeroClass::Priestess, HeroClass::Thief];

    fn def(&self) -> &'static ClassDef {
        match self {
            HeroClass::Warrior => &WARRIOR,
            HeroClass::Priestess => &PRIESTESS,
            HeroClass::Thief => &THIEF,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            HeroClass::Warrior => "Warrior",
            HeroClass::Priestess => "Priestess",
            HeroClass::Thief => "Thief",
        }
    }

    pub fn skill_name(&self) -> &'static str {
        match self {
            HeroClass::Warrior => "Crushing Blow",
            HeroClass::Priestess => "Divine Heal",
            HeroClass::Thief => "Surprise Attack",
        }
    }
}

/// The player character.
#[derive(Debug, Clone)]
pub struct Hero {
    name: String,
    class: HeroClass,
    max_hp: i32,
    hp: i32,
    min_damage: i32,
    max_damage: i32,
    attack_speed: i32,
    hit_chance: f64,
    block_chance: f64,
    healing_potions: u32,
    vision_potions: u32,
    active_vision: bool,
    pillars: Vec<Pillar>,
    location: Option<(i32, i32)>,
}

impl Hero {
    pub fn new(class: HeroClass, name: impl Into<String>) -> Self {
        let def = class.def();
        Self {
            name: name.into(),
            class,
            max_hp: def.hp,
            hp: def.hp,
            min_damage: def.min_damage,
            max_damage: def.max_damage,
            attack_speed: def.attack_speed,
            hit_chance: def.hit_chance,
            block_chance: def.block_chance,
            healing_potions: 0,
            vision_potions: 0,
            active_vision: false,
            pillars: Vec::new(),
            location: None,
        }
    }

    /// Rebuild a hero from saved primitive fields.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        class: HeroClass,
        name: impl Into<String>,
        hp: i32,
        healing_potions: u32,
        vision_potions: u32,
        active_vision: bool,
        pillars: Vec<Pillar>,
        location: Option<(i32, i32)>,
    ) -> Self {
        let mut hero = Self::new(class, name);
        hero.hp = hp.clamp(0, hero.max_hp);
        hero.healing_potions = healing_potions;
        hero.vision_potions = vision_potions;
        hero.active_vision = active_vision;
        for pillar in pillars {
            hero.collect_pillar(pillar);
        }
        hero.location = location;
        hero
    }

    pub fn class(&self) -> HeroClass {
        self.class
    }

    pub fn block_chance(&self) -> f64 {
        self.block_chance
    }

    pub fn healing_potions(&self) -> u32 {
        self.healing_potions
    }

    pub fn vision_potions(&self) -> u32 {
        self.vision_potions
    }

    pub fn active_vision(&self) -> bool {
        self.active_vision
    }

    pub fn location(&self) -> Option<(i32, i32)> {
        self.location
    }

    pub fn set_location(&mut self, pos: (i32, i32)) {
        self.location = Some(pos);
    }

    pub fn pillars(&self) -> &[Pillar] {
        &self.pillars
    }

    pub fn has_pillar(&self, pillar: Pillar) -> bool {
        self.pillars.contains(&pillar)
    }

    pub fn has_all_pillars(&self) -> bool {
        self.pillars.len() == Pillar::ALL.len()
    }

    fn set_hp(&mut self, value: i32) {
        self.hp = value.clamp(0, self.max_hp);
    }

    /// Restore hit points, clamped at max. Returns the amount actually healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.set_hp(self.hp + amount);
        self.hp - before
    }

    /// Resolve incoming damage: roll the block first, and only apply the
    /// damage when the block fails. Returns true when the hit was blocked.
    ///
    /// The block roll is independent of the attacker's hit roll; a landed
    /// hit can still be fully negated here.
    pub fn take_damage(&mut self, amount: i32, rng: &mut impl Rng) -> bool {
        if rng.gen_bool(self.block_chance) {
            return true;
        }
        self.set_hp(self.hp - amount);
        false
    }

    pub fn collect_potion(&mut self, kind: PotionKind) {
        match kind {
            PotionKind::Healing => self.healing_potions += 1,
            PotionKind::Vision => self.vision_potions += 1,
        }
    }

    /// Add a pillar to the collection. Returns false if it was already held.
    pub fn collect_pillar(&mut self, pillar: Pillar) -> bool {
        if self.pillars.contains(&pillar) {
            return false;
        }
        self.pillars.push(pillar);
        true
    }

    /// Drink a healing potion, if any. Returns the amount actually healed.
    pub fn use_healing_potion(&mut self, rng: &mut impl Rng) -> Option<i32> {
        if self.healing_potions == 0 {
            return None;
        }
        self.healing_potions -= 1;
        let amount = rng.gen_range(POTION_HEAL_MIN..=POTION_HEAL_MAX);
        Some(self.heal(amount))
    }

    /// Drink a vision potion, if any. The reveal itself happens on movement,
    /// while `active_vision` is set.
    pub fn use_vision_potion(&mut self) -> bool {
        if self.vision_potions == 0 {
            return false;
        }
        self.vision_potions -= 1;
        self.active_vision = true;
        true
    }

    /// Clear the vision effect after its reveal has fired.
    pub fn expire_vision(&mut self) {
        self.active_vision = false;
    }

    /// Use the class special skill on `opponent`.
    ///
    /// Returns whether the skill succeeded and a message describing the
    /// outcome. Damage (or self-healing) is applied as a side effect.
    pub fn special_skill(&mut self, opponent: &mut Monster, rng: &mut impl Rng) -> (bool, String) {
        match self.class {
            HeroClass::Warrior => self.crushing_blow(opponent, rng),
            HeroClass::Priestess => self.divine_heal(rng),
            HeroClass::Thief => self.surprise_attack(opponent, rng),
        }
    }

    /// Crushing Blow: 40% chance to land a massive hit, nothing otherwise.
    fn crushing_blow(&mut self, opponent: &mut Monster, rng: &mut impl Rng) -> (bool, String) {
        if rng.gen_bool(CRUSHING_BLOW_CHANCE) {
            let damage = rng.gen_range(CRUSHING_BLOW_MIN..=CRUSHING_BLOW_MAX);
            opponent.take_damage(damage, rng);
            (true, format!("Crushing Blow hits for {} damage!", damage))
        } else {
            (false, "Crushing Blow misses!".to_string())
        }
    }

    /// Divine Heal: always works, but only below full health.
    fn divine_heal(&mut self, rng: &mut impl Rng) -> (bool, String) {
        if self.hp < self.max_hp {
            let amount = rng.gen_range(DIVINE_HEAL_MIN..=DIVINE_HEAL_MAX);
            let healed = self.heal(amount);
            (true, format!("Healed for {} HP!", healed))
        } else {
            (false, "Already at full health!".to_string())
        }
    }

    /// Surprise Attack: one draw decides between a double attack (40%),
    /// getting caught (20%), and a single ordinary attack (40%). Every
    /// attack inside is still subject to the normal hit chance.
    fn surprise_attack(&mut self, opponent: &mut Monster, rng: &mut impl Rng) -> (bool, String) {
        let roll: f64 = rng.gen();

        if roll < 0.4 {
            let (hit1, damage1) = self.roll_attack(rng);
            if hit1 {
                opponent.take_damage(damage1, rng);
            }
            let (hit2, damage2) = self.roll_attack(rng);
            if hit2 {
                opponent.take_damage(damage2, rng);
            }
            if hit1 || hit2 {
                let mut parts = Vec::new();
                if hit1 {
                    parts.push(format!("First strike hits for {}", damage1));
                }
                if hit2 {
                    parts.push(format!("Bonus strike hits for {}", damage2));
                }
                (true, format!("Surprise Attack! {}!", parts.join(" and ")))
            } else {
                (false, "Surprise Attack misses completely!".to_string())
            }
        } else if roll < 0.6 {
            (false, "Got caught attempting Surprise Attack!".to_string())
        } else {
            let (hit, damage) = self.roll_attack(rng);
            if hit {
                opponent.take_damage(damage, rng);
                (true, format!("Normal attack hits for {} damage!", damage))
            } else {
                (false, "Attack misses!".to_string())
            }
        }
    }

    pub fn status_line(&self) -> String {
        format!(
            "{} {} (HP: {}/{}) | Healing: {} | Vision: {} | Pillars: {}",
            self.class.title(),
            self.name,
            self.hp,
            self.max_hp,
            self.healing_potions,
            self.vision_potions,
            if self.pillars.is_empty() {
                "none".to_string()
            } else {
                self.pillars
                    .iter()
                    .map(|p| p.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        )
    }
}

impl Combatant for Hero {
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
