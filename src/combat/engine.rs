//! Round resolution
//!
//! Drives one hero/monster exchange at a time: the hero acts first (basic
//! attacks or the class special), then the monster answers if it survived.
//! Every event is reported as a structured action; net damage comes from
//! HP snapshots alone.

use rand::Rng;

use crate::characters::{Combatant, Hero, Monster};

use super::action::{CombatAction, RoundResult};

/// Who won a finished combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Victor {
    Hero,
    Monster,
}

/// A combat session between the hero and one monster.
///
/// Borrows both combatants for the duration of a call sequence; the room
/// keeps ownership of its monster throughout.
pub struct CombatSystem<'a> {
    hero: &'a mut Hero,
    monster: &'a mut Monster,
}

impl<'a> CombatSystem<'a> {
    pub fn new(hero: &'a mut Hero, monster: &'a mut Monster) -> Self {
        Self { hero, monster }
    }

    /// Combat ends the moment either side's HP crosses zero.
    pub fn is_over(&self) -> bool {
        !self.hero.is_alive() || !self.monster.is_alive()
    }

    pub fn victor(&self) -> Option<Victor> {
        if !self.hero.is_alive() {
            Some(Victor::Monster)
        } else if !self.monster.is_alive() {
            Some(Victor::Hero)
        } else {
            None
        }
    }

    /// Execute a full round. Calling this after combat has ended is a
    /// benign no-op that reports the fact as an `Info` action.
    pub fn execute_round(&mut self, use_special: bool, rng: &mut impl Rng) -> RoundResult {
        if self.is_over() {
            return self.round_result(
                vec![CombatAction::info("Combat has already ended!")],
                self.hero.hp(),
                self.monster.hp(),
            );
        }

        let hero_start = self.hero.hp();
        let monster_start = self.monster.hp();
        let mut actions = Vec::new();

        if use_special {
            actions.push(self.hero_special(rng));
        } else {
            actions.extend(self.hero_attacks(rng));
        }

        if self.monster.is_alive() {
            actions.extend(self.monster_attacks(rng));
        }

        self.round_result(actions, hero_start, monster_start)
    }

    fn round_result(
        &self,
        actions: Vec<CombatAction>,
        hero_start: i32,
        monster_start: i32,
    ) -> RoundResult {
        RoundResult {
            actions,
            hero_damage_taken: (hero_start - self.hero.hp()).max(0),
            monster_damage_taken: (monster_start - self.monster.hp()).max(0),
            hero_hp: self.hero.hp(),
            hero_max_hp: self.hero.max_hp(),
            monster_hp: self.monster.hp(),
            monster_max_hp: self.monster.max_hp(),
        }
    }

    /// The hero's basic multi-attack sequence against the monster.
    fn hero_attacks(&mut self, rng: &mut impl Rng) -> Vec<CombatAction> {
        let mut actions = Vec::new();
        let num_attacks = self.hero.num_attacks(&*self.monster);
        for _ in 0..num_attacks {
            if !self.monster.is_alive() {
                break;
            }
            let (hit, damage) = self.hero.roll_attack(rng);
            if !hit {
                actions.push(CombatAction::attack_miss(self.hero.name()));
                continue;
            }
            let hp_before = self.monster.hp();
            let healed = self.monster.take_damage(damage, rng);
            // Damage actually applied, before the heal offset it.
            let applied = damage.min(hp_before);
            actions.push(CombatAction::attack_hit(
                self.hero.name(),
                applied,
                format!("{} hits for {} damage!", self.hero.name(), applied),
            ));
            if healed > 0 {
                actions.push(CombatAction::heal(
                    self.monster.name(),
                    healed,
                    format!("{} heals for {} HP!", self.monster.name(), healed),
                ));
            }
        }
        actions
    }

    /// The monster's basic multi-attack sequence against the hero.
    fn monster_attacks(&mut self, rng: &mut impl Rng) -> Vec<CombatAction> {
        let mut actions = Vec::new();
        let num_attacks = self.monster.num_attacks(&*self.hero);
        for _ in 0..num_attacks {
            if !self.hero.is_alive() {
                break;
            }
            let (hit, damage) = self.monster.roll_attack(rng);
            if !hit {
                actions.push(CombatAction::attack_miss(self.monster.name()));
                continue;
            }
            let hp_before = self.hero.hp();
            if self.hero.take_damage(damage, rng) {
                actions.push(CombatAction::block(
                    self.hero.name(),
                    format!(
                        "{} attacks but {} blocks!",
                        self.monster.name(),
                        self.hero.name()
                    ),
                ));
            } else {
                let applied = hp_before - self.hero.hp();
                actions.push(CombatAction::attack_hit(
                    self.monster.name(),
                    applied,
                    format!("{} hits for {} damage!", self.monster.name(), applied),
                ));
            }
        }
        actions
    }

    /// The hero's special skill, reported as exactly one action. Damage is
    /// measured by the monster's HP delta, so a self-heal reads as zero.
    fn hero_special(&mut self, rng: &mut impl Rng) -> CombatAction {
        let hp_before = self.monster.hp();
        let (success, message) = self.hero.special_skill(self.monster, rng);
        let damage_dealt = (hp_before - self.monster.hp()).max(0);
        CombatAction::special(self.hero.name(), success, damage_dealt, message)
    }
}
