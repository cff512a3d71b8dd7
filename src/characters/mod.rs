//! Characters
//!
//! The hero classes and monster archetypes that fight over the vault.

pub mod hero;
pub mod monster;

pub use hero::{Hero, HeroClass};
pub use monster::{Monster, MonsterKind};

use rand::Rng;

/// Capability surface every fighter exposes to the combat engine.
///
/// Damage application is deliberately not part of this trait: heroes and
/// monsters resolve incoming damage differently (block roll vs heal-on-hit)
/// and return different information, so the engine dispatches on the
/// concrete type for that step.
pub trait Combatant {
    fn name(&self) -> &str;
    fn hp(&self) -> i32;
    fn max_hp(&self) -> i32;
    fn attack_speed(&self) -> i32;
    fn hit_chance(&self) -> f64;
    fn damage_range(&self) -> (i32, i32);

    fn is_alive(&self) -> bool {
        self.hp() > 0
    }

    /// Attacks per round against `opponent`: one extra attack for each whole
    /// multiple of the opponent's speed, never fewer than one.
    fn num_attacks(&self, opponent: &impl Combatant) -> i32
    where
        Self: Sized,
    {
        (self.attack_speed() / opponent.attack_speed()).max(1)
    }

    /// Roll a single attack: hit check first, then uniform damage.
    ///
    /// The damage is not applied here; the defender's own damage path
    /// decides what actually lands.
    fn roll_attack(&self, rng: &mut impl Rng) -> (bool, i32)
    where
        Self: Sized,
    {
        if rng.gen_bool(self.hit_chance()) {
            let (min, max) = self.damage_range();
            (true, rng.gen_range(min..=max))
        } else {
            (false, 0)
        }
    }
}
