//! Combat primitives
//!
//! Atomic combat events and the per-round summary the driver renders.

/// What kind of event a combat action records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Attack,
    Special,
    Block,
    Heal,
    Info,
}

/// One atomic event inside a combat round.
#[derive(Debug, Clone)]
pub struct CombatAction {
    pub actor: String,
    pub kind: ActionKind,
    pub success: bool,
    pub damage: i32,
    pub healing: i32,
    pub message: String,
}

impl CombatAction {
    pub fn attack_hit(actor: &str, damage: i32, message: String) -> Self {
        Self {
            actor: actor.to_string(),
            kind: ActionKind::Attack,
            success: true,
            damage,
            healing: 0,
            message,
        }
    }

    pub fn attack_miss(actor: &str) -> Self {
        Self {
            actor: actor.to_string(),
            kind: ActionKind::Attack,
            success: false,
            damage: 0,
            healing: 0,
            message: format!("{} misses!", actor),
        }
    }

    pub fn block(actor: &str, message: String) -> Self {
        Self {
            actor: actor.to_string(),
            kind: ActionKind::Block,
            success: true,
            damage: 0,
            healing: 0,
            message,
        }
    }

    pub fn heal(actor: &str, healing: i32, message: String) -> Self {
        Self {
            actor: actor.to_string(),
            kind: ActionKind::Heal,
            success: true,
            damage: 0,
            healing,
            message,
        }
    }

    pub fn special(actor: &str, success: bool, damage: i32, message: String) -> Self {
        Self {
            actor: actor.to_string(),
            kind: ActionKind::Special,
            success,
            damage,
            healing: 0,
            message,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            actor: "System".to_string(),
            kind: ActionKind::Info,
            success: false,
            damage: 0,
            healing: 0,
            message: message.into(),
        }
    }
}

/// Everything that happened in one round, with HP bookkeeping done by
/// snapshot delta rather than by summing per-hit damages, which blocking
/// and healing would throw off.
#[derive(Debug, Clone)]
pub struct RoundResult {
    pub actions: Vec<CombatAction>,
    pub hero_damage_taken: i32,
    pub monster_damage_taken: i32,
    pub hero_hp: i32,
    pub hero_max_hp: i32,
    pub monster_hp: i32,
    pub monster_max_hp: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_constructors() {
        let miss = CombatAction::attack_miss("Ogre");
        assert_eq!(miss.kind, ActionKind::Attack);
        assert!(!miss.success);
        assert_eq!(miss.damage, 0);

        let heal = CombatAction::heal("Gremlin", 25, "Gremlin heals for 25 HP!".into());
        assert_eq!(heal.kind, ActionKind::Heal);
        assert_eq!(heal.healing, 25);

        let info = CombatAction::info("Combat has already ended!");
        assert_eq!(info.kind, ActionKind::Info);
        assert_eq!(info.actor, "System");
    }
}
