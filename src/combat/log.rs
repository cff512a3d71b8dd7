//! Round formatting
//!
//! Turns a `RoundResult` into plain log lines for whatever front end is
//! listening.

use super::action::RoundResult;

/// Format a round as readable messages: the individual events, then a
/// status block, then the damage summary.
pub fn format_round_result(result: &RoundResult) -> Vec<String> {
    let mut lines: Vec<String> = result
        .actions
        .iter()
        .map(|action| action.message.clone())
        .collect();

    lines.push(String::new());
    lines.push("Status:".to_string());
    lines.push(format!("Hero: {}/{} HP", result.hero_hp, result.hero_max_hp));
    lines.push(format!(
        "Monster: {}/{} HP",
        result.monster_hp, result.monster_max_hp
    ));

    if result.hero_damage_taken > 0 {
        lines.push(format!("You took {} damage.", result.hero_damage_taken));
    }
    if result.monster_damage_taken > 0 {
        lines.push(format!(
            "The monster took {} damage.",
            result.monster_damage_taken
        ));
    }

    lines
}
