//! Damage calculation.

use super::Stance;
use crate::stats::CombatStats;

/// Defense at which incoming damage of a kind is halved.
pub const DEFENSE_HALVING: u32 = 20;

/// Dexterity scale. A dexterity difference of zero multiplies by one.
pub const DEXTERITY_SCALE: u32 = 64;

/// Denominator shared by the offense and exposure tables.
pub const STANCE_SCALE: u32 = 16;

/// Multiplier on damage dealt, by attacker stance.
pub const fn offense(stance: Stance) -> u32 {
    match stance {
        Stance::Aggressive => 6,
        Stance::Neutral => 4,
        Stance::Defensive => 2,
    }
}

/// Multiplier on damage received, by defender stance.
pub const fn exposure(stance: Stance) -> u32 {
    match stance {
        Stance::Aggressive => 5,
        Stance::Neutral => 4,
        Stance::Defensive => 3,
    }
}

/// Damage one hero deals to another in a single exchange.
///
/// # Formula
///
/// ```text
/// raw       = crush·H/(H+crush_def) + pierce·H/(H+pierce_def)
/// dexterity = (64 + attacker.dex) - defender.dex
/// damage    = raw · dexterity · offense · exposure / (64 · 16)
/// ```
///
/// Stepping closer raises both `offense` (as attacker) and `exposure`
/// (as defender), so closing in trades safety for damage.
///
/// Total over every [`CombatStats`]: intermediate values are widened to
/// `u128` and the result saturates at `u32::MAX`.
pub fn calculate_damage(
    attacker: &CombatStats,
    attacker_stance: Stance,
    defender: &CombatStats,
    defender_stance: Stance,
) -> u32 {
    let halving = u128::from(DEFENSE_HALVING);

    let mitigated = |damage: u32, defense: u32| {
        u128::from(damage) * halving / (halving + u128::from(defense))
    };
    let raw = mitigated(attacker.crush_damage, defender.crush_defense)
        + mitigated(attacker.pierce_damage, defender.pierce_defense);

    let dexterity = (u128::from(DEXTERITY_SCALE) + u128::from(attacker.dexterity_bonus))
        .saturating_sub(u128::from(defender.dexterity_bonus));

    let scaled = raw
        * dexterity
        * u128::from(offense(attacker_stance))
        * u128::from(exposure(defender_stance))
        / u128::from(DEXTERITY_SCALE * STANCE_SCALE);

    u32::try_from(scaled).unwrap_or(u32::MAX)
}
