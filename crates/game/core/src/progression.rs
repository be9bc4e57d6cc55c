//! Experience, leveling and floor access rules.
//!
//! # Level thresholds
//!
//! Leaving level `n` costs `n * K` experience, where `K` is
//! [`ProgressionRules::level_up_multiplier`]. A positive delta consumes
//! thresholds upward; a negative delta unwinds them one level at a time.
//!
//! # Stat growth
//!
//! ```text
//! levels     = new_level - old_level
//! milestones = new_level / interval - old_level / interval
//! hp, max_hp     += levels * hp_per_level      + milestones * bonus
//! attack_power   += levels * attack_per_level  + milestones * bonus
//! healing_power  += levels * healing_per_level + milestones * bonus
//! ```
//!
//! Both terms are signed, so leveling down removes exactly what leveling up
//! granted for the same levels.

use std::ops::RangeInclusive;

use crate::config::{ProgressionRules, RosterRules, SettlementRules};
use crate::state::{BattleOutcome, PlayerStats};

/// Applies a signed experience delta and returns the new player snapshot.
///
/// Pure: persistence is the caller's job.
///
/// # Invariants
///
/// - `level >= 1`
/// - `experience >= 0` (negative totals are clamped)
/// - `0 <= hp <= max_hp`; HP only moves by the stat growth
/// - a zero delta returns `stats` unchanged
pub fn apply_experience_delta(
    stats: &PlayerStats,
    delta: i64,
    rules: &ProgressionRules,
) -> PlayerStats {
    if delta == 0 {
        return *stats;
    }

    let k = i64::from(rules.level_up_multiplier.max(1));
    let old_level = i64::from(stats.level.max(1));
    let mut level = old_level;
    let mut total = i64::from(stats.experience).saturating_add(delta);

    if delta > 0 {
        while total >= level * k {
            total -= level * k;
            level += 1;
        }
    } else {
        while level > 1 && total < (level - 1) * k {
            level -= 1;
            total += level * k;
        }
    }

    let experience = clamp_u32(total.max(0));
    let levels = level - old_level;
    let milestones = milestone_count(level, rules) - milestone_count(old_level, rules);
    let bonus = milestones * i64::from(rules.milestone_bonus);

    let hp_growth = levels * i64::from(rules.hp_per_level) + bonus;
    let attack_growth = levels * i64::from(rules.attack_per_level) + bonus;
    let healing_growth = levels * i64::from(rules.healing_per_level) + bonus;

    let max_hp = clamp_u32((i64::from(stats.max_hp) + hp_growth).max(1));
    let hp = clamp_u32((i64::from(stats.hp) + hp_growth).clamp(0, i64::from(max_hp)));

    PlayerStats {
        hp,
        max_hp,
        level: clamp_u32(level),
        experience,
        attack_power: clamp_u32((i64::from(stats.attack_power) + attack_growth).max(0)),
        healing_power: clamp_u32((i64::from(stats.healing_power) + healing_growth).max(0)),
    }
}

fn milestone_count(level: i64, rules: &ProgressionRules) -> i64 {
    match rules.milestone_interval {
        0 => 0,
        interval => level / i64::from(interval),
    }
}

fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Experience needed to leave `level`.
pub fn next_level_threshold(level: u32, rules: &ProgressionRules) -> u32 {
    level.max(1).saturating_mul(rules.level_up_multiplier.max(1))
}

/// Experience still missing before the next level up.
pub fn experience_to_next_level(stats: &PlayerStats, rules: &ProgressionRules) -> u32 {
    next_level_threshold(stats.level, rules).saturating_sub(stats.experience)
}

/// Floors a player may enter: one floor per level reached.
pub fn available_floors(level: u32) -> RangeInclusive<u32> {
    1..=level.max(1)
}

/// Difficulty tier of a floor: `ceil(floor / difficulty_increment_floor)`.
pub fn difficulty_for_floor(floor_level: u32, rules: &RosterRules) -> u32 {
    floor_level
        .max(1)
        .div_ceil(rules.difficulty_increment_floor.max(1))
}

/// Signed experience change for a finished floor.
///
/// ```text
/// win:  +(difficulty * floor * win_multiplier_percent / 100)
/// lose: -(difficulty * floor * lose_multiplier_percent / 100)
/// ```
///
/// The percentage division rounds half up. Results beyond `i64` saturate.
pub fn experience_delta_for(
    outcome: BattleOutcome,
    difficulty: u32,
    floor_level: u32,
    rules: &SettlementRules,
) -> i64 {
    let base = i128::from(difficulty) * i128::from(floor_level);
    match outcome {
        BattleOutcome::Win => percent_of(base, rules.win_multiplier_percent),
        BattleOutcome::Lose => -percent_of(base, rules.lose_multiplier_percent),
    }
}

fn percent_of(base: i128, percent: u32) -> i64 {
    let scaled = (base * i128::from(percent) + 50) / 100;
    i64::try_from(scaled).unwrap_or(i64::MAX)
}
