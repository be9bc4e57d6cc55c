/// Battle tower configuration constants and tunable parameters.
///
/// Probabilities are expressed in per-mille (`0..=1000`) and multipliers in
/// percent so every rule evaluates with integer arithmetic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TowerConfig {
    pub progression: ProgressionRules,
    pub combat: CombatRules,
    pub roster: RosterRules,
    pub settlement: SettlementRules,
}

impl TowerConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Experience thresholds and per-level stat growth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProgressionRules {
    /// Experience needed to leave level `n` is `n * level_up_multiplier`.
    pub level_up_multiplier: u32,
    pub hp_per_level: u32,
    pub attack_per_level: u32,
    pub healing_per_level: u32,
    /// Every multiple of this level grants `milestone_bonus` on top of the
    /// per-level growth. Zero disables milestones.
    pub milestone_interval: u32,
    pub milestone_bonus: u32,
}

impl ProgressionRules {
    pub const DEFAULT_LEVEL_UP_MULTIPLIER: u32 = 15;
    pub const DEFAULT_HP_PER_LEVEL: u32 = 1;
    pub const DEFAULT_POWER_PER_LEVEL: u32 = 2;
    pub const DEFAULT_MILESTONE_INTERVAL: u32 = 10;
    pub const DEFAULT_MILESTONE_BONUS: u32 = 2;
}

impl Default for ProgressionRules {
    fn default() -> Self {
        Self {
            level_up_multiplier: Self::DEFAULT_LEVEL_UP_MULTIPLIER,
            hp_per_level: Self::DEFAULT_HP_PER_LEVEL,
            attack_per_level: Self::DEFAULT_POWER_PER_LEVEL,
            healing_per_level: Self::DEFAULT_POWER_PER_LEVEL,
            milestone_interval: Self::DEFAULT_MILESTONE_INTERVAL,
            milestone_bonus: Self::DEFAULT_MILESTONE_BONUS,
        }
    }
}

/// Combat balance parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatRules {
    pub player_crit_chance_permille: u32,
    pub player_crit_multiplier: u32,
    pub special_heal_chance_permille: u32,
    pub special_heal_multiplier: u32,
    pub boss_crit_chance_permille: u32,
    pub boss_crit_multiplier: u32,
    /// Self-damage on a wrong attack answer is `attack_power / damage_divisor`.
    pub damage_divisor: u32,
}

impl CombatRules {
    pub const PERMILLE: u32 = 1000;

    /// Rules with every probabilistic branch disabled.
    pub fn without_rolls() -> Self {
        Self {
            player_crit_chance_permille: 0,
            special_heal_chance_permille: 0,
            boss_crit_chance_permille: 0,
            ..Self::default()
        }
    }
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            player_crit_chance_permille: 100,
            player_crit_multiplier: 2,
            special_heal_chance_permille: 125,
            special_heal_multiplier: 2,
            boss_crit_chance_permille: 50,
            boss_crit_multiplier: 3,
            damage_divisor: 5,
        }
    }
}

/// Floor and roster sizing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RosterRules {
    /// One extra boss per this many player levels.
    pub levels_per_extra_boss: u32,
    /// Floors per difficulty tier.
    pub difficulty_increment_floor: u32,
}

impl Default for RosterRules {
    fn default() -> Self {
        Self {
            levels_per_extra_boss: 10,
            difficulty_increment_floor: 10,
        }
    }
}

/// Experience awarded or removed when a floor ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SettlementRules {
    pub win_multiplier_percent: u32,
    pub lose_multiplier_percent: u32,
}

impl Default for SettlementRules {
    fn default() -> Self {
        Self {
            win_multiplier_percent: 130,
            lose_multiplier_percent: 120,
        }
    }
}
