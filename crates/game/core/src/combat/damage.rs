//! Damage and heal calculation.

/// Apply a multiplier to a base amount, saturating on overflow.
pub fn scale(base: u32, multiplier: u32) -> u32 {
    base.saturating_mul(multiplier)
}

/// Self-inflicted damage for a failed attack.
///
/// # Formula
///
/// ```text
/// backfire = floor(attack_power / damage_divisor)
/// ```
///
/// A zero divisor is treated as 1.
pub fn backfire_damage(attack_power: u32, damage_divisor: u32) -> u32 {
    attack_power / damage_divisor.max(1)
}

/// Apply damage to current HP.
///
/// # Returns
///
/// New HP value (clamped to 0)
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

/// Apply healing to current HP.
///
/// # Returns
///
/// New HP value (clamped to `max_hp`)
pub fn apply_heal(current_hp: u32, amount: u32, max_hp: u32) -> u32 {
    current_hp.saturating_add(amount).min(max_hp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_floors_at_zero() {
        assert_eq!(apply_damage(5, 10), 0);
        assert_eq!(apply_damage(30, 10), 20);
    }

    #[test]
    fn heal_caps_at_max() {
        assert_eq!(apply_heal(90, 25, 100), 100);
        assert_eq!(apply_heal(50, 25, 100), 75);
    }

    #[test]
    fn backfire_uses_floor_division() {
        assert_eq!(backfire_damage(12, 5), 2);
        assert_eq!(backfire_damage(4, 5), 0);
        assert_eq!(backfire_damage(7, 0), 7);
    }
}
