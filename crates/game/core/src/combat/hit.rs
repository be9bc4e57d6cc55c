//! Critical hit and special heal rolls.

use crate::env::RngOracle;

/// Result of a multiplier roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roll {
    /// Whether the boosted branch fired (critical hit, special heal).
    pub boosted: bool,
    /// Multiplier to apply (1 when not boosted).
    pub multiplier: u32,
}

impl Roll {
    pub const PLAIN: Self = Self {
        boosted: false,
        multiplier: 1,
    };
}

/// Check a per-mille chance against a d1000 roll.
///
/// A chance of 0 never fires and a chance of 1000 or more always fires,
/// regardless of the oracle.
///
/// # Arguments
///
/// * `rng` - Random oracle
/// * `seed` - Seed for this roll (see [`crate::env::compute_seed`])
/// * `chance_permille` - Probability in per-mille
/// * `multiplier` - Multiplier used when the roll fires
pub fn roll_chance(
    rng: &(impl RngOracle + ?Sized),
    seed: u64,
    chance_permille: u32,
    multiplier: u32,
) -> Roll {
    if chance_permille == 0 {
        return Roll::PLAIN;
    }
    let roll = rng.roll_permille(seed);
    if roll <= chance_permille {
        Roll {
            boosted: true,
            multiplier,
        }
    } else {
        Roll::PLAIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u32);

    impl RngOracle for Fixed {
        fn next_u32(&self, _seed: u64) -> u32 {
            self.0
        }
    }

    #[test]
    fn zero_chance_never_fires() {
        assert_eq!(roll_chance(&Fixed(0), 1, 0, 3), Roll::PLAIN);
    }

    #[test]
    fn low_roll_fires_under_chance() {
        // next_u32 = 0 -> roll 1
        let roll = roll_chance(&Fixed(0), 1, 100, 2);
        assert!(roll.boosted);
        assert_eq!(roll.multiplier, 2);
    }

    #[test]
    fn high_roll_misses() {
        // next_u32 = 999 -> roll 1000
        let roll = roll_chance(&Fixed(999), 1, 999, 2);
        assert_eq!(roll, Roll::PLAIN);
        assert!(roll_chance(&Fixed(999), 1, 1000, 2).boosted);
    }
}
