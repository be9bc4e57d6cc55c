//! Boss selection for a floor.
//!
//! A floor always opens with a boss of exactly the requested difficulty.
//! Higher-level players face extra bosses sampled without replacement from
//! everything at or below that difficulty.

use crate::config::RosterRules;
use crate::env::{RngOracle, compute_seed, streams};
use crate::error::{ErrorSeverity, TowerError};
use crate::state::BossTemplate;

/// Errors raised while building a floor roster.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("no bosses available for difficulty {difficulty}")]
    NoBossesAvailable { difficulty: u32 },
}

impl TowerError for RosterError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoBossesAvailable { .. } => "ROSTER_NO_BOSSES",
        }
    }
}

/// Number of bosses a player of `level` faces on one floor.
pub fn boss_count_for_level(level: u32, rules: &RosterRules) -> usize {
    (level / rules.levels_per_extra_boss.max(1)) as usize + 1
}

/// Selects the ordered boss sequence for a floor.
///
/// The result holds `min(boss_count, pool_size)` bosses where the pool is
/// every catalog entry with `difficulty <= target_difficulty`. The first
/// boss always has exactly `target_difficulty`.
pub fn select_floor_bosses(
    catalog: &[BossTemplate],
    target_difficulty: u32,
    player_level: u32,
    rules: &RosterRules,
    rng: &(impl RngOracle + ?Sized),
    seed: u64,
) -> Result<Vec<BossTemplate>, RosterError> {
    let missing = RosterError::NoBossesAvailable {
        difficulty: target_difficulty,
    };

    let pool: Vec<&BossTemplate> = catalog
        .iter()
        .filter(|boss| boss.difficulty <= target_difficulty)
        .collect();
    if pool.is_empty() {
        return Err(missing);
    }

    let exact: Vec<&BossTemplate> = pool
        .iter()
        .copied()
        .filter(|boss| boss.difficulty == target_difficulty)
        .collect();
    if exact.is_empty() {
        return Err(missing);
    }
    let first = exact[rng.pick_index(roll_seed(seed, 0), exact.len())];

    let wanted = boss_count_for_level(player_level, rules);
    let mut roster = Vec::with_capacity(wanted.min(pool.len()));
    roster.push(first.clone());

    let mut rest: Vec<&BossTemplate> = pool
        .into_iter()
        .filter(|boss| boss.id != first.id)
        .collect();
    let extra = (wanted - 1).min(rest.len());

    // Partial Fisher-Yates: the first `extra` slots end up uniformly sampled.
    for slot in 0..extra {
        let offset = rng.pick_index(roll_seed(seed, slot as u32 + 1), rest.len() - slot);
        rest.swap(slot, slot + offset);
        roster.push(rest[slot].clone());
    }

    Ok(roster)
}

fn roll_seed(seed: u64, context: u32) -> u64 {
    compute_seed(seed, 0, streams::ROSTER, context)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::env::PcgRng;
    use crate::state::BossId;

    struct Fixed(u32);

    impl RngOracle for Fixed {
        fn next_u32(&self, _seed: u64) -> u32 {
            self.0
        }
    }

    fn catalog(difficulties: &[u32]) -> Vec<BossTemplate> {
        difficulties
            .iter()
            .enumerate()
            .map(|(index, &difficulty)| {
                BossTemplate::new(BossId(index as u32 + 1), "Boss", 20, 4, 2, difficulty)
            })
            .collect()
    }

    #[test]
    fn boss_count_grows_every_ten_levels() {
        let rules = RosterRules::default();
        assert_eq!(boss_count_for_level(1, &rules), 1);
        assert_eq!(boss_count_for_level(9, &rules), 1);
        assert_eq!(boss_count_for_level(10, &rules), 2);
        assert_eq!(boss_count_for_level(21, &rules), 3);
    }

    #[test]
    fn level_twenty_one_draws_three_bosses() {
        let catalog = catalog(&[1, 2, 3, 3, 4]);
        let rules = RosterRules::default();

        for seed in 0..64 {
            let roster = select_floor_bosses(&catalog, 3, 21, &rules, &PcgRng, seed).unwrap();
            assert_eq!(roster.len(), 3);
            assert_eq!(roster[0].difficulty, 3);
            assert!(roster.iter().all(|boss| boss.difficulty <= 3));
            let ids: HashSet<_> = roster.iter().map(|boss| boss.id).collect();
            assert_eq!(ids.len(), 3);
        }
    }

    #[test]
    fn small_pool_stops_early() {
        let catalog = catalog(&[1, 1, 5]);
        let roster =
            select_floor_bosses(&catalog, 1, 50, &RosterRules::default(), &PcgRng, 9).unwrap();
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn missing_pools_are_errors() {
        let rules = RosterRules::default();
        assert_eq!(
            select_floor_bosses(&catalog(&[4]), 3, 1, &rules, &PcgRng, 0),
            Err(RosterError::NoBossesAvailable { difficulty: 3 })
        );
        assert_eq!(
            select_floor_bosses(&catalog(&[1, 2]), 3, 1, &rules, &PcgRng, 0),
            Err(RosterError::NoBossesAvailable { difficulty: 3 })
        );
    }

    #[test]
    fn selection_follows_the_oracle() {
        let catalog = catalog(&[2, 2, 1]);
        let rules = RosterRules::default();

        let roster = select_floor_bosses(&catalog, 2, 10, &rules, &Fixed(1), 0).unwrap();
        assert_eq!(roster[0].id, BossId(2));
        // remaining pool [1, 3]; offset 1 % 2 picks boss 3
        assert_eq!(roster[1].id, BossId(3));

        let again = select_floor_bosses(&catalog, 2, 10, &rules, &PcgRng, 77).unwrap();
        let repeat = select_floor_bosses(&catalog, 2, 10, &rules, &PcgRng, 77).unwrap();
        assert_eq!(again, repeat);
    }
}
