/// Persistent player statistics.
///
/// Owned by the persistence layer. A battle holds a read-only snapshot of
/// these values; only the settlement result is ever written back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerStats {
    pub hp: u32,
    pub max_hp: u32,
    pub level: u32,
    pub experience: u32,
    pub attack_power: u32,
    pub healing_power: u32,
}

impl PlayerStats {
    pub const STARTING_HP: u32 = 100;
    pub const STARTING_POWER: u32 = 10;

    pub fn new(
        hp: u32,
        max_hp: u32,
        level: u32,
        experience: u32,
        attack_power: u32,
        healing_power: u32,
    ) -> Self {
        Self {
            hp,
            max_hp,
            level,
            experience,
            attack_power,
            healing_power,
        }
    }

    /// Returns true when `0 <= hp <= max_hp` and `level >= 1`.
    pub fn is_consistent(&self) -> bool {
        self.hp <= self.max_hp && self.level >= 1 && self.max_hp >= 1
    }

    /// Repairs out-of-range values read from storage.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.level = self.level.max(1);
        self.max_hp = self.max_hp.max(1);
        self.hp = self.hp.min(self.max_hp);
        self
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            hp: Self::STARTING_HP,
            max_hp: Self::STARTING_HP,
            level: 1,
            experience: 0,
            attack_power: Self::STARTING_POWER,
            healing_power: Self::STARTING_POWER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_player_is_consistent() {
        assert!(PlayerStats::default().is_consistent());
    }

    #[test]
    fn normalized_clamps_storage_values() {
        let stats = PlayerStats::new(150, 100, 0, 3, 10, 10).normalized();
        assert_eq!(stats.hp, 100);
        assert_eq!(stats.level, 1);
        assert!(stats.is_consistent());
    }
}
