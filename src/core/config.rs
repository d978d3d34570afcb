//! Battle configuration.
//!
//! A `BattleConfig` is supplied once per match. Everything has a sensible
//! default, so most callers only tweak starting energy:
//!
//! ```
//! use battle_resolver::core::BattleConfig;
//! use battle_resolver::energy::{EnergyCategory, EnergyPool};
//!
//! let config = BattleConfig::new()
//!     .with_starting_energy(EnergyPool::new().with(EnergyCategory::Physical, 2))
//!     .with_max_reaction_depth(2);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.hp_ceiling, 200);
//! ```

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::team::{Team, TeamMap};
use crate::energy::EnergyPool;

/// Highest HP value any character can reach.
pub const MAX_HP_CEILING: i32 = 200;

/// Complete battle configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Healing clamps HP to this value.
    pub hp_ceiling: i32,

    /// Random energy granted per living member of the acting team at turn start.
    pub energy_per_character: u32,

    /// Bound on nested reaction hooks (damage-dealt, drain, counters).
    pub max_reaction_depth: u32,

    /// Energy each team holds before the first turn.
    pub starting_energy: TeamMap<EnergyPool>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            hp_ceiling: MAX_HP_CEILING,
            energy_per_character: 1,
            max_reaction_depth: 4,
            starting_energy: TeamMap::default(),
        }
    }
}

impl BattleConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the healing ceiling.
    #[must_use]
    pub fn with_hp_ceiling(mut self, ceiling: i32) -> Self {
        self.hp_ceiling = ceiling;
        self
    }

    /// Set the per-character turn-start energy.
    #[must_use]
    pub fn with_energy_per_character(mut self, amount: u32) -> Self {
        self.energy_per_character = amount;
        self
    }

    /// Set the reaction depth bound.
    #[must_use]
    pub fn with_max_reaction_depth(mut self, depth: u32) -> Self {
        self.max_reaction_depth = depth;
        self
    }

    /// Give both teams the same starting pool.
    #[must_use]
    pub fn with_starting_energy(mut self, pool: EnergyPool) -> Self {
        self.starting_energy = TeamMap::with_value(pool);
        self
    }

    /// Set one team's starting pool.
    #[must_use]
    pub fn with_team_energy(mut self, team: Team, pool: EnergyPool) -> Self {
        self.starting_energy[team] = pool;
        self
    }

    /// Check the configuration for unsupported values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_HP_CEILING).contains(&self.hp_ceiling) {
            return Err(ConfigError::HpCeiling(self.hp_ceiling));
        }
        if self.max_reaction_depth == 0 {
            return Err(ConfigError::ReactionDepth);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::EnergyCategory;

    #[test]
    fn test_defaults() {
        let config = BattleConfig::default();
        assert_eq!(config.hp_ceiling, 200);
        assert_eq!(config.energy_per_character, 1);
        assert_eq!(config.max_reaction_depth, 4);
        assert_eq!(config.starting_energy[Team::new(0)].total(), 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = BattleConfig::new()
            .with_hp_ceiling(150)
            .with_energy_per_character(2)
            .with_team_energy(Team::new(1), EnergyPool::new().with(EnergyCategory::Weapon, 3));

        assert_eq!(config.hp_ceiling, 150);
        assert_eq!(config.energy_per_character, 2);
        assert_eq!(config.starting_energy[Team::new(0)].total(), 0);
        assert_eq!(config.starting_energy[Team::new(1)].get(EnergyCategory::Weapon), 3);
    }

    #[test]
    fn test_validate_rejects_bad_ceiling() {
        let config = BattleConfig::new().with_hp_ceiling(250);
        assert_eq!(config.validate(), Err(ConfigError::HpCeiling(250)));

        let config = BattleConfig::new().with_hp_ceiling(0);
        assert_eq!(config.validate(), Err(ConfigError::HpCeiling(0)));
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let config = BattleConfig::new().with_max_reaction_depth(0);
        assert_eq!(config.validate(), Err(ConfigError::ReactionDepth));
    }

    #[test]
    fn test_serialization() {
        let config = BattleConfig::new()
            .with_starting_energy(EnergyPool::new().with(EnergyCategory::Mental, 1));
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: BattleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
