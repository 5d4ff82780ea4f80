//! Competition configuration models.

use serde::{Deserialize, Serialize};

use crate::{
    pool::{DistributionOptions, PoolSizeBand},
    score::ScoreCap,
};

/// Competition configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionConfig {
    /// Touches to win a pool bout (default: 5)
    pub pool_max_score: ScoreCap,

    /// Touches to win a tableau bout (default: 15)
    pub tableau_max_score: ScoreCap,

    /// Number of pool rounds before the tableau (default: 1)
    pub pool_rounds: u32,

    /// Whether the pools are followed by a tableau
    pub has_direct_elimination: bool,

    /// Whether the semi-final losers fence for third place
    pub third_place_match: bool,

    /// Allowed pool sizes (default: 5 to 7)
    pub pool_size: PoolSizeBand,

    /// Affiliations kept apart when distributing pools
    pub distribution: DistributionOptions,
}

impl Default for CompetitionConfig {
    fn default() -> Self {
        Self {
            pool_max_score: ScoreCap::Limited(5),
            tableau_max_score: ScoreCap::Limited(15),
            pool_rounds: 1,
            has_direct_elimination: true,
            third_place_match: false,
            pool_size: PoolSizeBand::default(),
            distribution: DistributionOptions::default(),
        }
    }
}

impl CompetitionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.pool_max_score == ScoreCap::Limited(0) {
            return Err("Pool max score must be positive or unlimited".to_string());
        }

        if self.tableau_max_score == ScoreCap::Limited(0) {
            return Err("Tableau max score must be positive or unlimited".to_string());
        }

        if self.pool_rounds == 0 {
            return Err("At least one pool round is required".to_string());
        }

        if self.pool_size.min < 2 {
            return Err("Pools need at least 2 fencers".to_string());
        }

        if self.pool_size.max < self.pool_size.min {
            return Err("Max pool size must not be below min pool size".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CompetitionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pool_max_score, ScoreCap::Limited(5));
        assert_eq!(config.tableau_max_score, ScoreCap::Limited(15));
        assert!(config.has_direct_elimination);
        assert!(!config.third_place_match);
    }

    #[test]
    fn test_invalid_configs() {
        let zero_rounds = CompetitionConfig {
            pool_rounds: 0,
            ..CompetitionConfig::default()
        };
        assert!(zero_rounds.validate().is_err());

        let inverted_band = CompetitionConfig {
            pool_size: PoolSizeBand { min: 7, max: 5 },
            ..CompetitionConfig::default()
        };
        assert!(inverted_band.validate().is_err());

        let zero_cap = CompetitionConfig {
            pool_max_score: ScoreCap::Limited(0),
            ..CompetitionConfig::default()
        };
        assert!(zero_cap.validate().is_err());
    }

    #[test]
    fn test_unlimited_caps_are_valid() {
        let config = CompetitionConfig {
            pool_max_score: ScoreCap::Unlimited,
            tableau_max_score: ScoreCap::Unlimited,
            ..CompetitionConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
