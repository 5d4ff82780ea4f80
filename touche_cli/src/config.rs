//! CLI configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use touche::{
    competition::CompetitionConfig,
    pool::{DistributionOptions, PoolSizeBand},
    score::ScoreCap,
};

/// Complete CLI configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Competition rules handed to the engine
    pub competition: CompetitionConfig,
    /// Number of fencers to synthesize when no roster file is given
    pub fencers: u32,
    /// Pool count for the first round, derived from the size band when absent
    pub pools: Option<usize>,
    /// Seed of the simulation RNG
    pub seed: u64,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `fencers_override` - Optional roster size override (from CLI args)
    /// * `pools_override` - Optional pool count override (from CLI args)
    /// * `seed_override` - Optional RNG seed override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to a value that cannot be parsed
    pub fn from_env(
        fencers_override: Option<u32>,
        pools_override: Option<usize>,
        seed_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let defaults = CompetitionConfig::default();
        let default_band = PoolSizeBand::default();
        let default_distribution = DistributionOptions::default();

        let competition = CompetitionConfig {
            pool_max_score: ScoreCap::from_config(parse_env_or("DEFAULT_POOL_MAX_SCORE", 5)?),
            tableau_max_score: ScoreCap::from_config(parse_env_or("DEFAULT_TABLE_MAX_SCORE", 15)?),
            pool_rounds: parse_env_or("POOL_ROUNDS", defaults.pool_rounds)?,
            has_direct_elimination: parse_env_or(
                "HAS_DIRECT_ELIMINATION",
                defaults.has_direct_elimination,
            )?,
            third_place_match: parse_env_or("THIRD_PLACE_MATCH", defaults.third_place_match)?,
            pool_size: PoolSizeBand {
                min: parse_env_or("POOL_MIN_SIZE", default_band.min)?,
                max: parse_env_or("POOL_MAX_SIZE", default_band.max)?,
            },
            distribution: DistributionOptions {
                avoid_same_club: parse_env_or("AVOID_SAME_CLUB", default_distribution.avoid_same_club)?,
                avoid_same_league: parse_env_or(
                    "AVOID_SAME_LEAGUE",
                    default_distribution.avoid_same_league,
                )?,
                avoid_same_nation: parse_env_or(
                    "AVOID_SAME_NATION",
                    default_distribution.avoid_same_nation,
                )?,
            },
        };

        let fencers = match fencers_override {
            Some(fencers) => fencers,
            None => parse_env_or("FENCER_COUNT", 24)?,
        };
        let pools = match pools_override {
            Some(pools) => Some(pools),
            None => parse_env_opt("POOL_COUNT")?,
        };
        let seed = match seed_override {
            Some(seed) => seed,
            None => parse_env_or("SIMULATION_SEED", 42)?,
        };

        Ok(CliConfig {
            competition,
            fencers,
            pools,
            seed,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.competition
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                var: "competition".to_string(),
                reason,
            })?;

        if self.fencers < 2 {
            return Err(ConfigError::Invalid {
                var: "FENCER_COUNT".to_string(),
                reason: "Must be at least 2".to_string(),
            });
        }

        if self.pools == Some(0) {
            return Err(ConfigError::Invalid {
                var: "POOL_COUNT".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse an environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    Ok(parse_env_opt(key)?.unwrap_or(default))
}

/// Helper to parse an optional environment variable; unset and empty are `None`
fn parse_env_opt<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                var: key.to_string(),
                reason: format!("Cannot parse {value:?}"),
            }),
        _ => Ok(None),
    }
}
