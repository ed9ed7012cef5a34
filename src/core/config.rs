//! Summon configuration.
//!
//! All knobs have defaults matching the classic widget: 10 currency per
//! pull, ten-pulls of 10 cards, a 2 second reveal and legendary as the
//! notable tier. Configs can be built in code or parsed from TOML.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cards::Rarity;
use crate::economy::DEFAULT_BALANCE;
use crate::error::ConfigError;

/// Summon configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummonConfig {
    /// Currency spent per single pull.
    pub unit_cost: u64,

    /// Cards drawn by a multi-pull.
    pub multi_draw_size: u32,

    /// Reveal window after a single pull, in milliseconds.
    pub single_settle_ms: u64,

    /// Reveal window after a multi-pull, in milliseconds.
    pub multi_settle_ms: u64,

    /// Lowest rarity that raises the rare trigger.
    pub notable_threshold: Rarity,

    /// Balance for a fresh or reset ledger.
    pub starting_balance: u64,

    /// Currency added by a grant.
    pub grant_amount: u64,

    /// RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SummonConfig {
    fn default() -> Self {
        Self {
            unit_cost: 10,
            multi_draw_size: 10,
            single_settle_ms: 2000,
            multi_settle_ms: 2000,
            notable_threshold: Rarity::Legendary,
            starting_balance: DEFAULT_BALANCE,
            grant_amount: 50,
            seed: None,
        }
    }
}

impl SummonConfig {
    /// Parse and validate a TOML config. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the session cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unit_cost == 0 {
            return Err(ConfigError::Invalid("unit_cost must be positive".into()));
        }
        if self.multi_draw_size == 0 {
            return Err(ConfigError::Invalid("multi_draw_size must be positive".into()));
        }
        if !self.notable_threshold.is_builtin() {
            return Err(ConfigError::Invalid(format!(
                "notable_threshold {:?} is not a known rarity",
                self.notable_threshold.as_str()
            )));
        }
        Ok(())
    }

    /// Cost of drawing `count` cards, saturating on overflow.
    #[must_use]
    pub fn cost_of(&self, count: u32) -> u64 {
        self.unit_cost.saturating_mul(u64::from(count))
    }

    /// Reveal window after a single pull.
    #[must_use]
    pub fn single_settle(&self) -> Duration {
        Duration::from_millis(self.single_settle_ms)
    }

    /// Reveal window after a multi-pull.
    #[must_use]
    pub fn multi_settle(&self) -> Duration {
        Duration::from_millis(self.multi_settle_ms)
    }

    /// Set the per-pull cost.
    #[must_use]
    pub fn with_unit_cost(mut self, cost: u64) -> Self {
        self.unit_cost = cost;
        self
    }

    /// Set the multi-pull size.
    #[must_use]
    pub fn with_multi_draw_size(mut self, size: u32) -> Self {
        self.multi_draw_size = size;
        self
    }

    /// Set both reveal windows.
    #[must_use]
    pub fn with_settle(mut self, single: Duration, multi: Duration) -> Self {
        self.single_settle_ms = duration_ms(single);
        self.multi_settle_ms = duration_ms(multi);
        self
    }

    /// Set the notable threshold.
    #[must_use]
    pub fn with_notable_threshold(mut self, threshold: Rarity) -> Self {
        self.notable_threshold = threshold;
        self
    }

    /// Set the starting balance.
    #[must_use]
    pub fn with_starting_balance(mut self, balance: u64) -> Self {
        self.starting_balance = balance;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SummonConfig::default();
        assert_eq!(config.unit_cost, 10);
        assert_eq!(config.multi_draw_size, 10);
        assert_eq!(config.single_settle(), Duration::from_secs(2));
        assert_eq!(config.notable_threshold, Rarity::Legendary);
        assert_eq!(config.starting_balance, 100);
        assert_eq!(config.grant_amount, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SummonConfig::default()
            .with_unit_cost(5)
            .with_multi_draw_size(11)
            .with_settle(Duration::from_millis(1500), Duration::from_millis(2500))
            .with_notable_threshold(Rarity::Epic)
            .with_seed(7);

        assert_eq!(config.cost_of(11), 55);
        assert_eq!(config.single_settle_ms, 1500);
        assert_eq!(config.multi_settle_ms, 2500);
        assert_eq!(config.notable_threshold, Rarity::Epic);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_cost_saturates() {
        let config = SummonConfig::default().with_unit_cost(u64::MAX);
        assert_eq!(config.cost_of(2), u64::MAX);
    }

    #[test]
    fn test_from_toml() {
        let config = SummonConfig::from_toml_str(
            r#"
            unit_cost = 25
            multi_settle_ms = 3000
            notable_threshold = "mythic"
            "#,
        )
        .unwrap();

        assert_eq!(config.unit_cost, 25);
        assert_eq!(config.multi_settle(), Duration::from_secs(3));
        assert_eq!(config.notable_threshold, Rarity::Mythic);
        // untouched keys keep defaults
        assert_eq!(config.multi_draw_size, 10);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            SummonConfig::from_toml_str("unit_cost = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SummonConfig::from_toml_str("multi_draw_size = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SummonConfig::from_toml_str("notable_threshold = \"shiny\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SummonConfig::from_toml_str("unit_cost = \"ten\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_serialization() {
        let config = SummonConfig::default().with_seed(3);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SummonConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
