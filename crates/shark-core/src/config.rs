//! Round configuration.
//!
//! Defaults reproduce the house rules; a JSON file can override any subset
//! of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Trials per equity simulation.
pub const DEFAULT_ITERATIONS: u32 = 10_000;

/// Deals tried before giving up on finding an acceptable one.
pub const DEFAULT_MAX_DEAL_ATTEMPTS: u32 = 20;

/// Smallest main-bet multiplier a deal may offer on either side.
pub const DEFAULT_MIN_PAYOUT: f64 = 1.4;

/// Share of winnings paid out; the house keeps the rest.
pub const DEFAULT_RAKE: f64 = 0.95;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    pub iterations: u32,
    pub max_deal_attempts: u32,
    pub min_payout: f64,
    /// Retention factor applied to winnings (0.95 keeps 5% for the house).
    pub rake: f64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            max_deal_attempts: DEFAULT_MAX_DEAL_ATTEMPTS,
            min_payout: DEFAULT_MIN_PAYOUT,
            rake: DEFAULT_RAKE,
        }
    }
}

impl RoundConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: RoundConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::Invalid("iterations must be positive".into()));
        }
        if self.max_deal_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_deal_attempts must be positive".into(),
            ));
        }
        if !(self.min_payout >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "min_payout must be at least 1, got {}",
                self.min_payout
            )));
        }
        if !(self.rake > 0.0 && self.rake <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "rake must be in (0, 1], got {}",
                self.rake
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RoundConfig::default();
        assert_eq!(config.iterations, 10_000);
        assert_eq!(config.max_deal_attempts, 20);
        assert_eq!(config.min_payout, 1.4);
        assert_eq!(config.rake, 0.95);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RoundConfig::from_json(r#"{ "iterations": 2500 }"#).unwrap();
        assert_eq!(config.iterations, 2500);
        assert_eq!(config.rake, DEFAULT_RAKE);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            RoundConfig::from_json(r#"{ "rake": 1.5 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RoundConfig::from_json(r#"{ "iterations": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RoundConfig::from_json(r#"{ "min_payout": 0.5 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RoundConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            RoundConfig::load("/nonexistent/shark.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
