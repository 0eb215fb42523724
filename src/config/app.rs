//! Main application configuration
//!
//! This module defines the top-level configuration for the skill-ledger driver,
//! including TOML file loading, environment variable overrides and validation.

use crate::config::{BalanceConfig, RatingConfig};
use crate::types::CompetitorId;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub balance: BalanceConfig,
    /// Canonical competitor names; games listing anyone else are not rated
    pub known_competitors: Option<Vec<CompetitorId>>,
}

/// Process-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "skill-ledger".to_string(),
            log_level: "info".to_string(),
        }
    }
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {} value: {}", key, raw)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating model
        if let Some(mu) = parse_env("RATING_MU")? {
            self.rating.initial_mean = mu;
        }
        if let Some(sigma) = parse_env("RATING_SIGMA")? {
            self.rating.initial_stddev = sigma;
        }
        if let Some(beta) = parse_env("RATING_BETA")? {
            self.rating.beta = beta;
        }
        if let Some(tau) = parse_env("RATING_TAU")? {
            self.rating.tau = tau;
        }
        if let Some(draw_probability) = parse_env("RATING_DRAW_PROBABILITY")? {
            self.rating.draw_probability = draw_probability;
        }
        if let Some(scale) = parse_env("RATING_DISPLAY_SCALE")? {
            self.rating.display_scale = scale;
        }
        if let Some(min_games) = parse_env("RATING_MIN_GAMES")? {
            self.rating.min_games_for_ranking = min_games;
        }

        // Balance search
        if let Some(top_n) = parse_env("BALANCE_TOP_N")? {
            self.balance.top_n = top_n;
        }
        if let Some(max_roster) = parse_env("BALANCE_MAX_ROSTER_SIZE")? {
            self.balance.max_roster_size = max_roster;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.rating.validate()?;
    config.balance.validate()?;

    if let Some(known) = &config.known_competitors {
        if known.iter().any(|name| name.trim().is_empty()) {
            return Err(anyhow!("Known competitor names cannot be empty"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.service.name, "skill-ledger");
        assert!(config.known_competitors.is_none());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.service.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_nested_rating_validation() {
        let mut config = AppConfig::default();
        config.rating.draw_probability = 1.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_parse_toml_document() {
        let raw = r#"
            known_competitors = ["Boivinos", "Rayleigh"]

            [service]
            log_level = "debug"

            [rating]
            beta = 2.7778
            tau = 0.0833

            [balance]
            top_n = 5
        "#;
        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.service.log_level, "debug");
        assert_eq!(config.service.name, "skill-ledger");
        assert_eq!(config.rating.beta, 2.7778);
        assert_eq!(config.rating.initial_mean, 25.0);
        assert_eq!(config.balance.top_n, 5);
        assert_eq!(config.balance.max_roster_size, 18);
        assert_eq!(config.known_competitors.as_ref().map(Vec::len), Some(2));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_from_file_missing_path() {
        let result = AppConfig::from_file(Path::new("/definitely/not/here.toml"));
        assert!(result.is_err());
    }
}
