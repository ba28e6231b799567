//! Main application configuration
//!
//! This module defines the primary configuration structures for puckrank,
//! including TOML file loading, environment variable overrides and validation.

use crate::config::rating::RatingConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub standings: StandingsSettings,
    pub projection: ProjectionSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Standings grouping settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StandingsSettings {
    /// Teams per division that qualify automatically
    pub division_qualifiers: usize,
    /// Wildcard places per conference
    pub wildcard_slots: usize,
}

/// Season projection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionSettings {
    /// Number of upcoming fixtures in the short-term report
    pub upcoming_games: usize,
    /// Number of trailing rating states in the history report
    pub history_games: usize,
    /// Win probability above which a fixture is labelled a likely win
    pub likely_win_threshold: f64,
    /// Win probability below which a fixture is labelled a likely loss
    pub likely_loss_threshold: f64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "puckrank".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StandingsSettings {
    fn default() -> Self {
        Self {
            division_qualifiers: 3,
            wildcard_slots: 2,
        }
    }
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            upcoming_games: 10,
            history_games: 20,
            likely_win_threshold: 0.6,
            likely_loss_threshold: 0.4,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", name, value))
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
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
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

        // Rating settings
        if let Ok(rating) = env::var("RATING_INITIAL") {
            self.rating.initial_rating = parse_var("RATING_INITIAL", &rating)?;
        }
        if let Ok(deviation) = env::var("RATING_INITIAL_DEVIATION") {
            self.rating.initial_deviation = parse_var("RATING_INITIAL_DEVIATION", &deviation)?;
        }
        if let Ok(volatility) = env::var("RATING_INITIAL_VOLATILITY") {
            self.rating.initial_volatility = parse_var("RATING_INITIAL_VOLATILITY", &volatility)?;
        }
        if let Ok(tau) = env::var("RATING_TAU") {
            self.rating.tau = parse_var("RATING_TAU", &tau)?;
        }
        if let Ok(iterations) = env::var("RATING_MAX_ITERATIONS") {
            self.rating.max_iterations = parse_var("RATING_MAX_ITERATIONS", &iterations)?;
        }
        if let Ok(score) = env::var("OT_LOSS_SCORE") {
            self.rating.score_mapping.overtime_loss = parse_var("OT_LOSS_SCORE", &score)?;
        }

        // Standings settings
        if let Ok(qualifiers) = env::var("DIVISION_QUALIFIERS") {
            self.standings.division_qualifiers = parse_var("DIVISION_QUALIFIERS", &qualifiers)?;
        }
        if let Ok(slots) = env::var("WILDCARD_SLOTS") {
            self.standings.wildcard_slots = parse_var("WILDCARD_SLOTS", &slots)?;
        }

        // Projection settings
        if let Ok(games) = env::var("UPCOMING_GAMES") {
            self.projection.upcoming_games = parse_var("UPCOMING_GAMES", &games)?;
        }
        if let Ok(games) = env::var("HISTORY_GAMES") {
            self.projection.history_games = parse_var("HISTORY_GAMES", &games)?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    config.rating.validate()?;

    // Validate projection settings
    let projection = &config.projection;
    if !(0.0..=1.0).contains(&projection.likely_loss_threshold)
        || !(0.0..=1.0).contains(&projection.likely_win_threshold)
    {
        return Err(anyhow!("Projection thresholds must be probabilities"));
    }
    if projection.likely_loss_threshold > projection.likely_win_threshold {
        return Err(anyhow!(
            "Likely loss threshold {} exceeds likely win threshold {}",
            projection.likely_loss_threshold,
            projection.likely_win_threshold
        ));
    }

    Ok(())
}
