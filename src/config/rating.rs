//! Rating system configuration

use crate::error::{EngineError, Result};
use crate::types::{GameResult, Match, RatingState};
use serde::{Deserialize, Serialize};
use skillratings::glicko2::Glicko2Config;

/// Scores fed into the rating update for each kind of result
///
/// The winner always receives `win`. A loser receives `overtime_loss` when the
/// game went past regulation and `regulation_loss` otherwise, so an OT/SO loss
/// counts as a softer loss than a regulation one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreMapping {
    pub win: f64,
    pub regulation_loss: f64,
    pub overtime_loss: f64,
}

impl Default for ScoreMapping {
    fn default() -> Self {
        Self {
            win: 1.0,
            regulation_loss: 0.0,
            overtime_loss: 0.5,
        }
    }
}

impl ScoreMapping {
    /// Legacy split: winner credited 2/3, OT loser 1/3
    pub fn thirds() -> Self {
        Self {
            win: 2.0 / 3.0,
            regulation_loss: 0.0,
            overtime_loss: 1.0 / 3.0,
        }
    }

    pub fn score_for(&self, result: GameResult) -> f64 {
        match result {
            GameResult::Win => self.win,
            GameResult::Loss => self.regulation_loss,
            GameResult::OvertimeLoss => self.overtime_loss,
        }
    }

    /// Scores as (home, away) for a completed match
    pub fn scores(&self, game: &Match) -> Option<(f64, f64)> {
        let home = game.result_for(game.home())?;
        let away = game.result_for(game.away())?;
        Some((self.score_for(home), self.score_for(away)))
    }

    /// Whether `score` is one the update accepts under this mapping
    pub fn accepts(&self, score: f64) -> bool {
        [self.win, self.regulation_loss, self.overtime_loss]
            .iter()
            .any(|allowed| (allowed - score).abs() < 1e-12)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("win", self.win),
            ("regulation_loss", self.regulation_loss),
            ("overtime_loss", self.overtime_loss),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::Configuration {
                    message: format!("Score for {} must be within [0, 1], got {}", name, value),
                }
                .into());
            }
        }

        if !(self.regulation_loss <= self.overtime_loss && self.overtime_loss <= self.win) {
            return Err(EngineError::Configuration {
                message: "Scores must satisfy regulation_loss <= overtime_loss <= win".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Glicko-2 parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Initial mean rating for new teams
    pub initial_rating: f64,
    /// Initial rating deviation for new teams
    pub initial_deviation: f64,
    /// Initial volatility for new teams
    pub initial_volatility: f64,
    /// System constant constraining the change in volatility
    pub tau: f64,
    /// Convergence tolerance of the volatility solve
    pub convergence_tolerance: f64,
    /// Iteration bound of the volatility solve
    pub max_iterations: usize,
    /// Result to score mapping
    pub score_mapping: ScoreMapping,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            initial_rating: 1500.0,
            initial_deviation: 350.0,
            initial_volatility: 0.06,
            tau: 1.0,
            convergence_tolerance: 0.000_001,
            max_iterations: 100,
            score_mapping: ScoreMapping::default(),
        }
    }
}

impl RatingConfig {
    /// Rating state every team starts the season with
    pub fn initial_state(&self) -> RatingState {
        RatingState {
            mu: self.initial_rating,
            phi: self.initial_deviation,
            sigma: self.initial_volatility,
        }
    }

    /// Equivalent `skillratings` configuration
    pub fn glicko2_config(&self) -> Glicko2Config {
        Glicko2Config {
            tau: self.tau,
            convergence_tolerance: self.convergence_tolerance,
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.initial_deviation <= 0.0 {
            return Err(EngineError::Configuration {
                message: "Initial deviation must be positive".to_string(),
            }
            .into());
        }

        if self.initial_volatility <= 0.0 {
            return Err(EngineError::Configuration {
                message: "Initial volatility must be positive".to_string(),
            }
            .into());
        }

        if self.tau <= 0.0 {
            return Err(EngineError::Configuration {
                message: "Tau must be positive".to_string(),
            }
            .into());
        }

        if self.convergence_tolerance <= 0.0 {
            return Err(EngineError::Configuration {
                message: "Convergence tolerance must be positive".to_string(),
            }
            .into());
        }

        if self.max_iterations == 0 {
            return Err(EngineError::Configuration {
                message: "Max iterations must be greater than 0".to_string(),
            }
            .into());
        }

        self.score_mapping.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OutcomeKind;
    use chrono::NaiveDate;

    #[test]
    fn test_rating_config_default() {
        let config = RatingConfig::default();
        assert_eq!(config.initial_state(), RatingState::default());
        assert_eq!(config.max_iterations, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rating_config_validation() {
        let mut config = RatingConfig::default();

        config.initial_deviation = 0.0;
        assert!(config.validate().is_err());

        config = RatingConfig::default();
        config.initial_volatility = -0.1;
        assert!(config.validate().is_err());

        config = RatingConfig::default();
        config.tau = 0.0;
        assert!(config.validate().is_err());

        config = RatingConfig::default();
        config.max_iterations = 0;
        assert!(config.validate().is_err());

        config = RatingConfig::default();
        config.score_mapping.overtime_loss = 1.5;
        assert!(config.validate().is_err());

        config = RatingConfig::default();
        config.score_mapping.overtime_loss = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_mapping_accepts_only_three_scores() {
        let mapping = ScoreMapping::default();
        assert!(mapping.accepts(0.0));
        assert!(mapping.accepts(0.5));
        assert!(mapping.accepts(1.0));
        assert!(!mapping.accepts(0.25));
        assert!(!mapping.accepts(2.0));
    }

    #[test]
    fn test_thirds_mapping_is_valid() {
        let mapping = ScoreMapping::thirds();
        assert!(mapping.validate().is_ok());
        assert!(mapping.accepts(1.0 / 3.0));
        assert!(!mapping.accepts(0.5));
    }

    #[test]
    fn test_scores_for_shootout_match() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let game = Match::new(date, "", "EDM", "CGY", 4, 3, OutcomeKind::Shootout).unwrap();
        assert_eq!(ScoreMapping::default().scores(&game), Some((0.5, 1.0)));

        let game = Match::new(date, "", "EDM", "CGY", 1, 3, OutcomeKind::Regulation).unwrap();
        assert_eq!(ScoreMapping::default().scores(&game), Some((1.0, 0.0)));

        let fixture = Match::scheduled(date, "", "EDM", "CGY").unwrap();
        assert_eq!(ScoreMapping::default().scores(&fixture), None);
    }
}
