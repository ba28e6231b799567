//! Rating calculator trait and match-level results
//!
//! This module defines the interface the season fold uses to rate a single
//! head-to-head match, independent of the concrete rating method.

use crate::config::ScoreMapping;
use crate::error::{EngineError, Result};
use crate::types::{Match, RatingState, TeamId};
use serde::{Deserialize, Serialize};

/// Rating change for one participant of a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub team: TeamId,
    pub old_rating: RatingState,
    pub new_rating: RatingState,
    /// Score credited to this team
    pub score: f64,
    /// Pre-game win probability of this team
    pub expected: f64,
}

impl RatingChange {
    pub fn delta(&self) -> f64 {
        self.new_rating.mu - self.old_rating.mu
    }
}

/// Result of rating one completed match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRatingResult {
    pub home: RatingChange,
    pub away: RatingChange,
}

/// Trait for head-to-head rating systems
pub trait RatingCalculator: Send + Sync {
    /// Rating state for a team with no games
    fn initial_rating(&self) -> RatingState;

    /// Probability that `player` beats `opponent`
    fn expected_score(&self, player: &RatingState, opponent: &RatingState) -> f64;

    /// New rating for `player` after scoring `score` against a fixed `opponent` snapshot
    fn update(&self, player: &RatingState, opponent: &RatingState, score: f64)
        -> Result<RatingState>;

    /// Mapping from match result to score
    fn score_mapping(&self) -> ScoreMapping;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;

    /// Update configuration from JSON
    fn update_config(&mut self, config: serde_json::Value) -> Result<()>;

    /// Rate both participants of a completed match from their pre-game snapshots
    ///
    /// Both snapshots are taken by value before either update is computed, so the
    /// result does not depend on which side is processed first.
    fn rate_match(
        &self,
        game: &Match,
        home: RatingState,
        away: RatingState,
    ) -> Result<MatchRatingResult> {
        let (home_score, away_score) =
            self.score_mapping()
                .scores(game)
                .ok_or_else(|| EngineError::InvalidMatch {
                    reason: format!("{} has not been played", game),
                })?;

        let new_home = self.update(&home, &away, home_score)?;
        let new_away = self.update(&away, &home, away_score)?;

        Ok(MatchRatingResult {
            home: RatingChange {
                team: game.home().to_string(),
                old_rating: home,
                new_rating: new_home,
                score: home_score,
                expected: self.expected_score(&home, &away),
            },
            away: RatingChange {
                team: game.away().to_string(),
                old_rating: away,
                new_rating: new_away,
                score: away_score,
                expected: self.expected_score(&away, &home),
            },
        })
    }
}
