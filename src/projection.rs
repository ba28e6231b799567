//! Season projection
//!
//! Forecasts end-of-season totals from current ratings. Opponent ratings are
//! held fixed across the whole remaining schedule; there is no league-wide
//! simulation and no variance estimate.

use crate::config::ProjectionSettings;
use crate::error::{EngineError, Result};
use crate::rating::RatingCalculator;
use crate::season::Season;
use crate::types::{Match, RatingState, TeamId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Expected season-ending totals for one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub expected_wins: f64,
    pub expected_losses: f64,
    pub expected_points: f64,
    pub season_length: u32,
    pub remaining: u32,
}

/// Coarse reading of a win probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionLabel {
    LikelyWin,
    TossUp,
    LikelyLoss,
}

impl ProjectionLabel {
    pub fn from_probability(probability: f64, settings: &ProjectionSettings) -> Self {
        if probability > settings.likely_win_threshold {
            ProjectionLabel::LikelyWin
        } else if probability < settings.likely_loss_threshold {
            ProjectionLabel::LikelyLoss
        } else {
            ProjectionLabel::TossUp
        }
    }
}

impl std::fmt::Display for ProjectionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionLabel::LikelyWin => write!(f, "likely win"),
            ProjectionLabel::TossUp => write!(f, "toss-up"),
            ProjectionLabel::LikelyLoss => write!(f, "likely loss"),
        }
    }
}

/// One scheduled match seen from one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub date: NaiveDate,
    pub time: String,
    pub opponent: TeamId,
    pub home: bool,
    pub opponent_rating: f64,
    pub win_probability: f64,
    pub label: ProjectionLabel,
}

/// Short-term outlook over the next few fixtures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingReport {
    pub team: TeamId,
    pub fixtures: Vec<Fixture>,
    pub avg_opponent_rating: f64,
    pub expected_wins: f64,
    pub expected_losses: f64,
}

/// Everything the per-team view needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub team: TeamId,
    pub rating_summary: String,
    pub rating_history: Vec<RatingState>,
    pub upcoming: UpcomingReport,
    pub projection: Projection,
}

/// Rates the remaining schedule against current ratings
pub struct Projector<'a> {
    calculator: &'a dyn RatingCalculator,
    settings: ProjectionSettings,
}

impl<'a> Projector<'a> {
    pub fn new(calculator: &'a dyn RatingCalculator, settings: ProjectionSettings) -> Self {
        Self {
            calculator,
            settings,
        }
    }

    pub fn settings(&self) -> &ProjectionSettings {
        &self.settings
    }

    fn opponent_of<'m>(game: &'m Match, id: &str) -> Result<&'m str> {
        game.opponent(id).ok_or_else(|| {
            EngineError::UnknownTeam {
                team: format!("{} does not play in {}", id, game),
            }
            .into()
        })
    }

    fn win_probability(&self, season: &Season, id: &str, game: &Match) -> Result<(f64, RatingState)> {
        let team = season.team(id)?.rating();
        let opponent = season.team(Self::opponent_of(game, id)?)?.rating();
        Ok((self.calculator.expected_score(&team, &opponent), opponent))
    }

    /// Season-ending totals for one team
    pub fn project(&self, season: &Season, id: &str) -> Result<Projection> {
        let team = season.team(id)?;
        let remaining = season.remaining_for(id)?;

        let mut expected_wins = f64::from(team.wins()) + 0.5 * f64::from(team.overtime_losses());
        for game in &remaining {
            expected_wins += self.win_probability(season, id, game)?.0;
        }

        let season_length = team.games_played() + remaining.len() as u32;
        Ok(Projection {
            expected_wins,
            expected_losses: f64::from(season_length) - expected_wins,
            expected_points: 2.0 * expected_wins,
            season_length,
            remaining: remaining.len() as u32,
        })
    }

    /// Projections for every team, in season order
    pub fn project_all(&self, season: &Season) -> Result<Vec<(TeamId, Projection)>> {
        season
            .team_ids()
            .map(|id| Ok((id.to_string(), self.project(season, id)?)))
            .collect()
    }

    /// Win probabilities over the next `count` fixtures
    pub fn upcoming(&self, season: &Season, id: &str, count: usize) -> Result<UpcomingReport> {
        let mut fixtures = Vec::new();
        for game in season.remaining_for(id)?.into_iter().take(count) {
            let (win_probability, opponent) = self.win_probability(season, id, game)?;
            fixtures.push(Fixture {
                date: game.date(),
                time: game.time().to_string(),
                opponent: Self::opponent_of(game, id)?.to_string(),
                home: game.home() == id,
                opponent_rating: opponent.mu,
                win_probability,
                label: ProjectionLabel::from_probability(win_probability, &self.settings),
            });
        }

        let expected_wins: f64 = fixtures.iter().map(|f| f.win_probability).sum();
        let avg_opponent_rating = if fixtures.is_empty() {
            0.0
        } else {
            fixtures.iter().map(|f| f.opponent_rating).sum::<f64>() / fixtures.len() as f64
        };

        Ok(UpcomingReport {
            team: id.to_string(),
            expected_losses: fixtures.len() as f64 - expected_wins,
            fixtures,
            avg_opponent_rating,
            expected_wins,
        })
    }

    /// Rating trail, next fixtures and full-season projection for one team
    pub fn team_report(
        &self,
        season: &Season,
        id: &str,
        last_n: Option<usize>,
        next_n: Option<usize>,
    ) -> Result<TeamReport> {
        let team = season.team(id)?;
        let history = team
            .rating_history(last_n.unwrap_or(self.settings.history_games))
            .to_vec();

        Ok(TeamReport {
            team: id.to_string(),
            rating_summary: team.rating_summary(),
            rating_history: history,
            upcoming: self.upcoming(season, id, next_n.unwrap_or(self.settings.upcoming_games))?,
            projection: self.project(season, id)?,
        })
    }
}
