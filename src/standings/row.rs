//! Output rows handed to the renderer

use crate::projection::Projection;
use crate::standings::league::TeamInfo;
use crate::team::Team;
use serde::{Deserialize, Serialize};

/// One team's line in a standings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub rank: usize,
    pub team: String,
    pub name: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub overtime_losses: u32,
    pub points: u32,
    pub points_percentage: f64,
    pub rating: f64,
    pub deviation: f64,
    pub rating_summary: String,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_differential: i64,
    pub home: String,
    pub away: String,
    pub shootout: String,
    pub last_10: String,
    pub streak: String,
    /// Mean pre-game rating of opponents faced; absent before the first game
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_opponent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_avg: Option<f64>,
    /// Highest pre-game rating of an opponent beaten
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_win: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
}

impl StandingsRow {
    /// Build a row; `info` supplies the display name when the team is known to the league
    pub fn new(rank: usize, team: &Team, info: Option<&TeamInfo>) -> Self {
        let rating = team.rating();
        let (w, l, otl) = team.last_10();

        Self {
            rank,
            team: team.id().to_string(),
            name: info
                .map(TeamInfo::full_name)
                .unwrap_or_else(|| team.id().to_string()),
            games_played: team.games_played(),
            wins: team.wins(),
            losses: team.losses(),
            overtime_losses: team.overtime_losses(),
            points: team.points(),
            points_percentage: round3(team.points_percentage()),
            rating: rating.mu,
            deviation: rating.phi,
            rating_summary: team.rating_summary(),
            goals_for: team.goals_for(),
            goals_against: team.goals_against(),
            goal_differential: team.goal_differential(),
            home: team.home_record().to_string(),
            away: team.away_record().to_string(),
            shootout: team.shootout_record().to_string(),
            last_10: format!("{}-{}-{}", w, l, otl),
            streak: team.streak(),
            avg_opponent: (!team.opponent_ratings().is_empty()).then(|| team.avg_opponent()),
            rating_max: team.rating_max(),
            rating_avg: team.rating_avg(),
            best_win: team.best_win(),
            projection: None,
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
