//! Common types used throughout the engine

use crate::error::{EngineError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use skillratings::glicko2::Glicko2Rating;
use std::str::FromStr;

/// Identifier of a competitor, as it appears in the results feed
pub type TeamId = String;

/// How a match was decided, or that it has not been played yet
///
/// Serialized as its display form; deserialization goes through `FromStr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutcomeKind {
    Regulation,
    Overtime,
    Shootout,
    Scheduled,
}

impl OutcomeKind {
    /// Decided after regulation time (the loser still earns a point)
    pub fn is_extra_time(&self) -> bool {
        matches!(self, OutcomeKind::Overtime | OutcomeKind::Shootout)
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeKind::Regulation => write!(f, "Regulation"),
            OutcomeKind::Overtime => write!(f, "OT"),
            OutcomeKind::Shootout => write!(f, "SO"),
            OutcomeKind::Scheduled => write!(f, "Scheduled"),
        }
    }
}

impl FromStr for OutcomeKind {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "" | "REGULATION" | "REG" => Ok(OutcomeKind::Regulation),
            "OT" | "OVERTIME" => Ok(OutcomeKind::Overtime),
            "SO" | "SHOOTOUT" => Ok(OutcomeKind::Shootout),
            "SCHEDULED" => Ok(OutcomeKind::Scheduled),
            other => Err(EngineError::InvalidMatch {
                reason: format!("unrecognized outcome kind '{}'", other),
            }),
        }
    }
}

impl TryFrom<String> for OutcomeKind {
    type Error = EngineError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutcomeKind> for String {
    fn from(outcome: OutcomeKind) -> Self {
        outcome.to_string()
    }
}

/// Which side of the rink a team played on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

/// A single team's result in a completed match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    Win,
    Loss,
    OvertimeLoss,
}

impl GameResult {
    /// Short code used in the recent-form window
    pub fn code(&self) -> &'static str {
        match self {
            GameResult::Win => "W",
            GameResult::Loss => "L",
            GameResult::OvertimeLoss => "OTL",
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Unvalidated match record as handed over by the ingestion collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub time: String,
    pub away: TeamId,
    pub home: TeamId,
    #[serde(default)]
    pub away_score: u32,
    #[serde(default)]
    pub home_score: u32,
    pub outcome: OutcomeKind,
}

/// Immutable, validated match
///
/// A completed match always has a strict winner; ties are rejected at
/// construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MatchRecord", into = "MatchRecord")]
pub struct Match {
    date: NaiveDate,
    time: String,
    away: TeamId,
    home: TeamId,
    away_score: u32,
    home_score: u32,
    outcome: OutcomeKind,
}

impl TryFrom<MatchRecord> for Match {
    type Error = EngineError;

    fn try_from(record: MatchRecord) -> std::result::Result<Self, Self::Error> {
        if record.home == record.away {
            return Err(EngineError::InvalidMatch {
                reason: format!("{} cannot play itself on {}", record.home, record.date),
            });
        }

        if record.outcome != OutcomeKind::Scheduled && record.home_score == record.away_score {
            return Err(EngineError::InvalidMatch {
                reason: format!(
                    "{} @ {} on {} ended {}-{}; completed matches cannot be tied",
                    record.away, record.home, record.date, record.away_score, record.home_score
                ),
            });
        }

        Ok(Self {
            date: record.date,
            time: record.time,
            away: record.away,
            home: record.home,
            away_score: record.away_score,
            home_score: record.home_score,
            outcome: record.outcome,
        })
    }
}

impl From<Match> for MatchRecord {
    fn from(game: Match) -> Self {
        Self {
            date: game.date,
            time: game.time,
            away: game.away,
            home: game.home,
            away_score: game.away_score,
            home_score: game.home_score,
            outcome: game.outcome,
        }
    }
}

impl Match {
    /// Create a validated match
    pub fn new(
        date: NaiveDate,
        time: impl Into<String>,
        away: impl Into<TeamId>,
        home: impl Into<TeamId>,
        away_score: u32,
        home_score: u32,
        outcome: OutcomeKind,
    ) -> Result<Self> {
        let record = MatchRecord {
            date,
            time: time.into(),
            away: away.into(),
            home: home.into(),
            away_score,
            home_score,
            outcome,
        };
        Ok(Self::try_from(record)?)
    }

    /// Create a not-yet-played fixture
    pub fn scheduled(
        date: NaiveDate,
        time: impl Into<String>,
        away: impl Into<TeamId>,
        home: impl Into<TeamId>,
    ) -> Result<Self> {
        Self::new(date, time, away, home, 0, 0, OutcomeKind::Scheduled)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    pub fn away(&self) -> &str {
        &self.away
    }

    pub fn home_score(&self) -> u32 {
        self.home_score
    }

    pub fn away_score(&self) -> u32 {
        self.away_score
    }

    pub fn outcome(&self) -> OutcomeKind {
        self.outcome
    }

    pub fn is_completed(&self) -> bool {
        self.outcome != OutcomeKind::Scheduled
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home == team || self.away == team
    }

    /// Winning team, only for completed matches
    pub fn winner(&self) -> Option<&str> {
        if !self.is_completed() {
            return None;
        }
        if self.home_score > self.away_score {
            Some(&self.home)
        } else {
            Some(&self.away)
        }
    }

    /// Losing team, only for completed matches
    pub fn loser(&self) -> Option<&str> {
        if !self.is_completed() {
            return None;
        }
        if self.home_score > self.away_score {
            Some(&self.away)
        } else {
            Some(&self.home)
        }
    }

    pub fn side_of(&self, team: &str) -> Option<Side> {
        if self.home == team {
            Some(Side::Home)
        } else if self.away == team {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn opponent(&self, team: &str) -> Option<&str> {
        match self.side_of(team)? {
            Side::Home => Some(&self.away),
            Side::Away => Some(&self.home),
        }
    }

    /// Goals (for, against) from the point of view of `side`
    pub fn goals_for(&self, side: Side) -> (u32, u32) {
        match side {
            Side::Home => (self.home_score, self.away_score),
            Side::Away => (self.away_score, self.home_score),
        }
    }

    /// Result for `team`, if the match was played and `team` took part
    pub fn result_for(&self, team: &str) -> Option<GameResult> {
        if !self.is_completed() {
            return None;
        }
        let (own, other) = self.goals_for(self.side_of(team)?);
        Some(if own > other {
            GameResult::Win
        } else if self.outcome.is_extra_time() {
            GameResult::OvertimeLoss
        } else {
            GameResult::Loss
        })
    }
}

impl std::fmt::Display for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} @ {}", self.date, self.time, self.away, self.home)
    }
}

/// Glicko-2 rating state on the public scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingState {
    /// Mean skill estimate
    pub mu: f64,
    /// Rating deviation
    pub phi: f64,
    /// Volatility
    pub sigma: f64,
}

impl Default for RatingState {
    fn default() -> Self {
        Self {
            mu: 1500.0,
            phi: 350.0,
            sigma: 0.06,
        }
    }
}

impl From<Glicko2Rating> for RatingState {
    fn from(rating: Glicko2Rating) -> Self {
        Self {
            mu: rating.rating,
            phi: rating.deviation,
            sigma: rating.volatility,
        }
    }
}

impl From<RatingState> for Glicko2Rating {
    fn from(rating: RatingState) -> Self {
        Self {
            rating: rating.mu,
            deviation: rating.phi,
            volatility: rating.sigma,
        }
    }
}

/// Opponent's pre-game rating, tagged with how the game went
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpponentSample {
    pub rating: RatingState,
    pub result: GameResult,
}
