//! Team aggregate bookkeeping
//!
//! A [`Team`] is created lazily the first time it appears in the match stream
//! and is only ever mutated by folding completed matches into it, in date
//! order.

use crate::error::{EngineError, Result};
use crate::team::form::RecentForm;
use crate::types::{GameResult, Match, OpponentSample, OutcomeKind, RatingState, Side, TeamId};
use serde::{Deserialize, Serialize};

/// Wins, losses and overtime losses for a subset of games
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRecord {
    pub wins: u32,
    pub losses: u32,
    pub overtime_losses: u32,
}

impl SplitRecord {
    fn add(&mut self, result: GameResult) {
        match result {
            GameResult::Win => self.wins += 1,
            GameResult::Loss => self.losses += 1,
            GameResult::OvertimeLoss => self.overtime_losses += 1,
        }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.overtime_losses
    }
}

impl std::fmt::Display for SplitRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.wins, self.losses, self.overtime_losses)
    }
}

/// Shootout wins and losses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShootoutRecord {
    pub wins: u32,
    pub losses: u32,
}

impl std::fmt::Display for ShootoutRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.wins, self.losses)
    }
}

/// Aggregate state of one team over a season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    games_played: u32,
    wins: u32,
    losses: u32,
    overtime_losses: u32,
    goals_for: u32,
    goals_against: u32,
    home_record: SplitRecord,
    away_record: SplitRecord,
    shootout_record: ShootoutRecord,
    form: RecentForm,
    ratings: Vec<RatingState>,
    opponent_ratings: Vec<OpponentSample>,
}

impl Team {
    /// Create a team with no games and a single seed rating
    pub fn new(id: impl Into<TeamId>, initial_rating: RatingState) -> Self {
        Self {
            id: id.into(),
            games_played: 0,
            wins: 0,
            losses: 0,
            overtime_losses: 0,
            goals_for: 0,
            goals_against: 0,
            home_record: SplitRecord::default(),
            away_record: SplitRecord::default(),
            shootout_record: ShootoutRecord::default(),
            form: RecentForm::new(),
            ratings: vec![initial_rating],
            opponent_ratings: Vec::new(),
        }
    }

    /// Fold a completed match into the classical counters
    ///
    /// This touches only the standings bookkeeping; the season fold uses
    /// [`Team::record_game`], which also appends the rating history.
    pub fn add_result(&mut self, game: &Match) -> Result<GameResult> {
        let side = game.side_of(&self.id).ok_or_else(|| EngineError::UnknownTeam {
            team: format!("{} did not play in {}", self.id, game),
        })?;
        let result = game
            .result_for(&self.id)
            .ok_or_else(|| EngineError::InvalidMatch {
                reason: format!("{} has not been played", game),
            })?;

        self.games_played += 1;
        match result {
            GameResult::Win => self.wins += 1,
            GameResult::Loss => self.losses += 1,
            GameResult::OvertimeLoss => self.overtime_losses += 1,
        }

        match side {
            Side::Home => self.home_record.add(result),
            Side::Away => self.away_record.add(result),
        }

        if game.outcome() == OutcomeKind::Shootout {
            if result == GameResult::Win {
                self.shootout_record.wins += 1;
            } else {
                self.shootout_record.losses += 1;
            }
        }

        let (own, other) = game.goals_for(side);
        self.goals_for += own;
        self.goals_against += other;

        self.form.push(result);

        Ok(result)
    }

    /// Fold a completed match together with its rating outcome
    pub fn record_game(
        &mut self,
        game: &Match,
        new_rating: RatingState,
        opponent_rating: RatingState,
    ) -> Result<GameResult> {
        let result = self.add_result(game)?;
        self.ratings.push(new_rating);
        self.opponent_ratings.push(OpponentSample {
            rating: opponent_rating,
            result,
        });

        debug_assert!(self.invariants_hold(), "invariants broken for {}", self.id);
        Ok(result)
    }

    /// Counters and history lengths agree with each other
    pub fn invariants_hold(&self) -> bool {
        self.games_played == self.wins + self.losses + self.overtime_losses
            && self.ratings.len() == self.games_played as usize + 1
            && self.opponent_ratings.len() == self.games_played as usize
            && self.form.len() <= super::form::FORM_WINDOW
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn overtime_losses(&self) -> u32 {
        self.overtime_losses
    }

    pub fn goals_for(&self) -> u32 {
        self.goals_for
    }

    pub fn goals_against(&self) -> u32 {
        self.goals_against
    }

    pub fn goal_differential(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    pub fn home_record(&self) -> SplitRecord {
        self.home_record
    }

    pub fn away_record(&self) -> SplitRecord {
        self.away_record
    }

    pub fn shootout_record(&self) -> ShootoutRecord {
        self.shootout_record
    }

    pub fn form(&self) -> &RecentForm {
        &self.form
    }

    pub fn points(&self) -> u32 {
        2 * self.wins + self.overtime_losses
    }

    /// Share of available points earned; zero before any game
    pub fn points_percentage(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        f64::from(self.points()) / f64::from(2 * self.games_played)
    }

    /// (wins, losses, overtime losses) over the last ten games
    pub fn last_10(&self) -> (usize, usize, usize) {
        self.form.counts()
    }

    pub fn streak(&self) -> String {
        self.form.streak_label()
    }

    /// Current rating
    pub fn rating(&self) -> RatingState {
        self.ratings.last().copied().unwrap_or_default()
    }

    /// Full rating history, seed first
    pub fn ratings(&self) -> &[RatingState] {
        &self.ratings
    }

    /// Trailing `last_n` rating states
    pub fn rating_history(&self, last_n: usize) -> &[RatingState] {
        let start = self.ratings.len().saturating_sub(last_n);
        &self.ratings[start..]
    }

    /// Rating as "mu ± 2·phi", rounded
    pub fn rating_summary(&self) -> String {
        let rating = self.rating();
        format!("{} ± {}", rating.mu.round(), 2.0 * rating.phi.round())
    }

    /// Highest post-game rating
    pub fn rating_max(&self) -> Option<f64> {
        self.ratings.iter().skip(1).map(|r| r.mu).reduce(f64::max)
    }

    /// Mean post-game rating
    pub fn rating_avg(&self) -> Option<f64> {
        let played = self.ratings.len().checked_sub(1).filter(|n| *n > 0)?;
        Some(self.ratings.iter().skip(1).map(|r| r.mu).sum::<f64>() / played as f64)
    }

    /// Pre-game opponent ratings, in match order
    pub fn opponent_ratings(&self) -> &[OpponentSample] {
        &self.opponent_ratings
    }

    /// Mean pre-game rating of all opponents faced; zero before any game
    pub fn avg_opponent(&self) -> f64 {
        mean_mu(self.opponent_ratings.iter())
    }

    /// Mean pre-game rating of opponents for games with the given result
    pub fn avg_opponent_by(&self, result: GameResult) -> f64 {
        mean_mu(self.opponent_ratings.iter().filter(|s| s.result == result))
    }

    /// Highest pre-game rating of an opponent this team beat
    pub fn best_win(&self) -> Option<f64> {
        self.opponent_ratings
            .iter()
            .filter(|s| s.result == GameResult::Win)
            .map(|s| s.rating.mu)
            .reduce(f64::max)
    }
}

fn mean_mu<'a>(samples: impl Iterator<Item = &'a OpponentSample>) -> f64 {
    let (sum, count) = samples.fold((0.0, 0usize), |(sum, count), sample| {
        (sum + sample.rating.mu, count + 1)
    });
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}
