//! Season fold
//!
//! Rebuilds every team's state from the full match history of one season.
//! Completed matches are folded through the rating calculator and the team
//! bookkeeping together, strictly in date order; scheduled matches are kept as
//! the remaining schedule.

use crate::error::{EngineError, Result};
use crate::rating::{MatchRatingResult, RatingCalculator};
use crate::team::{SplitRecord, Team};
use crate::types::{GameResult, Match, RatingState, TeamId};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// All team states of one season plus its schedule
#[derive(Debug, Clone, Default)]
pub struct Season {
    teams: BTreeMap<TeamId, Team>,
    completed: Vec<Match>,
    remaining: Vec<Match>,
    last_folded: Option<NaiveDate>,
}

impl Season {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a full, date-ordered match history
    pub fn build(
        matches: impl IntoIterator<Item = Match>,
        calculator: &dyn RatingCalculator,
    ) -> Result<Self> {
        let mut season = Self::new();
        for game in matches {
            season.fold(game, calculator)?;
        }

        info!(
            teams = season.teams.len(),
            completed = season.completed.len(),
            remaining = season.remaining.len(),
            "Season folded"
        );
        Ok(season)
    }

    /// Fold one match into the season
    ///
    /// Returns the rating changes for a completed match, `None` for a fixture.
    pub fn fold(
        &mut self,
        game: Match,
        calculator: &dyn RatingCalculator,
    ) -> Result<Option<MatchRatingResult>> {
        if let Some(last) = self.last_folded.filter(|last| game.date() < *last) {
            if game.is_completed() {
                return Err(EngineError::OutOfOrder {
                    date: game.date(),
                    last,
                    home: game.home().to_string(),
                    away: game.away().to_string(),
                }
                .into());
            }
            warn!("Fixture {} is dated before the last completed match on {}", game, last);
        }

        if !game.is_completed() {
            self.ensure_team(game.home(), calculator);
            self.ensure_team(game.away(), calculator);
            self.remaining.push(game);
            return Ok(None);
        }

        // Both snapshots are taken before either team is touched; a match
        // that fails to rate leaves the season unchanged.
        let home_before = self.rating_or_initial(game.home(), calculator);
        let away_before = self.rating_or_initial(game.away(), calculator);
        let result = calculator.rate_match(&game, home_before, away_before)?;

        self.ensure_team(game.home(), calculator);
        self.ensure_team(game.away(), calculator);
        self.team_mut(game.home())?
            .record_game(&game, result.home.new_rating, away_before)?;
        self.team_mut(game.away())?
            .record_game(&game, result.away.new_rating, home_before)?;

        debug!(
            "{}: {} {:+.1}, {} {:+.1}",
            game,
            game.home(),
            result.home.delta(),
            game.away(),
            result.away.delta()
        );

        self.last_folded = Some(game.date());
        self.completed.push(game);
        Ok(Some(result))
    }

    fn ensure_team(&mut self, id: &str, calculator: &dyn RatingCalculator) {
        if !self.teams.contains_key(id) {
            debug!(team = id, "First appearance, seeding default rating");
            self.teams
                .insert(id.to_string(), Team::new(id, calculator.initial_rating()));
        }
    }

    fn rating_or_initial(&self, id: &str, calculator: &dyn RatingCalculator) -> RatingState {
        self.teams
            .get(id)
            .map(Team::rating)
            .unwrap_or_else(|| calculator.initial_rating())
    }

    /// Look up a team by identifier
    pub fn team(&self, id: &str) -> Result<&Team> {
        self.teams.get(id).ok_or_else(|| {
            EngineError::UnknownTeam {
                team: id.to_string(),
            }
            .into()
        })
    }

    fn team_mut(&mut self, id: &str) -> Result<&mut Team> {
        self.teams.get_mut(id).ok_or_else(|| {
            EngineError::UnknownTeam {
                team: id.to_string(),
            }
            .into()
        })
    }

    /// Teams ordered by identifier
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    pub fn team_ids(&self) -> impl Iterator<Item = &str> {
        self.teams.keys().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.teams.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn completed_matches(&self) -> &[Match] {
        &self.completed
    }

    pub fn remaining_schedule(&self) -> &[Match] {
        &self.remaining
    }

    /// Not-yet-played fixtures of one team, in schedule order
    pub fn remaining_for(&self, id: &str) -> Result<Vec<&Match>> {
        self.team(id)?;
        Ok(self.remaining.iter().filter(|m| m.involves(id)).collect())
    }

    /// Completed matches of one team, in date order
    pub fn completed_for(&self, id: &str) -> Result<Vec<&Match>> {
        self.team(id)?;
        Ok(self.completed.iter().filter(|m| m.involves(id)).collect())
    }

    /// Head-to-head record of `id` against `opponent` over completed matches
    pub fn mutual_record(&self, id: &str, opponent: &str) -> Result<SplitRecord> {
        self.team(id)?;
        self.team(opponent)?;

        let mut record = SplitRecord::default();
        for game in self
            .completed
            .iter()
            .filter(|m| m.involves(id) && m.opponent(id) == Some(opponent))
        {
            match game.result_for(id) {
                Some(GameResult::Win) => record.wins += 1,
                Some(GameResult::Loss) => record.losses += 1,
                Some(GameResult::OvertimeLoss) => record.overtime_losses += 1,
                None => {}
            }
        }
        Ok(record)
    }

    /// Probability that `id` beats `opponent` on current ratings
    pub fn odds(&self, id: &str, opponent: &str, calculator: &dyn RatingCalculator) -> Result<f64> {
        let team = self.team(id)?.rating();
        let other = self.team(opponent)?.rating();
        Ok(calculator.expected_score(&team, &other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::engine_error;
    use crate::rating::Glicko2Calculator;
    use crate::types::OutcomeKind;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, day).unwrap()
    }

    fn played(day: u32, away: &str, home: &str, score: (u32, u32), outcome: OutcomeKind) -> Match {
        Match::new(date(day), "7:00 PM", away, home, score.0, score.1, outcome).unwrap()
    }

    #[test]
    fn test_teams_created_lazily_with_default_rating() {
        let calculator = Glicko2Calculator::default();
        let season = Season::build(
            vec![Match::scheduled(date(20), "", "BOS", "TOR").unwrap()],
            &calculator,
        )
        .unwrap();

        assert_eq!(season.len(), 2);
        assert_eq!(season.team("BOS").unwrap().rating(), calculator.initial_rating());
        assert_eq!(season.remaining_schedule().len(), 1);
        assert!(season.completed_matches().is_empty());
    }

    #[test]
    fn test_fold_updates_both_teams() {
        let calculator = Glicko2Calculator::default();
        let season = Season::build(
            vec![played(10, "BOS", "TOR", (1, 4), OutcomeKind::Regulation)],
            &calculator,
        )
        .unwrap();

        let winner = season.team("TOR").unwrap();
        let loser = season.team("BOS").unwrap();
        assert_eq!(winner.wins(), 1);
        assert_eq!(loser.losses(), 1);
        assert_eq!(winner.points(), 2);
        assert_eq!(loser.points(), 0);
        assert!(winner.rating().mu > 1500.0);
        assert!(loser.rating().mu < 1500.0);
        assert_eq!(winner.opponent_ratings()[0].rating, calculator.initial_rating());
    }

    #[test]
    fn test_out_of_order_match_is_rejected() {
        let calculator = Glicko2Calculator::default();
        let mut season = Season::new();
        season
            .fold(played(12, "BOS", "TOR", (1, 4), OutcomeKind::Regulation), &calculator)
            .unwrap();

        let err = season
            .fold(played(11, "MTL", "OTT", (3, 2), OutcomeKind::Regulation), &calculator)
            .unwrap_err();
        assert!(matches!(
            engine_error(&err),
            Some(EngineError::OutOfOrder { .. })
        ));
        assert_eq!(season.completed_matches().len(), 1);
        assert_eq!(season.len(), 2);
        assert!(!season.contains("MTL"));
        assert!(!season.contains("OTT"));
        assert!(season.team("MTL").is_err());
    }

    #[test]
    fn test_same_day_matches_are_accepted() {
        let calculator = Glicko2Calculator::default();
        let season = Season::build(
            vec![
                played(12, "BOS", "TOR", (1, 4), OutcomeKind::Regulation),
                played(12, "MTL", "OTT", (3, 2), OutcomeKind::Overtime),
            ],
            &calculator,
        )
        .unwrap();
        assert_eq!(season.completed_matches().len(), 2);
        assert_eq!(season.team("OTT").unwrap().overtime_losses(), 1);
    }

    #[test]
    fn test_mutual_record() {
        let calculator = Glicko2Calculator::default();
        let season = Season::build(
            vec![
                played(10, "BOS", "TOR", (1, 4), OutcomeKind::Regulation),
                played(14, "TOR", "BOS", (2, 3), OutcomeKind::Shootout),
                played(18, "TOR", "MTL", (5, 0), OutcomeKind::Regulation),
                played(22, "TOR", "BOS", (6, 1), OutcomeKind::Regulation),
                Match::scheduled(date(30), "", "BOS", "TOR").unwrap(),
            ],
            &calculator,
        )
        .unwrap();

        let record = season.mutual_record("TOR", "BOS").unwrap();
        assert_eq!(record.to_string(), "2-0-1");
        let record = season.mutual_record("BOS", "TOR").unwrap();
        assert_eq!(record.to_string(), "1-2-0");

        assert!(season.mutual_record("TOR", "SEA").is_err());
        assert_eq!(season.remaining_for("BOS").unwrap().len(), 1);
        assert_eq!(season.completed_for("TOR").unwrap().len(), 4);
    }

    #[test]
    fn test_unknown_team_lookup() {
        let season = Season::new();
        let err = season.team("Hartford Whalers").unwrap_err();
        assert_eq!(
            engine_error(&err),
            Some(&EngineError::UnknownTeam {
                team: "Hartford Whalers".to_string()
            })
        );
    }

    #[test]
    fn test_odds_are_complementary() {
        let calculator = Glicko2Calculator::default();
        let season = Season::build(
            vec![
                played(10, "BOS", "TOR", (1, 4), OutcomeKind::Regulation),
                played(11, "BOS", "MTL", (1, 2), OutcomeKind::Overtime),
            ],
            &calculator,
        )
        .unwrap();

        let p = season.odds("TOR", "BOS", &calculator).unwrap();
        let q = season.odds("BOS", "TOR", &calculator).unwrap();
        assert!(p > 0.5);
        assert!((p + q - 1.0).abs() < 1e-9);
    }
}
