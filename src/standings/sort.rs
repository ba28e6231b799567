//! Standings ordering
//!
//! The default comparator is the league tie-break chain. Overrides pick one
//! column from a closed set; there is no lookup by arbitrary field name.

use crate::error::{EngineError, Result};
use crate::team::Team;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Numeric team attributes the standings can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    GamesPlayed,
    Wins,
    Losses,
    OvertimeLosses,
    Points,
    PointsPercentage,
    GoalsFor,
    GoalsAgainst,
    GoalDifferential,
    Rating,
    Deviation,
    AvgOpponent,
    RatingMax,
    RatingAvg,
    BestWin,
}

impl SortColumn {
    pub const ALL: [SortColumn; 15] = [
        SortColumn::GamesPlayed,
        SortColumn::Wins,
        SortColumn::Losses,
        SortColumn::OvertimeLosses,
        SortColumn::Points,
        SortColumn::PointsPercentage,
        SortColumn::GoalsFor,
        SortColumn::GoalsAgainst,
        SortColumn::GoalDifferential,
        SortColumn::Rating,
        SortColumn::Deviation,
        SortColumn::AvgOpponent,
        SortColumn::RatingMax,
        SortColumn::RatingAvg,
        SortColumn::BestWin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SortColumn::GamesPlayed => "games_played",
            SortColumn::Wins => "wins",
            SortColumn::Losses => "losses",
            SortColumn::OvertimeLosses => "overtime_losses",
            SortColumn::Points => "points",
            SortColumn::PointsPercentage => "points_percentage",
            SortColumn::GoalsFor => "goals_for",
            SortColumn::GoalsAgainst => "goals_against",
            SortColumn::GoalDifferential => "goal_differential",
            SortColumn::Rating => "rating",
            SortColumn::Deviation => "deviation",
            SortColumn::AvgOpponent => "avg_opponent",
            SortColumn::RatingMax => "rating_max",
            SortColumn::RatingAvg => "rating_avg",
            SortColumn::BestWin => "best_win",
        }
    }

    fn alias(&self) -> &'static str {
        match self {
            SortColumn::GamesPlayed => "gp",
            SortColumn::Wins => "w",
            SortColumn::Losses => "l",
            SortColumn::OvertimeLosses => "otl",
            SortColumn::Points => "pts",
            SortColumn::PointsPercentage => "p%",
            SortColumn::GoalsFor => "gf",
            SortColumn::GoalsAgainst => "ga",
            SortColumn::GoalDifferential => "diff",
            SortColumn::Rating => "rate",
            SortColumn::Deviation => "rd",
            SortColumn::AvgOpponent => "opp",
            SortColumn::RatingMax => "top",
            SortColumn::RatingAvg => "avg",
            SortColumn::BestWin => "best_win",
        }
    }

    /// Read the column off a team; `None` when the team has no value yet
    pub fn value(&self, team: &Team) -> Option<f64> {
        match self {
            SortColumn::GamesPlayed => Some(f64::from(team.games_played())),
            SortColumn::Wins => Some(f64::from(team.wins())),
            SortColumn::Losses => Some(f64::from(team.losses())),
            SortColumn::OvertimeLosses => Some(f64::from(team.overtime_losses())),
            SortColumn::Points => Some(f64::from(team.points())),
            SortColumn::PointsPercentage => Some(team.points_percentage()),
            SortColumn::GoalsFor => Some(f64::from(team.goals_for())),
            SortColumn::GoalsAgainst => Some(f64::from(team.goals_against())),
            SortColumn::GoalDifferential => Some(team.goal_differential() as f64),
            SortColumn::Rating => Some(team.rating().mu),
            SortColumn::Deviation => Some(team.rating().phi),
            SortColumn::AvgOpponent => {
                (!team.opponent_ratings().is_empty()).then(|| team.avg_opponent())
            }
            SortColumn::RatingMax => team.rating_max(),
            SortColumn::RatingAvg => team.rating_avg(),
            SortColumn::BestWin => team.best_win(),
        }
    }

    /// Descending by value, missing values last
    pub fn compare(&self, a: &Team, b: &Team) -> Ordering {
        match (self.value(a), self.value(b)) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl FromStr for SortColumn {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        SortColumn::ALL
            .into_iter()
            .find(|c| c.name() == key || c.alias() == key)
            .ok_or_else(|| EngineError::UnknownColumn {
                column: s.to_string(),
            })
    }
}

impl std::fmt::Display for SortColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Tie-break chain: points desc, games played asc, wins desc, goal differential desc
pub fn default_order(a: &Team, b: &Team) -> Ordering {
    b.points()
        .cmp(&a.points())
        .then_with(|| a.games_played().cmp(&b.games_played()))
        .then_with(|| b.wins().cmp(&a.wins()))
        .then_with(|| b.goal_differential().cmp(&a.goal_differential()))
}

/// How a standings table is ordered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandingsOrder {
    #[default]
    Default,
    Column(SortColumn),
}

impl StandingsOrder {
    /// Parse an optional column name; `None` keeps the default chain
    pub fn parse(column: Option<&str>) -> Result<Self> {
        match column {
            None => Ok(StandingsOrder::Default),
            Some(name) => Ok(StandingsOrder::Column(name.parse()?)),
        }
    }

    pub fn compare(&self, a: &Team, b: &Team) -> Ordering {
        match self {
            StandingsOrder::Default => default_order(a, b),
            StandingsOrder::Column(column) => column.compare(a, b),
        }
    }

    /// Stable sort; remaining ties keep input order
    pub fn sort(&self, teams: &mut [&Team]) {
        teams.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Match, OutcomeKind, RatingState};
    use chrono::NaiveDate;

    fn team_with(id: &str, results: &[(u32, u32, OutcomeKind)]) -> Team {
        let mut team = Team::new(id, RatingState::default());
        for (day, (own, other, outcome)) in results.iter().enumerate() {
            let date = NaiveDate::from_ymd_opt(2023, 12, day as u32 + 1).unwrap();
            let game = Match::new(date, "", "OPP", id, *other, *own, *outcome).unwrap();
            team.record_game(&game, RatingState::default(), RatingState::default())
                .unwrap();
        }
        team
    }

    #[test]
    fn test_column_aliases() {
        assert_eq!("pts".parse::<SortColumn>().unwrap(), SortColumn::Points);
        assert_eq!("P%".parse::<SortColumn>().unwrap(), SortColumn::PointsPercentage);
        assert_eq!("rate".parse::<SortColumn>().unwrap(), SortColumn::Rating);
        assert_eq!("goal_differential".parse::<SortColumn>().unwrap(), SortColumn::GoalDifferential);
        for column in SortColumn::ALL {
            assert_eq!(column.name().parse::<SortColumn>().unwrap(), column);
        }
    }

    #[test]
    fn test_unknown_column() {
        let err = "__class__".parse::<SortColumn>().unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownColumn {
                column: "__class__".to_string()
            }
        );
        assert!(StandingsOrder::parse(Some("vibes")).is_err());
    }

    #[test]
    fn test_games_in_hand_break_points_tie() {
        use OutcomeKind::Regulation as R;
        // Both on 4 points; "A" needed one more game to get there.
        let a = team_with("A", &[(3, 1, R), (3, 1, R), (1, 3, R)]);
        let b = team_with("B", &[(3, 1, R), (3, 1, R)]);

        let mut teams = vec![&a, &b];
        StandingsOrder::Default.sort(&mut teams);
        assert_eq!(teams[0].id(), "B");
    }

    #[test]
    fn test_wins_then_goal_differential() {
        use OutcomeKind::{Overtime, Regulation as R};
        // Equal points and games; "A" has more wins.
        let a = team_with("A", &[(3, 1, R), (1, 3, R)]);
        let b = team_with("B", &[(1, 2, Overtime), (1, 2, Overtime)]);
        let mut teams = vec![&b, &a];
        StandingsOrder::Default.sort(&mut teams);
        assert_eq!(teams[0].id(), "A");

        // Equal points, games and wins; "D" has the better differential.
        let c = team_with("C", &[(2, 1, R)]);
        let d = team_with("D", &[(6, 1, R)]);
        let mut teams = vec![&c, &d];
        StandingsOrder::Default.sort(&mut teams);
        assert_eq!(teams[0].id(), "D");
    }

    #[test]
    fn test_full_tie_keeps_input_order() {
        use OutcomeKind::Regulation as R;
        let a = team_with("A", &[(2, 1, R)]);
        let b = team_with("B", &[(2, 1, R)]);

        let mut teams = vec![&b, &a];
        StandingsOrder::Default.sort(&mut teams);
        assert_eq!(teams[0].id(), "B");
    }

    #[test]
    fn test_column_sort_puts_missing_last() {
        use OutcomeKind::Regulation as R;
        let winless = team_with("A", &[(1, 2, R)]);
        let winner = team_with("B", &[(2, 1, R)]);
        let fresh = Team::new("C", RatingState::default());

        assert_eq!(winner.best_win(), Some(1500.0));
        assert_eq!(winless.best_win(), None);

        let mut teams = vec![&winless, &fresh, &winner];
        StandingsOrder::Column(SortColumn::BestWin).sort(&mut teams);
        let ids: Vec<&str> = teams.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);

        let mut teams = vec![&fresh, &winless];
        StandingsOrder::Column(SortColumn::AvgOpponent).sort(&mut teams);
        assert_eq!(teams[0].id(), "A");

        let mut teams = vec![&fresh, &winless, &winner];
        StandingsOrder::Column(SortColumn::GoalsAgainst).sort(&mut teams);
        let ids: Vec<&str> = teams.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }
}
