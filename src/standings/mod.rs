//! Standings composition
//!
//! Orders a season's teams, turns them into output rows and slices the
//! order into conference, division or wildcard views.

pub mod grouping;
pub mod league;
pub mod row;
pub mod sort;

pub use grouping::{GroupBy, Partition, WildcardSplit};
pub use league::{LeagueInfo, TeamInfo};
pub use row::StandingsRow;
pub use sort::{default_order, SortColumn, StandingsOrder};

use crate::config::StandingsSettings;
use crate::error::Result;
use crate::season::Season;
use crate::team::Team;
use serde::Serialize;

/// A titled block of ranked rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsGroup {
    pub name: String,
    pub rows: Vec<StandingsRow>,
}

/// Division qualifiers plus the wildcard race of one conference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WildcardBracket {
    pub conference: String,
    pub divisions: Vec<StandingsGroup>,
    pub wildcard: Vec<StandingsRow>,
    pub slots: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GroupedStandings {
    Groups(Vec<StandingsGroup>),
    Wildcard(Vec<WildcardBracket>),
}

/// Builds standings tables against one league layout
pub struct StandingsComposer<'a> {
    league: &'a LeagueInfo,
    settings: StandingsSettings,
}

impl<'a> StandingsComposer<'a> {
    pub fn new(league: &'a LeagueInfo, settings: StandingsSettings) -> Self {
        Self { league, settings }
    }

    /// Teams in standings order; ties beyond the comparator keep season order
    pub fn order<'s>(&self, season: &'s Season, order: StandingsOrder) -> Vec<&'s Team> {
        let mut teams: Vec<&Team> = season.teams().collect();
        order.sort(&mut teams);
        teams
    }

    /// Ranked rows of the whole league
    pub fn rows(&self, season: &Season, order: StandingsOrder) -> Vec<StandingsRow> {
        self.to_rows(&self.order(season, order))
    }

    /// Ranked rows split by conference, division or wildcard bracket
    pub fn grouped(
        &self,
        season: &Season,
        order: StandingsOrder,
        group_by: GroupBy,
    ) -> Result<GroupedStandings> {
        let ordered = self.order(season, order);
        let grouped = match group_by {
            GroupBy::Conference => {
                GroupedStandings::Groups(self.to_groups(grouping::by_conference(&ordered, self.league)?))
            }
            GroupBy::Division => {
                GroupedStandings::Groups(self.to_groups(grouping::by_division(&ordered, self.league)?))
            }
            GroupBy::Wildcard => {
                let splits = grouping::wildcard(
                    &ordered,
                    self.league,
                    self.settings.division_qualifiers,
                    self.settings.wildcard_slots,
                )?;
                GroupedStandings::Wildcard(
                    splits
                        .into_iter()
                        .map(|split| WildcardBracket {
                            conference: split.conference,
                            divisions: self.to_groups(split.divisions),
                            wildcard: self.to_rows(&split.wildcard),
                            slots: split.slots,
                        })
                        .collect(),
                )
            }
        };
        Ok(grouped)
    }

    pub fn league(&self) -> &LeagueInfo {
        self.league
    }

    fn to_rows(&self, teams: &[&Team]) -> Vec<StandingsRow> {
        teams
            .iter()
            .enumerate()
            .map(|(i, team)| StandingsRow::new(i + 1, team, self.league.team(team.id()).ok()))
            .collect()
    }

    fn to_groups(&self, partitions: Vec<Partition<'_>>) -> Vec<StandingsGroup> {
        partitions
            .into_iter()
            .map(|p| StandingsGroup {
                rows: self.to_rows(&p.teams),
                name: p.name,
            })
            .collect()
    }
}
