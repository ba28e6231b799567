//! Grouped views over an already-ordered standings list
//!
//! Every view slices the global order; nothing in here sorts.

use crate::error::{EngineError, Result};
use crate::standings::league::{LeagueInfo, TeamInfo};
use crate::team::Team;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Conference,
    Division,
    Wildcard,
}

impl FromStr for GroupBy {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conf" | "conference" => Ok(GroupBy::Conference),
            "div" | "division" => Ok(GroupBy::Division),
            "wildcard" | "wc" => Ok(GroupBy::Wildcard),
            other => Err(EngineError::Configuration {
                message: format!("Unknown grouping: {}", other),
            }),
        }
    }
}

/// A named slice of the global order
#[derive(Debug, Clone)]
pub struct Partition<'s> {
    pub name: String,
    pub teams: Vec<&'s Team>,
}

/// One conference split into automatic qualifiers and the wildcard race
#[derive(Debug, Clone)]
pub struct WildcardSplit<'s> {
    pub conference: String,
    pub divisions: Vec<Partition<'s>>,
    pub wildcard: Vec<&'s Team>,
    pub slots: usize,
}

fn resolve<'l>(league: &'l LeagueInfo, ordered: &[&Team]) -> Result<Vec<&'l TeamInfo>> {
    ordered.iter().map(|team| league.team(team.id())).collect()
}

/// Slice the order by conference, conferences in league-table order
pub fn by_conference<'s>(ordered: &[&'s Team], league: &LeagueInfo) -> Result<Vec<Partition<'s>>> {
    let infos = resolve(league, ordered)?;
    Ok(league
        .conferences()
        .into_iter()
        .map(|conference| Partition {
            name: conference.to_string(),
            teams: ordered
                .iter()
                .zip(&infos)
                .filter(|(_, info)| info.conference == conference)
                .map(|(team, _)| *team)
                .collect(),
        })
        .collect())
}

/// Slice the order by division, divisions in league-table order
pub fn by_division<'s>(ordered: &[&'s Team], league: &LeagueInfo) -> Result<Vec<Partition<'s>>> {
    let infos = resolve(league, ordered)?;
    let mut partitions = Vec::new();
    for conference in league.conferences() {
        for division in league.divisions(conference) {
            partitions.push(Partition {
                name: division.to_string(),
                teams: ordered
                    .iter()
                    .zip(&infos)
                    .filter(|(_, info)| info.division == division)
                    .map(|(team, _)| *team)
                    .collect(),
            });
        }
    }
    Ok(partitions)
}

/// Top `qualifiers` of every division go through; the rest of each conference
/// keeps its global order and competes for `slots` wildcard places
pub fn wildcard<'s>(
    ordered: &[&'s Team],
    league: &LeagueInfo,
    qualifiers: usize,
    slots: usize,
) -> Result<Vec<WildcardSplit<'s>>> {
    let divisions = by_division(ordered, league)?;
    let infos = resolve(league, ordered)?;

    let mut splits = Vec::new();
    for conference in league.conferences() {
        let division_names = league.divisions(conference);
        let leaders: Vec<Partition<'s>> = divisions
            .iter()
            .filter(|p| division_names.contains(&p.name.as_str()))
            .map(|p| Partition {
                name: p.name.clone(),
                teams: p.teams.iter().take(qualifiers).copied().collect(),
            })
            .collect();

        let wildcard = ordered
            .iter()
            .zip(&infos)
            .filter(|(_, info)| info.conference == conference)
            .map(|(team, _)| *team)
            .filter(|team| {
                !leaders
                    .iter()
                    .any(|p| p.teams.iter().any(|leader| leader.id() == team.id()))
            })
            .collect();

        splits.push(WildcardSplit {
            conference: conference.to_string(),
            divisions: leaders,
            wildcard,
            slots,
        });
    }
    Ok(splits)
}
