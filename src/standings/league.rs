//! Static league metadata
//!
//! Names, abbreviations and the conference/division layout. Built once and
//! handed to whatever needs it; nothing here is global.

use crate::error::{EngineError, Result};
use crate::season::Season;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One franchise and where it sits in the league
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub abbrev: String,
    pub location: String,
    pub nickname: String,
    pub conference: String,
    pub division: String,
}

impl TeamInfo {
    pub fn new(abbrev: &str, location: &str, nickname: &str, conference: &str, division: &str) -> Self {
        Self {
            abbrev: abbrev.to_string(),
            location: location.to_string(),
            nickname: nickname.to_string(),
            conference: conference.to_string(),
            division: division.to_string(),
        }
    }

    /// e.g. "Dallas Stars"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.location, self.nickname)
    }

    fn matches(&self, query: &str) -> bool {
        self.abbrev.eq_ignore_ascii_case(query) || self.full_name().eq_ignore_ascii_case(query)
    }
}

/// Immutable league layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueInfo {
    teams: Vec<TeamInfo>,
}

impl LeagueInfo {
    /// Build a league, rejecting duplicate abbreviations or names
    pub fn new(teams: Vec<TeamInfo>) -> Result<Self> {
        let mut seen = HashSet::new();
        for team in &teams {
            if !seen.insert(team.abbrev.to_uppercase()) || !seen.insert(team.full_name().to_uppercase()) {
                return Err(EngineError::Configuration {
                    message: format!("Duplicate team in league table: {}", team.full_name()),
                }
                .into());
            }
        }
        Ok(Self { teams })
    }

    /// The 32-team NHL as of the 2023-24 season
    pub fn nhl() -> Self {
        const EAST: &str = "Eastern";
        const WEST: &str = "Western";
        const ATL: &str = "Atlantic";
        const MET: &str = "Metropolitan";
        const CEN: &str = "Central";
        const PAC: &str = "Pacific";

        let teams = vec![
            TeamInfo::new("BOS", "Boston", "Bruins", EAST, ATL),
            TeamInfo::new("BUF", "Buffalo", "Sabres", EAST, ATL),
            TeamInfo::new("DET", "Detroit", "Red Wings", EAST, ATL),
            TeamInfo::new("FLA", "Florida", "Panthers", EAST, ATL),
            TeamInfo::new("MTL", "Montreal", "Canadiens", EAST, ATL),
            TeamInfo::new("OTT", "Ottawa", "Senators", EAST, ATL),
            TeamInfo::new("TBL", "Tampa Bay", "Lightning", EAST, ATL),
            TeamInfo::new("TOR", "Toronto", "Maple Leafs", EAST, ATL),
            TeamInfo::new("CAR", "Carolina", "Hurricanes", EAST, MET),
            TeamInfo::new("CBJ", "Columbus", "Blue Jackets", EAST, MET),
            TeamInfo::new("NJD", "New Jersey", "Devils", EAST, MET),
            TeamInfo::new("NYI", "New York", "Islanders", EAST, MET),
            TeamInfo::new("NYR", "New York", "Rangers", EAST, MET),
            TeamInfo::new("PHI", "Philadelphia", "Flyers", EAST, MET),
            TeamInfo::new("PIT", "Pittsburgh", "Penguins", EAST, MET),
            TeamInfo::new("WSH", "Washington", "Capitals", EAST, MET),
            TeamInfo::new("ARI", "Arizona", "Coyotes", WEST, CEN),
            TeamInfo::new("CHI", "Chicago", "Blackhawks", WEST, CEN),
            TeamInfo::new("COL", "Colorado", "Avalanche", WEST, CEN),
            TeamInfo::new("DAL", "Dallas", "Stars", WEST, CEN),
            TeamInfo::new("MIN", "Minnesota", "Wild", WEST, CEN),
            TeamInfo::new("NSH", "Nashville", "Predators", WEST, CEN),
            TeamInfo::new("STL", "St. Louis", "Blues", WEST, CEN),
            TeamInfo::new("WPG", "Winnipeg", "Jets", WEST, CEN),
            TeamInfo::new("ANA", "Anaheim", "Ducks", WEST, PAC),
            TeamInfo::new("CGY", "Calgary", "Flames", WEST, PAC),
            TeamInfo::new("EDM", "Edmonton", "Oilers", WEST, PAC),
            TeamInfo::new("LAK", "Los Angeles", "Kings", WEST, PAC),
            TeamInfo::new("SJS", "San Jose", "Sharks", WEST, PAC),
            TeamInfo::new("SEA", "Seattle", "Kraken", WEST, PAC),
            TeamInfo::new("VAN", "Vancouver", "Canucks", WEST, PAC),
            TeamInfo::new("VGK", "Vegas", "Golden Knights", WEST, PAC),
        ];

        Self { teams }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn teams(&self) -> &[TeamInfo] {
        &self.teams
    }

    /// Resolve an abbreviation or full name, case-insensitively
    pub fn team(&self, query: &str) -> Result<&TeamInfo> {
        let query = query.trim();
        self.teams.iter().find(|t| t.matches(query)).ok_or_else(|| {
            EngineError::UnknownTeam {
                team: query.to_string(),
            }
            .into()
        })
    }

    pub fn abbreviation(&self, name: &str) -> Result<&str> {
        Ok(&self.team(name)?.abbrev)
    }

    pub fn full_name(&self, abbrev: &str) -> Result<String> {
        Ok(self.team(abbrev)?.full_name())
    }

    pub fn conference_of(&self, team: &str) -> Result<&str> {
        Ok(&self.team(team)?.conference)
    }

    pub fn division_of(&self, team: &str) -> Result<&str> {
        Ok(&self.team(team)?.division)
    }

    /// Conference names, in table order
    pub fn conferences(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for team in &self.teams {
            if !names.contains(&team.conference.as_str()) {
                names.push(&team.conference);
            }
        }
        names
    }

    /// Division names of one conference, in table order
    pub fn divisions(&self, conference: &str) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for team in self.teams.iter().filter(|t| t.conference == conference) {
            if !names.contains(&team.division.as_str()) {
                names.push(&team.division);
            }
        }
        names
    }

    pub fn teams_in_division(&self, division: &str) -> Vec<&TeamInfo> {
        self.teams.iter().filter(|t| t.division == division).collect()
    }

    /// Check that a folded season covers exactly this league
    ///
    /// Every identifier must resolve, and no two identifiers may resolve to
    /// the same franchise (e.g. "BOS" and "Boston Bruins").
    pub fn validate_season(&self, season: &Season) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        for id in season.team_ids() {
            let franchise = self.abbreviation(id)?;
            if !seen.insert(franchise) {
                return Err(EngineError::DuplicateFranchise {
                    team: id.to_string(),
                    franchise: franchise.to_string(),
                }
                .into());
            }
        }

        if seen.len() != self.len() {
            return Err(EngineError::LeagueSize {
                expected: self.len(),
                actual: seen.len(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::engine_error;
    use crate::types::Match;

    #[test]
    fn test_nhl_layout() {
        let league = LeagueInfo::nhl();
        assert_eq!(league.len(), 32);
        assert_eq!(league.conferences(), vec!["Eastern", "Western"]);
        assert_eq!(league.divisions("Eastern"), vec!["Atlantic", "Metropolitan"]);
        assert_eq!(league.divisions("Western"), vec!["Central", "Pacific"]);
        assert_eq!(league.teams_in_division("Pacific").len(), 8);
        assert!(LeagueInfo::new(league.teams().to_vec()).is_ok());
    }

    #[test]
    fn test_lookup_by_name_or_abbreviation() {
        let league = LeagueInfo::nhl();
        assert_eq!(league.abbreviation("Dallas Stars").unwrap(), "DAL");
        assert_eq!(league.abbreviation("dallas stars").unwrap(), "DAL");
        assert_eq!(league.full_name("vgk").unwrap(), "Vegas Golden Knights");
        assert_eq!(league.conference_of("NYR").unwrap(), "Eastern");
        assert_eq!(league.division_of("St. Louis Blues").unwrap(), "Central");
    }

    #[test]
    fn test_unknown_team() {
        let league = LeagueInfo::nhl();
        let err = league.team("Quebec Nordiques").unwrap_err();
        assert!(matches!(
            engine_error(&err),
            Some(EngineError::UnknownTeam { .. })
        ));
    }

    #[test]
    fn test_duplicate_teams_rejected() {
        let team = TeamInfo::new("DAL", "Dallas", "Stars", "Western", "Central");
        assert!(LeagueInfo::new(vec![team.clone(), team]).is_err());
    }

    fn season_of(ids: &[&str]) -> Season {
        let calculator = crate::rating::Glicko2Calculator::default();
        let date = chrono::NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let fixtures: Vec<Match> = (0..ids.len())
            .map(|i| Match::scheduled(date, "", ids[i], ids[(i + 1) % ids.len()]).unwrap())
            .collect();
        Season::build(fixtures, &calculator).unwrap()
    }

    #[test]
    fn test_validate_season_rejects_alias_of_present_team() {
        let league = LeagueInfo::nhl();
        let mut ids: Vec<&str> = league
            .teams()
            .iter()
            .map(|t| t.abbrev.as_str())
            .filter(|abbrev| *abbrev != "VGK")
            .collect();
        ids.push("Boston Bruins");
        let season = season_of(&ids);
        assert_eq!(season.len(), 32);

        let err = league.validate_season(&season).unwrap_err();
        assert_eq!(
            engine_error(&err),
            Some(&EngineError::DuplicateFranchise {
                team: "Boston Bruins".to_string(),
                franchise: "BOS".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_season_accepts_full_names() {
        let league = LeagueInfo::nhl();
        let names: Vec<String> = league.teams().iter().map(|t| t.full_name()).collect();
        let ids: Vec<&str> = names.iter().map(String::as_str).collect();
        assert!(league.validate_season(&season_of(&ids)).is_ok());

        let err = league.validate_season(&season_of(&ids[1..])).unwrap_err();
        assert_eq!(
            engine_error(&err),
            Some(&EngineError::LeagueSize {
                expected: 32,
                actual: 31
            })
        );
    }

    #[test]
    fn test_validate_season_size() {
        let league = LeagueInfo::nhl();
        let err = league.validate_season(&Season::new()).unwrap_err();
        assert_eq!(
            engine_error(&err),
            Some(&EngineError::LeagueSize {
                expected: 32,
                actual: 0
            })
        );
    }
}
