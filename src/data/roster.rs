use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::{record_line, DataError};

/// Separator between eligible position codes, e.g. `C/LW`.
pub const POSITION_SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(alias = "Name", alias = "player", alias = "Player")]
    pub name: String,
    #[serde(alias = "Team")]
    pub team: String,
    #[serde(alias = "Positions", alias = "position", alias = "Position")]
    pub positions: String,
}

impl RosterEntry {
    pub fn new(
        name: impl Into<String>,
        team: impl Into<String>,
        positions: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            team: team.into(),
            positions: positions.into(),
        }
    }

    /// Trimmed, non-empty position codes in the order they were written.
    pub fn position_codes(&self) -> Vec<&str> {
        self.positions
            .split(POSITION_SEPARATOR)
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .collect()
    }

    pub fn has_position(&self, code: &str) -> bool {
        self.position_codes().contains(&code)
    }
}

pub fn load_roster_csv(path: impl AsRef<Path>) -> Result<Vec<RosterEntry>, DataError> {
    let raw = fs::read_to_string(path).map_err(DataError::Read)?;
    parse_roster_csv(&raw)
}

pub fn parse_roster_csv(content: &str) -> Result<Vec<RosterEntry>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();

    let mut entries = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = record_line(record.position(), index);
        let entry: RosterEntry = record.deserialize(Some(&headers)).map_err(|err| {
            DataError::Row {
                line,
                message: err.to_string(),
            }
        })?;
        entries.push(entry);
    }

    if entries.is_empty() {
        return Err(DataError::Empty("roster"));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_codes_split_and_trim() {
        let entry = RosterEntry::new("Player", "Team", " C / LW //");
        assert_eq!(entry.position_codes(), vec!["C", "LW"]);
        assert!(entry.has_position("LW"));
        assert!(!entry.has_position("RW"));
    }

    #[test]
    fn parses_roster_with_capitalized_headers() {
        let csv = "Name,Team,Positions\nConnor McDavid,Edmonton Oilers,C\nCale Makar,Colorado Avalanche,D\n";
        let roster = parse_roster_csv(csv).expect("roster should parse");

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[1], RosterEntry::new("Cale Makar", "Colorado Avalanche", "D"));
    }

    #[test]
    fn missing_column_is_a_row_error() {
        let csv = "name,team\nSomeone,Somewhere\n";
        assert!(matches!(
            parse_roster_csv(csv),
            Err(DataError::Row { line: 2, .. })
        ));
    }

    #[test]
    fn header_only_roster_is_empty() {
        assert!(matches!(
            parse_roster_csv("name,team,positions\n"),
            Err(DataError::Empty("roster"))
        ));
    }
}
