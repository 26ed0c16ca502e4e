//! Game schedule rows, date-window filtering and the per-team game-day index.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::{record_line, DataError};
use crate::planner::PlanError;

/// Accepted `Date` column formats, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%a %b %d %Y"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub date: NaiveDate,
    pub visitor: String,
    pub home: String,
}

impl ScheduleRow {
    pub fn new(date: NaiveDate, visitor: impl Into<String>, home: impl Into<String>) -> Self {
        Self {
            date,
            visitor: visitor.into(),
            home: home.into(),
        }
    }
}

/// Inclusive `[start, end]` date interval. Construction rejects inverted ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PlanError> {
        if start > end {
            return Err(PlanError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Keep the rows whose date lies inside `window`, preserving input order.
pub fn filter_schedule(rows: &[ScheduleRow], window: DateWindow) -> Vec<ScheduleRow> {
    rows.iter()
        .filter(|row| window.contains(row.date))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamGameCount {
    pub team: String,
    pub games: usize,
}

/// Team name -> distinct dates that team plays, as visitor or home.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TeamGameDays {
    days: BTreeMap<String, BTreeSet<NaiveDate>>,
}

impl TeamGameDays {
    pub fn build(rows: &[ScheduleRow]) -> Self {
        let mut days: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
        for row in rows {
            days.entry(row.visitor.clone()).or_default().insert(row.date);
            days.entry(row.home.clone()).or_default().insert(row.date);
        }
        Self { days }
    }

    pub fn dates_for(&self, team: &str) -> Option<&BTreeSet<NaiveDate>> {
        self.days.get(team)
    }

    pub fn games_for(&self, team: &str) -> usize {
        self.days.get(team).map_or(0, BTreeSet::len)
    }

    pub fn plays_on(&self, team: &str, date: NaiveDate) -> bool {
        self.days
            .get(team)
            .is_some_and(|dates| dates.contains(&date))
    }

    /// Teams in ascending name order.
    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.days.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, BTreeSet<NaiveDate>> {
        &self.days
    }

    /// Game counts per team, busiest first; ties by team name.
    pub fn summary(&self) -> Vec<TeamGameCount> {
        let mut counts: Vec<TeamGameCount> = self
            .days
            .iter()
            .map(|(team, dates)| TeamGameCount {
                team: team.clone(),
                games: dates.len(),
            })
            .collect();
        counts.sort_by(|left, right| {
            right
                .games
                .cmp(&left.games)
                .then_with(|| left.team.cmp(&right.team))
        });
        counts
    }
}

/// Parse a `Date` cell in any of the accepted formats.
pub fn parse_game_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

#[derive(Debug, Deserialize)]
struct RawScheduleRow {
    #[serde(rename = "Date", alias = "date")]
    date: String,
    #[serde(rename = "Visitor", alias = "visitor", alias = "Away", alias = "away")]
    visitor: String,
    #[serde(rename = "Home", alias = "home")]
    home: String,
}

pub fn load_schedule_csv(path: impl AsRef<Path>) -> Result<Vec<ScheduleRow>, DataError> {
    let raw = fs::read_to_string(path).map_err(DataError::Read)?;
    parse_schedule_csv(&raw)
}

pub fn parse_schedule_csv(content: &str) -> Result<Vec<ScheduleRow>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = record_line(record.position(), index);
        let raw: RawScheduleRow = record.deserialize(Some(&headers)).map_err(|err| {
            DataError::Row {
                line,
                message: err.to_string(),
            }
        })?;
        let date = parse_game_date(&raw.date).ok_or_else(|| DataError::Row {
            line,
            message: format!("unrecognized date '{}'", raw.date),
        })?;
        rows.push(ScheduleRow {
            date,
            visitor: raw.visitor,
            home: raw.home,
        });
    }

    if rows.is_empty() {
        return Err(DataError::Empty("schedule"));
    }
    Ok(rows)
}
