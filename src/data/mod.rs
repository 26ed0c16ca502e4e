//! Schedule and roster inputs: CSV loading, the team-game-day index, and input validation.

pub mod roster;
pub mod schedule;
pub mod validate;

use std::fmt;

pub use roster::{load_roster_csv, parse_roster_csv, RosterEntry};
pub use schedule::{
    filter_schedule, load_schedule_csv, parse_schedule_csv, DateWindow, ScheduleRow, TeamGameDays,
};

#[derive(Debug)]
pub enum DataError {
    Read(std::io::Error),
    Csv(csv::Error),
    /// A record parsed but its contents were unusable. `line` is 1-based and counts the header.
    Row { line: u64, message: String },
    /// The input had a header but no records.
    Empty(&'static str),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read input file: {err}"),
            Self::Csv(err) => write!(f, "failed to parse CSV: {err}"),
            Self::Row { line, message } => write!(f, "line {line}: {message}"),
            Self::Empty(what) => write!(f, "{what} is empty"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Row { .. } | Self::Empty(_) => None,
        }
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Line number of a CSV record for diagnostics; falls back to `index + 2` (header is line 1).
pub(crate) fn record_line(position: Option<&csv::Position>, index: usize) -> u64 {
    position
        .map(csv::Position::line)
        .unwrap_or(index as u64 + 2)
}
