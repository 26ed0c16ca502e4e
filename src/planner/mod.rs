//! Planning workflows over one explicit context: roster-change simulation and the team-impact scan.

pub mod context;
pub mod ranking;
pub mod scan;
pub mod simulation;

use std::fmt;

use chrono::NaiveDate;

pub use context::PlanningContext;
pub use ranking::{rank_by_position, PositionRanking, TeamImpactRow};
pub use scan::{
    hypothetical_player_name, scan_team_impact, scan_team_impact_with_progress, ScanOptions,
    TeamImpactReport, DEFAULT_TOP_N,
};
pub use simulation::{simulate_player_change, RosterChange, SimulationOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    InvalidWindow { start: NaiveDate, end: NaiveDate },
    EmptySchedule,
    EmptyRoster,
    /// A required roster-change field was blank.
    MissingField(&'static str),
    /// The added player's name is already on the roster and is not being dropped.
    NameInUse(String),
}

impl PlanError {
    /// Validation-style problems the user fixes by changing inputs, as opposed to bad files.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::EmptySchedule | Self::MissingField(_) | Self::NameInUse(_)
        )
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWindow { start, end } => {
                write!(f, "start date {start} is after end date {end}")
            }
            Self::EmptySchedule => write!(f, "no games scheduled in the selected date range"),
            Self::EmptyRoster => write!(f, "roster is empty"),
            Self::MissingField(field) => write!(f, "player {field} is required"),
            Self::NameInUse(name) => {
                write!(f, "player '{name}' is already on the roster; drop them first")
            }
        }
    }
}

impl std::error::Error for PlanError {}
