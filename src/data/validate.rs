use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::data::{RosterEntry, ScheduleRow, TeamGameDays};
use crate::optimizer::PositionalLimits;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.count(ValidationSeverity::Error) > 0
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Check schedule and roster rows for problems the optimizer would silently mis-handle.
pub fn validate_inputs(
    schedule: &[ScheduleRow],
    roster: &[RosterEntry],
    limits: &PositionalLimits,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_schedule(&mut report, schedule);
    validate_roster(&mut report, roster, limits);

    let index = TeamGameDays::build(schedule);
    for (row, entry) in roster.iter().enumerate() {
        let team = entry.team.trim();
        if !team.is_empty() && index.games_for(team) == 0 {
            report.push(
                ValidationSeverity::Info,
                format!("roster[{row}] name='{}'.team", entry.name),
                format!("team '{team}' has no games in the schedule"),
            );
        }
    }
    report
}

fn validate_schedule(report: &mut ValidationReport, schedule: &[ScheduleRow]) {
    for (row, game) in schedule.iter().enumerate() {
        let context = format!("schedule[{row}] date={}", game.date);
        if game.visitor.trim().is_empty() {
            report.push(ValidationSeverity::Error, &context, "missing visitor team");
        }
        if game.home.trim().is_empty() {
            report.push(ValidationSeverity::Error, &context, "missing home team");
        }
        if !game.visitor.trim().is_empty() && game.visitor == game.home {
            report.push(
                ValidationSeverity::Error,
                &context,
                format!("'{}' listed as both visitor and home", game.visitor),
            );
        }
    }
}

fn validate_roster(report: &mut ValidationReport, roster: &[RosterEntry], limits: &PositionalLimits) {
    let mut seen_names = HashSet::new();
    for (row, entry) in roster.iter().enumerate() {
        let context = format!("roster[{row}]");
        if entry.name.trim().is_empty() {
            report.push(ValidationSeverity::Error, format!("{context}.name"), "missing non-empty 'name'");
        } else if !seen_names.insert(entry.name.as_str()) {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.name"),
                format!("duplicate name '{}'; games are summed under one name", entry.name),
            );
        }
        if entry.team.trim().is_empty() {
            report.push(ValidationSeverity::Error, format!("{context}.team"), "missing non-empty 'team'");
        }

        let codes = entry.position_codes();
        if codes.is_empty() {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.positions"),
                "missing non-empty 'positions'",
            );
        }
        for code in codes {
            if !limits.recognizes_code(code) {
                report.push(
                    ValidationSeverity::Warning,
                    format!("{context}.positions"),
                    format!("no lineup slot accepts position '{code}'"),
                );
            }
        }
    }
}
