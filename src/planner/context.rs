use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::info;

use crate::data::{filter_schedule, DateWindow, ScheduleRow, TeamGameDays};
use crate::optimizer::PositionalLimits;
use crate::planner::PlanError;

/// Everything one planning request works against: the filtered schedule, its date window,
/// lineup limits and the team-game-day index derived from that schedule.
///
/// The index is built here and nowhere else, so it always matches the window it was built for.
/// A new window means a new context.
#[derive(Debug, Clone)]
pub struct PlanningContext {
    window: DateWindow,
    schedule: Vec<ScheduleRow>,
    limits: PositionalLimits,
    team_game_days: TeamGameDays,
    game_dates: BTreeSet<NaiveDate>,
}

impl PlanningContext {
    pub fn new(full_schedule: &[ScheduleRow], window: DateWindow, limits: PositionalLimits) -> Self {
        let schedule = filter_schedule(full_schedule, window);
        let team_game_days = TeamGameDays::build(&schedule);
        let game_dates = schedule.iter().map(|row| row.date).collect();
        info!(
            start = %window.start(),
            end = %window.end(),
            rows = schedule.len(),
            teams = team_game_days.len(),
            "planning context built"
        );
        Self {
            window,
            schedule,
            limits,
            team_game_days,
            game_dates,
        }
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }

    /// Rows inside the window, in input order.
    pub fn schedule(&self) -> &[ScheduleRow] {
        &self.schedule
    }

    pub fn limits(&self) -> &PositionalLimits {
        &self.limits
    }

    pub fn team_game_days(&self) -> &TeamGameDays {
        &self.team_game_days
    }

    /// Distinct dates with at least one game, ascending.
    pub fn game_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.game_dates.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
    }

    pub fn ensure_games(&self) -> Result<(), PlanError> {
        if self.is_empty() {
            return Err(PlanError::EmptySchedule);
        }
        Ok(())
    }
}
