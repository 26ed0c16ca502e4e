pub mod limits;
pub mod lineup;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::RosterEntry;
use crate::planner::PlanningContext;

pub use limits::PositionalLimits;
pub use lineup::DailyLineupOptimizer;

/// Decides who is active on each game day of a planning window.
///
/// Implementations must be deterministic: the same context and roster always produce the same
/// [Optimization]. Simulations diff two runs and rely on that.
pub trait RosterOptimizer {
    fn optimize(&self, ctx: &PlanningContext, roster: &[RosterEntry]) -> Optimization;
}

impl<T: RosterOptimizer + ?Sized> RosterOptimizer for &T {
    fn optimize(&self, ctx: &PlanningContext, roster: &[RosterEntry]) -> Optimization {
        (**self).optimize(ctx, roster)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotAssignment {
    pub slot: String,
    pub player: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyLineup {
    pub date: NaiveDate,
    pub assignments: Vec<SlotAssignment>,
    /// Players whose team plays this date but who did not get a slot.
    pub bench: Vec<String>,
}

/// Lineup assignment plus games played per player name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Optimization {
    pub lineups: Vec<DailyLineup>,
    pub games_played: BTreeMap<String, u32>,
}

impl Optimization {
    pub fn from_games(games_played: BTreeMap<String, u32>) -> Self {
        Self {
            lineups: Vec::new(),
            games_played,
        }
    }

    pub fn total_games(&self) -> u64 {
        self.games_played.values().map(|games| u64::from(*games)).sum()
    }

    pub fn games_for(&self, name: &str) -> u32 {
        self.games_played.get(name).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerUsage {
    pub name: String,
    pub team: String,
    /// Games the player's team has in the window.
    pub available: usize,
    pub played: u32,
    pub benched: usize,
}

/// Per-player available vs. played games, in roster order.
pub fn player_usage(
    ctx: &PlanningContext,
    roster: &[RosterEntry],
    optimization: &Optimization,
) -> Vec<PlayerUsage> {
    roster
        .iter()
        .map(|entry| {
            let available = ctx.team_game_days().games_for(&entry.team);
            let played = optimization.games_for(&entry.name);
            PlayerUsage {
                name: entry.name.clone(),
                team: entry.team.clone(),
                available,
                played,
                benched: available.saturating_sub(played as usize),
            }
        })
        .collect()
}
