//! Single roster change: optionally drop one player by name, add one, and compare totals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::RosterEntry;
use crate::optimizer::{Optimization, RosterOptimizer};
use crate::planner::{PlanError, PlanningContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterChange {
    pub name: String,
    pub team: String,
    pub positions: String,
    /// Exact roster name to remove before adding. No case or whitespace folding.
    #[serde(default)]
    pub drop: Option<String>,
}

impl RosterChange {
    pub fn add(
        name: impl Into<String>,
        team: impl Into<String>,
        positions: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            team: team.into(),
            positions: positions.into(),
            drop: None,
        }
    }

    pub fn dropping(mut self, name: impl Into<String>) -> Self {
        self.drop = Some(name.into());
        self
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.name.trim().is_empty() {
            return Err(PlanError::MissingField("name"));
        }
        if self.team.trim().is_empty() {
            return Err(PlanError::MissingField("team"));
        }
        if self.positions.trim().is_empty() {
            return Err(PlanError::MissingField("positions"));
        }
        Ok(())
    }

    /// The added name must not match a player who stays on the roster, otherwise their games
    /// would merge under one name.
    pub fn check_name_free(&self, base: &[RosterEntry]) -> Result<(), PlanError> {
        let kept_clash = base
            .iter()
            .filter(|entry| self.drop.as_deref() != Some(entry.name.as_str()))
            .any(|entry| entry.name == self.name);
        if kept_clash {
            return Err(PlanError::NameInUse(self.name.clone()));
        }
        Ok(())
    }

    pub fn entry(&self) -> RosterEntry {
        RosterEntry::new(&self.name, &self.team, &self.positions)
    }

    /// Copy of `base` with the drop applied and the new entry appended.
    pub fn apply(&self, base: &[RosterEntry]) -> Vec<RosterEntry> {
        let mut roster: Vec<RosterEntry> = match self.drop.as_deref() {
            Some(drop) => base
                .iter()
                .filter(|entry| entry.name != drop)
                .cloned()
                .collect(),
            None => base.to_vec(),
        };
        roster.push(self.entry());
        roster
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationOutcome {
    pub original_total: u64,
    pub new_total: u64,
    pub change: i64,
    /// Games the added player gets in the new lineup.
    pub player_impact_days: u32,
    pub original_games: BTreeMap<String, u32>,
    pub new_games: BTreeMap<String, u32>,
}

/// Run the optimizer on `base_roster` and on `base_roster` with `change` applied, against the
/// same context, and report the difference in total games played.
pub fn simulate_player_change<O>(
    optimizer: &O,
    ctx: &PlanningContext,
    base_roster: &[RosterEntry],
    change: &RosterChange,
) -> Result<SimulationOutcome, PlanError>
where
    O: RosterOptimizer + ?Sized,
{
    change.validate()?;
    change.check_name_free(base_roster)?;
    ctx.ensure_games()?;
    let baseline = optimizer.optimize(ctx, base_roster);
    Ok(simulate_against_baseline(
        optimizer,
        ctx,
        base_roster,
        &baseline,
        change,
    ))
}

/// Simulation core for callers that already hold the baseline run (the team-impact scan).
pub(crate) fn simulate_against_baseline<O>(
    optimizer: &O,
    ctx: &PlanningContext,
    base_roster: &[RosterEntry],
    baseline: &Optimization,
    change: &RosterChange,
) -> SimulationOutcome
where
    O: RosterOptimizer + ?Sized,
{
    let trial_roster = change.apply(base_roster);
    let trial = optimizer.optimize(ctx, &trial_roster);

    let original_total = baseline.total_games();
    let new_total = trial.total_games();
    SimulationOutcome {
        original_total,
        new_total,
        change: new_total as i64 - original_total as i64,
        player_impact_days: trial.games_for(&change.name),
        original_games: baseline.games_played.clone(),
        new_games: trial.games_played,
    }
}
