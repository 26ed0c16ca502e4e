//! Day-by-day lineup optimizer.
//!
//! Each game day is an independent bipartite matching between the players whose team plays
//! that day and the lineup seats. A maximum matching per day maximizes the season total, so no
//! cross-day search is needed.

use std::collections::BTreeMap;

use tracing::debug;

use crate::data::RosterEntry;
use crate::optimizer::{DailyLineup, Optimization, RosterOptimizer, SlotAssignment};
use crate::planner::PlanningContext;

#[derive(Debug, Clone, Copy, Default)]
pub struct DailyLineupOptimizer;

impl DailyLineupOptimizer {
    pub fn new() -> Self {
        Self
    }
}

impl RosterOptimizer for DailyLineupOptimizer {
    fn optimize(&self, ctx: &PlanningContext, roster: &[RosterEntry]) -> Optimization {
        let limits = ctx.limits();
        let seats = limits.seats();
        let mut games_played: BTreeMap<String, u32> = roster
            .iter()
            .map(|entry| (entry.name.clone(), 0))
            .collect();
        let mut lineups = Vec::new();

        for date in ctx.game_dates() {
            let candidates: Vec<&RosterEntry> = roster
                .iter()
                .filter(|entry| ctx.team_game_days().plays_on(&entry.team, date))
                .collect();
            if candidates.is_empty() {
                continue;
            }

            let eligible: Vec<Vec<usize>> = candidates
                .iter()
                .map(|entry| {
                    seats
                        .iter()
                        .enumerate()
                        .filter(|(_, slot)| limits.accepts(slot, entry))
                        .map(|(seat, _)| seat)
                        .collect()
                })
                .collect();
            let seat_owner = maximum_matching(&eligible, seats.len());

            let mut active = vec![false; candidates.len()];
            let mut assignments = Vec::new();
            for (seat, owner) in seat_owner.iter().enumerate() {
                if let Some(candidate) = owner {
                    active[*candidate] = true;
                    let name = &candidates[*candidate].name;
                    *games_played.entry(name.clone()).or_insert(0) += 1;
                    assignments.push(SlotAssignment {
                        slot: seats[seat].to_string(),
                        player: name.clone(),
                    });
                }
            }
            let bench = candidates
                .iter()
                .zip(&active)
                .filter(|(_, is_active)| !**is_active)
                .map(|(entry, _)| entry.name.clone())
                .collect();

            lineups.push(DailyLineup {
                date,
                assignments,
                bench,
            });
        }

        let optimization = Optimization {
            lineups,
            games_played,
        };
        debug!(
            players = roster.len(),
            days = optimization.lineups.len(),
            total_games = optimization.total_games(),
            "lineup optimization finished"
        );
        optimization
    }
}

/// Kuhn's augmenting-path matching. Candidates are tried in index order and seats in the order
/// listed in `eligible`, so the result is deterministic. Returns the owner of each seat.
fn maximum_matching(eligible: &[Vec<usize>], seat_count: usize) -> Vec<Option<usize>> {
    let mut seat_owner = vec![None; seat_count];
    for candidate in 0..eligible.len() {
        let mut visited = vec![false; seat_count];
        try_assign(candidate, eligible, &mut seat_owner, &mut visited);
    }
    seat_owner
}

fn try_assign(
    candidate: usize,
    eligible: &[Vec<usize>],
    seat_owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &seat in &eligible[candidate] {
        if visited[seat] {
            continue;
        }
        visited[seat] = true;
        let free = match seat_owner[seat] {
            None => true,
            Some(current) => try_assign(current, eligible, seat_owner, visited),
        };
        if free {
            seat_owner[seat] = Some(candidate);
            return true;
        }
    }
    false
}
