//! Team-impact scan: for every team × tracked position, add a hypothetical player and measure the
//! change in roster total games. Costs one optimizer run per candidate, so it only runs on request.

use serde::Serialize;
use tracing::info;

use crate::data::RosterEntry;
use crate::optimizer::RosterOptimizer;
use crate::parallel::{map_ordered, map_ordered_with_progress, WorkerPool};
use crate::planner::ranking::{rank_by_position, PositionRanking, TeamImpactRow};
use crate::planner::simulation::{simulate_against_baseline, RosterChange};
use crate::planner::{PlanError, PlanningContext};

pub const DEFAULT_TOP_N: usize = 10;

/// Progress batches for [scan_team_impact_with_progress].
const SCAN_PROGRESS_BATCH_COUNT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub positions: Vec<String>,
    pub top_n: usize,
    pub pool: WorkerPool,
}

impl ScanOptions {
    /// Every dedicated slot of the context's limits, default top N, global pool.
    pub fn for_context(ctx: &PlanningContext) -> Self {
        Self {
            positions: ctx.limits().tracked_positions(),
            top_n: DEFAULT_TOP_N,
            pool: WorkerPool::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamImpactReport {
    pub baseline_total: u64,
    pub candidates_evaluated: usize,
    pub positions: Vec<PositionRanking>,
}

impl TeamImpactReport {
    pub fn ranking_for(&self, position: &str) -> Option<&PositionRanking> {
        self.positions.iter().find(|ranking| ranking.position == position)
    }
}

/// Roster name given to the player a scan adds. Chosen so it cannot shadow a real name.
pub fn hypothetical_player_name(team: &str, position: &str) -> String {
    format!("[hypothetical {position}] {team}")
}

pub fn scan_team_impact<O>(
    optimizer: &O,
    ctx: &PlanningContext,
    roster: &[RosterEntry],
    options: &ScanOptions,
) -> Result<TeamImpactReport, PlanError>
where
    O: RosterOptimizer + Sync + ?Sized,
{
    run_scan(optimizer, ctx, roster, options, |candidates, evaluate| {
        map_ordered(&options.pool, candidates, evaluate)
    })
}

/// [scan_team_impact] in batches, reporting `(candidates done, candidates total)`.
pub fn scan_team_impact_with_progress<O, P>(
    optimizer: &O,
    ctx: &PlanningContext,
    roster: &[RosterEntry],
    options: &ScanOptions,
    on_progress: P,
) -> Result<TeamImpactReport, PlanError>
where
    O: RosterOptimizer + Sync + ?Sized,
    P: FnMut(usize, usize),
{
    run_scan(optimizer, ctx, roster, options, |candidates, evaluate| {
        map_ordered_with_progress(
            &options.pool,
            candidates,
            SCAN_PROGRESS_BATCH_COUNT,
            evaluate,
            on_progress,
        )
    })
}

type Candidate = (String, String);

fn run_scan<O, E>(
    optimizer: &O,
    ctx: &PlanningContext,
    roster: &[RosterEntry],
    options: &ScanOptions,
    execute: E,
) -> Result<TeamImpactReport, PlanError>
where
    O: RosterOptimizer + Sync + ?Sized,
    E: FnOnce(&[Candidate], &(dyn Fn(&Candidate) -> TeamImpactRow + Sync + Send)) -> Vec<TeamImpactRow>,
{
    ctx.ensure_games()?;

    let candidates: Vec<Candidate> = ctx
        .team_game_days()
        .teams()
        .flat_map(|team| {
            options
                .positions
                .iter()
                .map(move |position| (team.to_string(), position.clone()))
        })
        .collect();
    info!(
        candidates = candidates.len(),
        workers = options.pool.workers,
        "team impact scan started"
    );

    let baseline = optimizer.optimize(ctx, roster);
    let evaluate = |(team, position): &Candidate| {
        let change = RosterChange::add(hypothetical_player_name(team, position), team, position);
        let outcome = simulate_against_baseline(optimizer, ctx, roster, &baseline, &change);
        TeamImpactRow {
            team: team.clone(),
            position: position.clone(),
            delta: outcome.change,
        }
    };
    let rows = execute(&candidates, &evaluate);

    let report = TeamImpactReport {
        baseline_total: baseline.total_games(),
        candidates_evaluated: rows.len(),
        positions: rank_by_position(rows, &options.positions, options.top_n),
    };
    info!(
        candidates = report.candidates_evaluated,
        baseline_total = report.baseline_total,
        "team impact scan finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::{DateWindow, ScheduleRow};
    use crate::optimizer::{DailyLineupOptimizer, PositionalLimits};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn busy_schedule() -> Vec<ScheduleRow> {
        vec![
            ScheduleRow::new(date(1), "A", "B"),
            ScheduleRow::new(date(2), "A", "C"),
            ScheduleRow::new(date(3), "A", "B"),
            ScheduleRow::new(date(4), "D", "C"),
        ]
    }

    #[test]
    fn busiest_team_ranks_first_for_an_open_slot() {
        let window = DateWindow::new(date(1), date(4)).unwrap();
        let ctx = PlanningContext::new(&busy_schedule(), window, PositionalLimits::default());
        let roster = vec![RosterEntry::new("Skater", "D", "C")];
        let options = ScanOptions {
            positions: vec!["LW".to_string()],
            top_n: DEFAULT_TOP_N,
            pool: WorkerPool::with_workers(2),
        };

        let report = scan_team_impact(&DailyLineupOptimizer, &ctx, &roster, &options).unwrap();
        assert_eq!(report.baseline_total, 1);
        assert_eq!(report.candidates_evaluated, 4);
        let rows = &report.ranking_for("LW").unwrap().rows;
        assert_eq!(rows[0].team, "A");
        assert_eq!(rows[0].delta, 3);
        // B and C tie on two games; input order is alphabetical.
        assert_eq!(rows[1].team, "B");
        assert_eq!(rows[2].team, "C");
        assert_eq!(rows[3].delta, 1);
    }

    #[test]
    fn full_slot_yields_zero_delta() {
        let window = DateWindow::new(date(1), date(4)).unwrap();
        let mut slots = std::collections::BTreeMap::new();
        slots.insert("G".to_string(), 1);
        let ctx = PlanningContext::new(&busy_schedule(), window, PositionalLimits::without_flex(slots));
        let roster = vec![
            RosterEntry::new("Goalie A", "A", "G"),
            RosterEntry::new("Goalie C", "C", "G"),
            RosterEntry::new("Goalie D", "D", "G"),
        ];
        let options = ScanOptions::for_context(&ctx);

        let report = scan_team_impact(&DailyLineupOptimizer, &ctx, &roster, &options).unwrap();
        let rows = &report.ranking_for("G").unwrap().rows;
        assert!(rows.iter().all(|row| row.delta == 0), "every game day already has a goalie");
    }

    #[test]
    fn empty_window_is_not_scanned() {
        let window = DateWindow::new(date(20), date(21)).unwrap();
        let ctx = PlanningContext::new(&busy_schedule(), window, PositionalLimits::default());
        let options = ScanOptions::for_context(&ctx);
        let err = scan_team_impact(&DailyLineupOptimizer, &ctx, &[], &options).unwrap_err();
        assert_eq!(err, PlanError::EmptySchedule);
    }

    #[test]
    fn progress_and_plain_scans_agree() {
        let window = DateWindow::new(date(1), date(4)).unwrap();
        let ctx = PlanningContext::new(&busy_schedule(), window, PositionalLimits::default());
        let roster = vec![RosterEntry::new("Skater", "A", "C/LW")];
        let options = ScanOptions::for_context(&ctx);

        let plain = scan_team_impact(&DailyLineupOptimizer, &ctx, &roster, &options).unwrap();
        let mut last = (0, 0);
        let batched = scan_team_impact_with_progress(
            &DailyLineupOptimizer,
            &ctx,
            &roster,
            &options,
            |done, total| last = (done, total),
        )
        .unwrap();
        assert_eq!(plain, batched);
        assert_eq!(last, (20, 20));
    }
}
