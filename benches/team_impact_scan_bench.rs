//! Compare single-threaded vs pooled team-impact scans over a synthetic season.
//!
//! Run with: `cargo bench --bench team_impact_scan`

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rinkplan::data::{DateWindow, RosterEntry, ScheduleRow};
use rinkplan::optimizer::{DailyLineupOptimizer, PositionalLimits};
use rinkplan::parallel::WorkerPool;
use rinkplan::planner::{scan_team_impact, PlanningContext, ScanOptions};

const TEAM_COUNT: usize = 32;

fn team(index: usize) -> String {
    format!("Team {:02}", index % TEAM_COUNT)
}

/// Round-robin schedule: every team plays roughly every other day.
fn season(days: i64) -> Vec<ScheduleRow> {
    let opening = NaiveDate::from_ymd_opt(2024, 10, 8).unwrap_or_default();
    let mut rows = Vec::new();
    for offset in 0..days {
        let date = opening + Duration::days(offset);
        let shift = offset as usize;
        for game in 0..TEAM_COUNT / 4 {
            let visitor = (shift + game * 2) % TEAM_COUNT;
            let home = (shift + game * 2 + TEAM_COUNT / 2 + 1) % TEAM_COUNT;
            rows.push(ScheduleRow::new(date, team(visitor), team(home)));
        }
    }
    rows
}

fn roster() -> Vec<RosterEntry> {
    let positions = ["C", "C", "C/LW", "LW", "LW/RW", "RW", "RW", "D", "D", "D", "D", "D", "G", "G", "G"];
    positions
        .iter()
        .enumerate()
        .map(|(i, pos)| RosterEntry::new(format!("Skater {i}"), team(i * 3), *pos))
        .collect()
}

fn bench_scan_sequential_vs_parallel(c: &mut Criterion) {
    let schedule = season(28);
    let start = NaiveDate::from_ymd_opt(2024, 10, 8).unwrap_or_default();
    let window = match DateWindow::new(start, start + Duration::days(13)) {
        Ok(window) => window,
        Err(err) => panic!("bench window: {err}"),
    };
    let ctx = PlanningContext::new(&schedule, window, PositionalLimits::default());
    let roster = roster();

    let mut group = c.benchmark_group("team_impact_scan");
    group.sample_size(20);

    for (label, workers) in [("sequential", 1), ("parallel", 0)] {
        let mut options = ScanOptions::for_context(&ctx);
        options.pool = WorkerPool::with_workers(workers);
        group.bench_function(label, |b| {
            b.iter(|| black_box(scan_team_impact(&DailyLineupOptimizer, &ctx, &roster, &options)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scan_sequential_vs_parallel);
criterion_main!(benches);
