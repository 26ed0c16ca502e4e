use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::config::PlannerConfig;
use crate::data::schedule::parse_game_date;
use crate::data::validate::{validate_inputs, ValidationSeverity};
use crate::data::{load_roster_csv, load_schedule_csv, DateWindow, RosterEntry, ScheduleRow};
use crate::optimizer::{player_usage, DailyLineupOptimizer, RosterOptimizer};
use crate::planner::{
    scan_team_impact, simulate_player_change, PlanError, PlanningContext, RosterChange,
    TeamImpactReport,
};
use crate::server;

const USAGE: &str = "usage: rinkplan <teams|optimize|simulate|scan|validate|serve>";

/// Flags that take a value; everything else starting with `--` is a switch.
const VALUE_FLAGS: &[&str] = &["--name", "--team", "--positions", "--drop", "--top"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Teams,
    Optimize,
    Simulate,
    Scan,
    Validate,
    Serve,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("teams") => Some(Command::Teams),
        Some("optimize") => Some(Command::Optimize),
        Some("simulate") => Some(Command::Simulate),
        Some("scan") => Some(Command::Scan),
        Some("validate") => Some(Command::Validate),
        Some("serve") => Some(Command::Serve),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let config = match PlannerConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return 2;
        }
    };
    let parsed = ParsedArgs::new(&args[2..]);

    match command {
        Command::Teams => handle_teams(&parsed, &config),
        Command::Optimize => handle_optimize(&parsed, &config),
        Command::Simulate => handle_simulate(&parsed, &config),
        Command::Scan => handle_scan(&parsed, &config),
        Command::Validate => handle_validate(&parsed, &config),
        Command::Serve => handle_serve(&config),
    }
}

/// Positional arguments plus `--flag value` pairs and bare `--switch`es.
struct ParsedArgs<'a> {
    positional: Vec<&'a str>,
    flags: Vec<(&'a str, Option<&'a str>)>,
}

impl<'a> ParsedArgs<'a> {
    fn new(args: &'a [String]) -> Self {
        let mut positional = Vec::new();
        let mut flags = Vec::new();
        let mut iter = args.iter().map(String::as_str);
        while let Some(arg) = iter.next() {
            if VALUE_FLAGS.contains(&arg) {
                flags.push((arg, iter.next()));
            } else if arg.starts_with("--") {
                flags.push((arg, None));
            } else {
                positional.push(arg);
            }
        }
        Self { positional, flags }
    }

    fn value(&self, flag: &str) -> Option<&'a str> {
        self.flags
            .iter()
            .rev()
            .find(|(name, _)| *name == flag)
            .and_then(|(_, value)| *value)
    }

    fn switch(&self, flag: &str) -> bool {
        self.flags.iter().any(|(name, _)| *name == flag)
    }
}

/// Loaded inputs for commands that plan over a window: blocking problems become exit code 2.
struct PlanInputs {
    schedule: Vec<ScheduleRow>,
    roster: Vec<RosterEntry>,
    window: DateWindow,
}

fn load_plan_inputs(
    parsed: &ParsedArgs<'_>,
    with_roster: bool,
    usage: &str,
) -> Result<PlanInputs, i32> {
    let expected = if with_roster { 4 } else { 3 };
    if parsed.positional.len() < expected {
        eprintln!("{usage}");
        return Err(2);
    }
    let schedule_path = parsed.positional[0];
    let (roster_path, start_raw, end_raw) = if with_roster {
        (Some(parsed.positional[1]), parsed.positional[2], parsed.positional[3])
    } else {
        (None, parsed.positional[1], parsed.positional[2])
    };

    let window = match parse_window(start_raw, end_raw) {
        Ok(window) => window,
        Err(msg) => {
            eprintln!("{msg}");
            return Err(2);
        }
    };

    let schedule = load_schedule_csv(schedule_path).map_err(|err| {
        eprintln!("schedule '{schedule_path}': {err}");
        2
    })?;
    let roster = match roster_path {
        Some(path) => load_roster_csv(path).map_err(|err| {
            eprintln!("roster '{path}': {err}");
            2
        })?,
        None => Vec::new(),
    };

    Ok(PlanInputs {
        schedule,
        roster,
        window,
    })
}

fn parse_date_arg(raw: &str, name: &str) -> Result<NaiveDate, String> {
    parse_game_date(raw).ok_or_else(|| format!("invalid {name} date '{raw}', expected YYYY-MM-DD"))
}

fn parse_window(start_raw: &str, end_raw: &str) -> Result<DateWindow, String> {
    let start = parse_date_arg(start_raw, "start")?;
    let end = parse_date_arg(end_raw, "end")?;
    DateWindow::new(start, end).map_err(|err| err.to_string())
}

fn print_json<T: Serialize>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

fn report_plan_error(err: &PlanError) -> i32 {
    if err.is_warning() {
        warn!(error = %err, "planning skipped");
        eprintln!("warning: {err}");
    } else {
        eprintln!("error: {err}");
    }
    1
}

fn handle_teams(parsed: &ParsedArgs<'_>, config: &PlannerConfig) -> i32 {
    let inputs = match load_plan_inputs(parsed, false, "usage: rinkplan teams <schedule.csv> <start> <end>") {
        Ok(inputs) => inputs,
        Err(code) => return code,
    };
    let ctx = PlanningContext::new(&inputs.schedule, inputs.window, config.positional_limits());
    if ctx.is_empty() {
        return report_plan_error(&PlanError::EmptySchedule);
    }

    print_json(
        &serde_json::json!({
            "start": ctx.window().start(),
            "end": ctx.window().end(),
            "games_in_window": ctx.schedule().len(),
            "team_game_days": ctx.team_game_days(),
            "summary": ctx.team_game_days().summary(),
        }),
        "team game days",
    )
}

fn handle_optimize(parsed: &ParsedArgs<'_>, config: &PlannerConfig) -> i32 {
    let inputs = match load_plan_inputs(
        parsed,
        true,
        "usage: rinkplan optimize <schedule.csv> <roster.csv> <start> <end> [--table]",
    ) {
        Ok(inputs) => inputs,
        Err(code) => return code,
    };
    let ctx = PlanningContext::new(&inputs.schedule, inputs.window, config.positional_limits());
    if let Err(err) = ctx.ensure_games() {
        return report_plan_error(&err);
    }

    let optimization = DailyLineupOptimizer.optimize(&ctx, &inputs.roster);
    let usage = player_usage(&ctx, &inputs.roster, &optimization);

    if parsed.switch("--table") {
        println!("name\tteam\tavailable\tplayed\tbenched");
        for player in &usage {
            println!(
                "{}\t{}\t{}\t{}\t{}",
                player.name, player.team, player.available, player.played, player.benched
            );
        }
        println!("total\t\t\t{}\t", optimization.total_games());
        return 0;
    }

    print_json(
        &serde_json::json!({
            "total_games": optimization.total_games(),
            "players": usage,
            "lineups": optimization.lineups,
        }),
        "optimization result",
    )
}

fn handle_simulate(parsed: &ParsedArgs<'_>, config: &PlannerConfig) -> i32 {
    let inputs = match load_plan_inputs(
        parsed,
        true,
        "usage: rinkplan simulate <schedule.csv> <roster.csv> <start> <end> --name <name> --team <team> --positions <C/LW> [--drop <name>]",
    ) {
        Ok(inputs) => inputs,
        Err(code) => return code,
    };
    let ctx = PlanningContext::new(&inputs.schedule, inputs.window, config.positional_limits());

    let mut change = RosterChange::add(
        parsed.value("--name").unwrap_or_default(),
        parsed.value("--team").unwrap_or_default(),
        parsed.value("--positions").unwrap_or_default(),
    );
    if let Some(drop) = parsed.value("--drop") {
        change = change.dropping(drop);
    }

    match simulate_player_change(&DailyLineupOptimizer, &ctx, &inputs.roster, &change) {
        Ok(outcome) => print_json(&outcome, "simulation result"),
        Err(err) => report_plan_error(&err),
    }
}

fn handle_scan(parsed: &ParsedArgs<'_>, config: &PlannerConfig) -> i32 {
    let inputs = match load_plan_inputs(
        parsed,
        true,
        "usage: rinkplan scan <schedule.csv> <roster.csv> <start> <end> [--positions C,D] [--top N] [--table]",
    ) {
        Ok(inputs) => inputs,
        Err(code) => return code,
    };
    let ctx = PlanningContext::new(&inputs.schedule, inputs.window, config.positional_limits());

    let mut options = config.scan_options();
    if let Some(raw) = parsed.value("--positions") {
        options.positions = raw
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(raw) = parsed.value("--top") {
        match raw.parse::<usize>() {
            Ok(top_n) if top_n > 0 => options.top_n = top_n,
            _ => eprintln!("invalid top '{raw}', defaulting to {}", options.top_n),
        }
    }

    match scan_team_impact(&DailyLineupOptimizer, &ctx, &inputs.roster, &options) {
        Ok(report) if parsed.switch("--table") => {
            print!("{}", format_scan_table(&report));
            0
        }
        Ok(report) => print_json(&report, "team impact report"),
        Err(err) => report_plan_error(&err),
    }
}

fn format_scan_table(report: &TeamImpactReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "baseline_total\t{}", report.baseline_total);
    for ranking in &report.positions {
        let _ = writeln!(out, "\n{}", ranking.position);
        let _ = writeln!(out, "team\tposition\tdelta");
        for row in &ranking.rows {
            let _ = writeln!(out, "{}\t{}\t{:+}", row.team, row.position, row.delta);
        }
    }
    out
}

fn handle_validate(parsed: &ParsedArgs<'_>, config: &PlannerConfig) -> i32 {
    let &[schedule_path, roster_path, ..] = parsed.positional.as_slice() else {
        eprintln!("usage: rinkplan validate <schedule.csv> <roster.csv>");
        return 2;
    };
    let schedule = match load_schedule_csv(schedule_path) {
        Ok(schedule) => schedule,
        Err(err) => {
            eprintln!("schedule '{schedule_path}': {err}");
            return 2;
        }
    };
    let roster = match load_roster_csv(roster_path) {
        Ok(roster) => roster,
        Err(err) => {
            eprintln!("roster '{roster_path}': {err}");
            return 2;
        }
    };

    let report = validate_inputs(&schedule, &roster, &config.positional_limits());
    for diagnostic in &report.diagnostics {
        if diagnostic.severity == ValidationSeverity::Warning {
            warn!(context = %diagnostic.context, "{}", diagnostic.message);
        }
        eprintln!("- {diagnostic}");
    }
    if report.has_errors() {
        eprintln!("validation failed: {} issue(s)", report.diagnostics.len());
        1
    } else {
        println!(
            "validation passed: {} games, {} players, {} note(s)",
            schedule.len(),
            roster.len(),
            report.diagnostics.len()
        );
        0
    }
}

fn handle_serve(config: &PlannerConfig) -> i32 {
    let bind_addr = config.bind_addr();
    match server::run_server(&bind_addr, config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn parses_known_commands_only() {
        assert_eq!(parse_command(&args(&["rinkplan", "scan"])), Some(Command::Scan));
        assert_eq!(parse_command(&args(&["rinkplan", "launch"])), None);
        assert_eq!(parse_command(&args(&["rinkplan"])), None);
    }

    #[test]
    fn value_flags_consume_their_argument() {
        let raw = args(&["s.csv", "--name", "New Guy", "r.csv", "--table", "--drop", "Old Guy"]);
        let parsed = ParsedArgs::new(&raw);
        assert_eq!(parsed.positional, vec!["s.csv", "r.csv"]);
        assert_eq!(parsed.value("--name"), Some("New Guy"));
        assert_eq!(parsed.value("--drop"), Some("Old Guy"));
        assert!(parsed.switch("--table"));
        assert_eq!(parsed.value("--team"), None);
    }
}
