use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const SCHEDULE_CSV: &str = "Date,Visitor,Home\n\
2024-01-01,Boston Bruins,Toronto Maple Leafs\n\
2024-01-02,Edmonton Oilers,Calgary Flames\n\
2024-01-03,Toronto Maple Leafs,Edmonton Oilers\n\
2024-01-04,Boston Bruins,Calgary Flames\n\
2024-01-20,Boston Bruins,Edmonton Oilers\n";

const ROSTER_CSV: &str = "name,team,positions\n\
Auston Matthews,Toronto Maple Leafs,C\n\
Connor McDavid,Edmonton Oilers,C\n\
David Pastrnak,Boston Bruins,RW\n";

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_rinkplan")
}

fn unique_temp_path(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("rinkplan-{name}-{stamp}.csv"))
}

fn write_fixture(name: &str, content: &str) -> PathBuf {
    let path = unique_temp_path(name);
    fs::write(&path, content).expect("fixture should be written");
    path
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(bin())
        .args(args)
        .env_remove("RINKPLAN_CONFIG")
        .output()
        .expect("rinkplan should run")
}

#[test]
fn unknown_command_prints_usage() {
    let output = run(&["launch"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage: rinkplan"));
}

#[test]
fn teams_command_emits_team_game_days() {
    let schedule = write_fixture("teams-schedule", SCHEDULE_CSV);
    let output = run(&["teams", schedule.to_str().unwrap(), "2024-01-01", "2024-01-04"]);

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("teams should emit json");
    assert_eq!(payload["games_in_window"], 4);
    let bruins = payload["team_game_days"]["Boston Bruins"]
        .as_array()
        .expect("bruins should have dates");
    assert_eq!(bruins.len(), 2);
    assert_eq!(payload["summary"][0]["games"], 2);

    let _ = fs::remove_file(schedule);
}

#[test]
fn inverted_window_is_a_blocking_error() {
    let schedule = write_fixture("inverted-schedule", SCHEDULE_CSV);
    let output = run(&["teams", schedule.to_str().unwrap(), "2024-01-04", "2024-01-01"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("is after end date"));

    let _ = fs::remove_file(schedule);
}

#[test]
fn optimize_command_reports_total_games() {
    let schedule = write_fixture("optimize-schedule", SCHEDULE_CSV);
    let roster = write_fixture("optimize-roster", ROSTER_CSV);
    let output = run(&[
        "optimize",
        schedule.to_str().unwrap(),
        roster.to_str().unwrap(),
        "2024-01-01",
        "2024-01-04",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("optimize should emit json");
    // Matthews 2, McDavid 2, Pastrnak 2; nobody is crowded out of a slot.
    assert_eq!(payload["total_games"], 6);
    assert_eq!(payload["players"].as_array().map(Vec::len), Some(3));

    let _ = fs::remove_file(schedule);
    let _ = fs::remove_file(roster);
}

#[test]
fn simulate_command_reports_change() {
    let schedule = write_fixture("simulate-schedule", SCHEDULE_CSV);
    let roster = write_fixture("simulate-roster", ROSTER_CSV);
    let output = run(&[
        "simulate",
        schedule.to_str().unwrap(),
        roster.to_str().unwrap(),
        "2024-01-01",
        "2024-01-04",
        "--name",
        "Nazem Kadri",
        "--team",
        "Calgary Flames",
        "--positions",
        "C",
        "--drop",
        "David Pastrnak",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("simulate should emit json");
    assert_eq!(payload["original_total"], 6);
    assert_eq!(payload["player_impact_days"], 2);
    assert_eq!(payload["change"], 0);

    let _ = fs::remove_file(schedule);
    let _ = fs::remove_file(roster);
}

#[test]
fn simulate_without_name_is_a_warning() {
    let schedule = write_fixture("simulate-blank-schedule", SCHEDULE_CSV);
    let roster = write_fixture("simulate-blank-roster", ROSTER_CSV);
    let output = run(&[
        "simulate",
        schedule.to_str().unwrap(),
        roster.to_str().unwrap(),
        "2024-01-01",
        "2024-01-04",
        "--team",
        "Calgary Flames",
        "--positions",
        "C",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("warning: player name is required"));

    let _ = fs::remove_file(schedule);
    let _ = fs::remove_file(roster);
}

#[test]
fn scan_on_empty_window_is_a_warning() {
    let schedule = write_fixture("scan-empty-schedule", SCHEDULE_CSV);
    let roster = write_fixture("scan-empty-roster", ROSTER_CSV);
    let output = run(&[
        "scan",
        schedule.to_str().unwrap(),
        roster.to_str().unwrap(),
        "2024-02-01",
        "2024-02-07",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no games scheduled"));

    let _ = fs::remove_file(schedule);
    let _ = fs::remove_file(roster);
}

#[test]
fn scan_command_ranks_teams_per_position() {
    let schedule = write_fixture("scan-schedule", SCHEDULE_CSV);
    let roster = write_fixture("scan-roster", ROSTER_CSV);
    let output = run(&[
        "scan",
        schedule.to_str().unwrap(),
        roster.to_str().unwrap(),
        "2024-01-01",
        "2024-01-20",
        "--positions",
        "G,LW",
        "--top",
        "2",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("scan should emit json");
    let positions = payload["positions"].as_array().expect("positions array");
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0]["position"], "G");
    let goalie_rows = positions[0]["rows"].as_array().expect("rows array");
    assert_eq!(goalie_rows.len(), 2);
    // Bruins and Oilers each play three times in the window.
    assert_eq!(goalie_rows[0]["team"], "Boston Bruins");
    assert_eq!(goalie_rows[0]["delta"], 3);
    assert_eq!(goalie_rows[1]["team"], "Edmonton Oilers");

    let _ = fs::remove_file(schedule);
    let _ = fs::remove_file(roster);
}

#[test]
fn validate_command_fails_on_bad_rows() {
    let schedule = write_fixture(
        "validate-schedule",
        "Date,Visitor,Home\n2024-01-01,Boston Bruins,Boston Bruins\n",
    );
    let roster = write_fixture("validate-roster", "name,team,positions\nNobody,,C\n");
    let output = run(&[
        "validate",
        schedule.to_str().unwrap(),
        roster.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed"));
    assert!(stderr.contains("listed as both visitor and home"));

    let _ = fs::remove_file(schedule);
    let _ = fs::remove_file(roster);
}

#[test]
fn missing_roster_file_is_a_blocking_error() {
    let schedule = write_fixture("missing-roster-schedule", SCHEDULE_CSV);
    let output = run(&[
        "optimize",
        schedule.to_str().unwrap(),
        "/nonexistent/rinkplan-roster.csv",
        "2024-01-01",
        "2024-01-04",
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("roster"));

    let _ = fs::remove_file(schedule);
}
