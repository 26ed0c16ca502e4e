//! JSON payload handlers. Every request carries its own schedule, roster and window; nothing is
//! kept between requests.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::data::schedule::TeamGameCount;
use crate::data::{DateWindow, RosterEntry, ScheduleRow, TeamGameDays};
use crate::optimizer::{
    player_usage, DailyLineup, DailyLineupOptimizer, PlayerUsage, PositionalLimits,
    RosterOptimizer,
};
use crate::planner::{
    scan_team_impact, simulate_player_change, PlanError, PlanningContext, RosterChange,
    SimulationOutcome, TeamImpactReport,
};

#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    pub schedule: Vec<ScheduleRow>,
    #[serde(default)]
    pub roster: Vec<RosterEntry>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Overrides the server's configured limits for this request.
    #[serde(default)]
    pub limits: Option<BTreeMap<String, u32>>,
    #[serde(default)]
    pub flex: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulateRequest {
    #[serde(flatten)]
    pub plan: PlanRequest,
    pub change: RosterChange,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanRequest {
    #[serde(flatten)]
    pub plan: PlanRequest,
    #[serde(default)]
    pub positions: Option<Vec<String>>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamDaysResponse {
    pub status: &'static str,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub games_in_window: usize,
    pub team_game_days: TeamGameDays,
    pub summary: Vec<TeamGameCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizeResponse {
    pub status: &'static str,
    pub total_games: u64,
    pub players: Vec<PlayerUsage>,
    pub lineups: Vec<DailyLineup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulateResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub outcome: SimulationOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub report: TeamImpactReport,
}

#[derive(Debug)]
pub enum ApiError {
    Parse(serde_json::Error),
    Plan(PlanError),
    Limits(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "Invalid request body: {err}"),
            Self::Plan(err) => write!(f, "{err}"),
            Self::Limits(msg) => write!(f, "Invalid limits: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        Self::Plan(err)
    }
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "rinkplan-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

impl PlanRequest {
    fn limits(&self, config: &PlannerConfig) -> Result<PositionalLimits, ApiError> {
        let limits = PositionalLimits::new(
            self.limits.clone().unwrap_or_else(|| config.limits.clone()),
            self.flex.clone().unwrap_or_else(|| {
                if self.limits.is_some() {
                    BTreeMap::new()
                } else {
                    config.flex.clone()
                }
            }),
        );
        limits.validate().map_err(ApiError::Limits)?;
        Ok(limits)
    }

    fn context(&self, config: &PlannerConfig) -> Result<PlanningContext, ApiError> {
        let window = DateWindow::new(self.start, self.end)?;
        Ok(PlanningContext::new(&self.schedule, window, self.limits(config)?))
    }

    fn require_roster(&self) -> Result<(), ApiError> {
        if self.roster.is_empty() {
            return Err(ApiError::Plan(PlanError::EmptyRoster));
        }
        Ok(())
    }
}

pub fn team_days_payload(body: &str, config: &PlannerConfig) -> Result<String, ApiError> {
    let request: PlanRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let ctx = request.context(config)?;
    let response = TeamDaysResponse {
        status: "ok",
        start: ctx.window().start(),
        end: ctx.window().end(),
        games_in_window: ctx.schedule().len(),
        team_game_days: ctx.team_game_days().clone(),
        summary: ctx.team_game_days().summary(),
    };
    serde_json::to_string_pretty(&response).map_err(ApiError::Parse)
}

pub fn optimize_payload(body: &str, config: &PlannerConfig) -> Result<String, ApiError> {
    let request: PlanRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    request.require_roster()?;
    let ctx = request.context(config)?;
    ctx.ensure_games()?;

    let optimization = DailyLineupOptimizer.optimize(&ctx, &request.roster);
    let response = OptimizeResponse {
        status: "ok",
        total_games: optimization.total_games(),
        players: player_usage(&ctx, &request.roster, &optimization),
        lineups: optimization.lineups,
    };
    serde_json::to_string_pretty(&response).map_err(ApiError::Parse)
}

pub fn simulate_payload(body: &str, config: &PlannerConfig) -> Result<String, ApiError> {
    let request: SimulateRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    request.plan.require_roster()?;
    let ctx = request.plan.context(config)?;

    let outcome =
        simulate_player_change(&DailyLineupOptimizer, &ctx, &request.plan.roster, &request.change)?;
    serde_json::to_string_pretty(&SimulateResponse {
        status: "ok",
        outcome,
    })
    .map_err(ApiError::Parse)
}

pub fn scan_payload(body: &str, config: &PlannerConfig) -> Result<String, ApiError> {
    let request: ScanRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    request.plan.require_roster()?;
    let ctx = request.plan.context(config)?;

    let mut options = config.scan_options();
    if request.plan.limits.is_some() {
        options.positions = ctx.limits().tracked_positions();
    }
    if let Some(positions) = request.positions {
        options.positions = positions;
    }
    if let Some(top_n) = request.top_n {
        options.top_n = top_n.max(1);
    }

    let report = scan_team_impact(&DailyLineupOptimizer, &ctx, &request.plan.roster, &options)?;
    serde_json::to_string_pretty(&ScanResponse {
        status: "ok",
        report,
    })
    .map_err(ApiError::Parse)
}
