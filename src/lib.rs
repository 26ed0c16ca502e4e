//! Fantasy-hockey roster planning: schedule windows, team game days, lineup optimization and
//! roster-change impact.

pub mod cli;
pub mod config;
pub mod data;
pub mod optimizer;
pub mod parallel;
pub mod planner;
pub mod server;
