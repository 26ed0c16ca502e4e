//! Planner configuration: lineup limits, scan settings and the API bind address.
//!
//! Read from YAML at `$RINKPLAN_CONFIG`, or `config/planner.yaml` when that variable is unset.
//! A missing default file means built-in defaults; a missing file named by the variable is an error.

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::optimizer::PositionalLimits;
use crate::parallel::WorkerPool;
use crate::planner::{ScanOptions, DEFAULT_TOP_N};

pub const DEFAULT_CONFIG_PATH: &str = "config/planner.yaml";
pub const CONFIG_PATH_ENV: &str = "RINKPLAN_CONFIG";
pub const BIND_ENV: &str = "RINKPLAN_BIND";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Parse(serde_yaml::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config YAML: {err}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub limits: BTreeMap<String, u32>,
    pub flex: BTreeMap<String, Vec<String>>,
    /// Positions the team-impact scan tries. `None` means every dedicated slot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracked_positions: Option<Vec<String>>,
    pub top_n: usize,
    /// Scan worker threads; 0 uses every core.
    pub workers: usize,
    pub bind: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let limits = PositionalLimits::default();
        Self {
            limits: limits.slots().clone(),
            flex: limits.flex().clone(),
            tracked_positions: None,
            top_n: DEFAULT_TOP_N,
            workers: 0,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl PlannerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        match env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load_from(path),
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load_from(DEFAULT_CONFIG_PATH),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(ConfigError::Read)?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be at least 1".to_string()));
        }
        if self.limits.is_empty() {
            return Err(ConfigError::Invalid("limits must name at least one slot".to_string()));
        }
        self.positional_limits()
            .validate()
            .map_err(ConfigError::Invalid)
    }

    pub fn positional_limits(&self) -> PositionalLimits {
        PositionalLimits::new(self.limits.clone(), self.flex.clone())
    }

    pub fn scan_options(&self) -> ScanOptions {
        let positions = self
            .tracked_positions
            .clone()
            .unwrap_or_else(|| self.positional_limits().tracked_positions());
        ScanOptions {
            positions,
            top_n: self.top_n,
            pool: WorkerPool::with_workers(self.workers),
        }
    }

    /// `$RINKPLAN_BIND` wins over the configured address.
    pub fn bind_addr(&self) -> String {
        env::var(BIND_ENV).unwrap_or_else(|_| self.bind.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults_for_missing_fields() {
        let config = PlannerConfig::from_yaml_str("top_n: 5\nworkers: 2\n").unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.limits.get("D"), Some(&4));
        assert_eq!(config.scan_options().pool, WorkerPool::with_workers(2));
    }

    #[test]
    fn custom_limits_without_flex() {
        let yaml = "limits:\n  C: 1\n  G: 1\nflex: {}\ntracked_positions: [G]\n";
        let config = PlannerConfig::from_yaml_str(yaml).unwrap();
        let options = config.scan_options();
        assert_eq!(options.positions, vec!["G".to_string()]);
        assert_eq!(config.positional_limits().total_seats(), 2);
    }

    #[test]
    fn flex_slot_must_have_a_limit() {
        let yaml = "limits:\n  C: 1\n";
        assert!(matches!(
            PlannerConfig::from_yaml_str(yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn zero_top_n_is_rejected() {
        assert!(matches!(
            PlannerConfig::from_yaml_str("top_n: 0\n"),
            Err(ConfigError::Invalid(_))
        ));
    }
}
