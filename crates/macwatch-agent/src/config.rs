//! Configuration for the macwatch agent.
//!
//! Loaded from `macwatch.toml` plus `MACWATCH__` environment overrides;
//! every field has a default so the binary runs with no config file at all.

use chrono::TimeDelta;
use macwatch_probe::ProbeConfig;
use serde::Deserialize;

/// Hours an unknown row may go unclassified before eviction.
pub const DEFAULT_RETENTION_HOURS: i64 = 48;

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Path to the SQLite device store.
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Retention threshold for unclassified devices, in hours.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u64,

    /// arp-scan probe settings.
    #[serde(default)]
    pub probe: ProbeConfig,
}

impl AgentConfig {
    pub fn retention(&self) -> TimeDelta {
        TimeDelta::try_hours(self.retention_hours as i64)
            .unwrap_or_else(|| TimeDelta::hours(DEFAULT_RETENTION_HOURS))
    }
}

fn default_store_path() -> String {
    "macwatch.db".to_string()
}

fn default_retention_hours() -> u64 {
    DEFAULT_RETENTION_HOURS as u64
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            retention_hours: default_retention_hours(),
            probe: ProbeConfig::default(),
        }
    }
}
