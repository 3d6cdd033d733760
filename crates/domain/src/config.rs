//! Configuration structures
//!
//! Loaded by `fieldplan-infra::config`; every section falls back to its
//! defaults when absent.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DAYS_PER_WEEK, DEFAULT_CALENDAR_BASE_URL, DEFAULT_CALENDAR_ID, DEFAULT_LOG_LEVEL,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SYNC_MAX_ATTEMPTS, DEFAULT_SYNC_OPERATION_TIMEOUT_SECS,
    DEFAULT_SYNC_SHUTDOWN_TIMEOUT_SECS,
};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub planning: PlanningConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Planning engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Working days per week used as the occupancy denominator factor.
    pub days_per_week: u32,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self { days_per_week: DAYS_PER_WEEK }
    }
}

/// External calendar synchronization settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// When false, local changes are never pushed to the calendar.
    pub enabled: bool,
    pub calendar_base_url: String,
    pub calendar_id: String,
    pub access_token: Option<String>,
    pub request_timeout_secs: u64,
    /// Total HTTP attempts per gateway call (initial try + retries).
    pub max_attempts: usize,
    /// Upper bound on a single gateway call as seen by the sync worker.
    pub operation_timeout_secs: u64,
    /// How long shutdown waits for queued sync jobs to drain.
    pub shutdown_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            calendar_base_url: DEFAULT_CALENDAR_BASE_URL.to_string(),
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            access_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_attempts: DEFAULT_SYNC_MAX_ATTEMPTS,
            operation_timeout_secs: DEFAULT_SYNC_OPERATION_TIMEOUT_SECS,
            shutdown_timeout_secs: DEFAULT_SYNC_SHUTDOWN_TIMEOUT_SECS,
        }
    }
}

impl SyncConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), json: false }
    }
}
