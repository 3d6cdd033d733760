//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Week model
pub const DAYS_PER_WEEK: u32 = 7;

// Scheduling
/// Longest bookable intervention; also how far back a conflict check looks.
pub const MAX_INTERVENTION_HOURS: f64 = 24.0 * 7.0;

// Calendar synchronization
pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_CALENDAR_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SYNC_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_SYNC_OPERATION_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SYNC_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";
