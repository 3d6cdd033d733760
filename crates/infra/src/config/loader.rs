//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the process environment if one exists
//! 2. Attempts to load from environment variables
//! 3. If incomplete, falls back to loading from file
//! 4. Probes multiple paths for config files (JSON or TOML)
//!
//! ## Environment Variables
//! - `FIELDPLAN_CALENDAR_ID`: Target calendar (required for env loading)
//! - `FIELDPLAN_CALENDAR_URL`: Calendar REST API base URL
//! - `FIELDPLAN_CALENDAR_TOKEN`: Bearer token for the calendar API
//! - `FIELDPLAN_SYNC_ENABLED`: Whether calendar sync is enabled (true/false)
//! - `FIELDPLAN_SYNC_TIMEOUT`: Per-request timeout in seconds
//! - `FIELDPLAN_LOG_LEVEL`: Default tracing filter
//! - `FIELDPLAN_LOG_JSON`: Emit JSON log lines (true/false)
//! - `FIELDPLAN_DAYS_PER_WEEK`: Occupancy denominator factor
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.{json,toml}` and `./fieldplan.{json,toml}` (current directory)
//! 2. The same names in the parent and grandparent directories
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use fieldplan_domain::{Config, FieldPlanError, LoggingConfig, PlanningConfig, Result, SyncConfig};
use url::Url;

const CONFIG_FILE_NAMES: [&str; 4] =
    ["config.json", "config.toml", "fieldplan.json", "fieldplan.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variable is missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `FieldPlanError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A value has the wrong type
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `FIELDPLAN_CALENDAR_ID` must be present; every other variable falls back
/// to its default.
///
/// # Errors
/// Returns `FieldPlanError::Config` if the required variable is missing or a
/// value cannot be parsed.
pub fn load_from_env() -> Result<Config> {
    let calendar_id = env_var("FIELDPLAN_CALENDAR_ID")?;
    let defaults = Config::default();

    let calendar_base_url = match std::env::var("FIELDPLAN_CALENDAR_URL").ok() {
        Some(raw) => validate_base_url(&raw)?,
        None => defaults.sync.calendar_base_url,
    };
    let request_timeout_secs =
        env_parse("FIELDPLAN_SYNC_TIMEOUT", defaults.sync.request_timeout_secs)?;
    let days_per_week = env_parse("FIELDPLAN_DAYS_PER_WEEK", defaults.planning.days_per_week)?;
    if days_per_week == 0 || days_per_week > 7 {
        return Err(FieldPlanError::Config(format!(
            "Invalid days per week: {days_per_week} (expected 1-7)"
        )));
    }

    Ok(Config {
        planning: PlanningConfig { days_per_week },
        sync: SyncConfig {
            enabled: env_bool("FIELDPLAN_SYNC_ENABLED", defaults.sync.enabled),
            calendar_base_url,
            calendar_id,
            access_token: std::env::var("FIELDPLAN_CALENDAR_TOKEN").ok().filter(|t| !t.is_empty()),
            request_timeout_secs,
            ..defaults.sync
        },
        logging: LoggingConfig {
            level: std::env::var("FIELDPLAN_LOG_LEVEL").unwrap_or(defaults.logging.level),
            json: env_bool("FIELDPLAN_LOG_JSON", defaults.logging.json),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `FieldPlanError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(FieldPlanError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            FieldPlanError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| FieldPlanError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    validate_base_url(&config.sync.calendar_base_url)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| FieldPlanError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| FieldPlanError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(FieldPlanError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its two nearest ancestors, and
/// the executable's directory, in that order.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }

    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Calendar base URLs must be absolute http(s) URLs.
fn validate_base_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw)
        .map_err(|e| FieldPlanError::Config(format!("Invalid calendar URL '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(raw.trim_end_matches('/').to_string()),
        other => Err(FieldPlanError::Config(format!("Unsupported calendar URL scheme: {other}"))),
    }
}

/// Get required environment variable
///
/// # Errors
/// Returns `FieldPlanError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        FieldPlanError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable, falling back to `default`.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| FieldPlanError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
