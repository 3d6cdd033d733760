//! Logging and tracing setup
//!
//! `RUST_LOG` wins over the configured level when set. Installing twice is a
//! no-op, so tests and embedders that bring their own subscriber are safe.

use fieldplan_domain::{FieldPlanError, LoggingConfig, Result};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// # Errors
/// Returns `FieldPlanError::Config` if the configured level is not a valid
/// filter directive.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    // Another thread may have won the race; that subscriber stays.
    let _ = if config.json { builder.json().try_init() } else { builder.try_init() };

    tracing::debug!(level = %config.level, json = config.json, "tracing initialised");
    Ok(())
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| {
        FieldPlanError::Config(format!("Invalid log level '{}': {}", config.level, e))
    })
}
