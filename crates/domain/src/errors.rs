//! Error types used throughout the application
//!
//! Two layers of errors exist:
//! - [`FieldPlanError`] is what the ports (schedule store, calendar gateway)
//!   return. It describes infrastructure failures.
//! - [`PlanningError`] is what the planning engine returns to its caller.
//!   Business-rule violations are variants of their own; infrastructure
//!   failures during a mutation surface as [`PlanningError::Store`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{InterventionId, InterventionStatus, TechnicianId, TimeWindow};

/// Main infrastructure error type for FieldPlan
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum FieldPlanError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FieldPlanError {
    /// Whether a later attempt of the same call may succeed.
    ///
    /// Calendar gateway failures of this kind are the "transient sync errors"
    /// the sync coordinator logs and heals on the next update.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Auth(_))
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Store(_) => "store",
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for port operations
pub type Result<T> = std::result::Result<T, FieldPlanError>;

/// Errors returned by planning engine operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanningError {
    /// Double-booking attempt. Never retried automatically.
    #[error(
        "technician {technician_id} is already booked by intervention {conflicting_id} \
         for {requested}"
    )]
    Conflict { technician_id: TechnicianId, requested: TimeWindow, conflicting_id: InterventionId },

    /// Requested status change is not part of the transition table.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: InterventionStatus, to: InterventionStatus },

    /// Done and Cancelled interventions no longer accept mutations.
    #[error("intervention {id} is {status} and can no longer be modified")]
    TerminalState { id: InterventionId, status: InterventionStatus },

    #[error("intervention {0} is not part of the current week")]
    NotFound(InterventionId),

    #[error("unknown technician {0}")]
    UnknownTechnician(TechnicianId),

    #[error("technician {0} is not available for assignment")]
    TechnicianUnavailable(TechnicianId),

    #[error("duration must be positive and at most one week, got {0} hours")]
    InvalidDuration(f64),

    /// Persistence failure; the in-memory week was left untouched.
    #[error("store operation failed: {0}")]
    Store(#[source] FieldPlanError),

    /// Week load failed; the previous week set is still displayed.
    #[error("week load failed: {0}")]
    LoadFailed(#[source] FieldPlanError),
}

impl PlanningError {
    /// Business-rule violations are reported to the user as-is; the rest are
    /// operational failures.
    pub fn is_business_rule(&self) -> bool {
        !matches!(self, Self::Store(_) | Self::LoadFailed(_))
    }
}

/// Result type alias for planning engine operations
pub type PlanningResult<T> = std::result::Result<T, PlanningError>;
