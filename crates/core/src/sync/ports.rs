//! Port interface for the external calendar

use async_trait::async_trait;
use fieldplan_domain::{Intervention, Result};

/// Trait for pushing intervention state into a third-party calendar
///
/// Network and authentication failures are reported as
/// `FieldPlanError::Network` / `FieldPlanError::Auth`; a missing remote event
/// is `FieldPlanError::NotFound`.
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Create a remote event and return its opaque identifier.
    async fn create(&self, intervention: &Intervention) -> Result<String>;

    /// Overwrite the remote event with the intervention's current state.
    async fn update(&self, external_event_id: &str, intervention: &Intervention) -> Result<()>;

    /// Delete the remote event.
    async fn delete(&self, external_event_id: &str) -> Result<()>;
}
