//! Port interface for intervention and technician persistence
//!
//! The engine never hands the store a reference into its week set; every call
//! takes owned or borrowed copies.

use async_trait::async_trait;
use chrono::NaiveDate;
use fieldplan_domain::{Intervention, InterventionId, Result, Technician};

/// Trait for persisting interventions and reading the technician roster
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Interventions whose scheduled start falls within `start..=end`.
    async fn find_by_week(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Intervention>>;

    /// Insert or update an intervention.
    ///
    /// Assigns `id` when the record is new and returns the record with every
    /// store-assigned field populated.
    async fn save(&self, intervention: Intervention) -> Result<Intervention>;

    /// Delete an intervention. Returns `false` if no record had this id.
    async fn delete(&self, id: InterventionId) -> Result<bool>;

    /// Full technician roster.
    async fn find_all_technicians(&self) -> Result<Vec<Technician>>;

    /// Record the remote calendar event id of an intervention without
    /// touching any other stored field.
    async fn attach_external_id(&self, id: InterventionId, external_event_id: &str) -> Result<()>;

    /// Clear the remote calendar event id of an intervention.
    async fn detach_external_id(&self, id: InterventionId) -> Result<()>;
}
