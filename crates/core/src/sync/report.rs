//! Completion signals emitted by the sync worker

use fieldplan_domain::{impl_domain_status_conversions, FieldPlanError, InterventionId};
use serde::{Deserialize, Serialize};

/// Which local mutation triggered a sync job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    Create,
    Update,
    Delete,
}

impl_domain_status_conversions!(SyncAction {
    Create => "create",
    Update => "update",
    Delete => "delete",
});

/// How a sync job ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// A remote event was created and its id attached to the intervention.
    Linked { external_event_id: String },
    /// The existing remote event was overwritten.
    Updated { external_event_id: String },
    /// The remote event was removed.
    Deleted { external_event_id: String },
    /// The remote event no longer exists; the link was cleared so the next
    /// update recreates it.
    Unlinked { error: FieldPlanError },
    /// Nothing to do (already linked on create, never linked on delete).
    Skipped { reason: String },
    /// Gateway or store failure. Local state is left as is.
    Failed { error: FieldPlanError },
}

/// One processed sync job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub intervention_id: InterventionId,
    pub action: SyncAction,
    #[serde(flatten)]
    pub outcome: SyncOutcome,
}

impl SyncReport {
    pub fn new(intervention_id: InterventionId, action: SyncAction, outcome: SyncOutcome) -> Self {
        Self { intervention_id, action, outcome }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, SyncOutcome::Failed { .. } | SyncOutcome::Unlinked { .. })
    }

    /// External id the intervention is linked to after this job, if known.
    pub fn linked_id(&self) -> Option<&str> {
        match &self.outcome {
            SyncOutcome::Linked { external_event_id }
            | SyncOutcome::Updated { external_event_id } => Some(external_event_id),
            _ => None,
        }
    }
}
