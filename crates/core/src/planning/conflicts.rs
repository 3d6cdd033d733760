//! Double-booking detection
//!
//! Strict interval overlap over typed timestamps: a technician may not hold
//! two non-cancelled interventions whose `[start, start + duration)` windows
//! intersect.

use fieldplan_domain::{Intervention, InterventionId, PlanningError};

/// First intervention in `existing` that `candidate` would collide with.
///
/// `exclude` skips the intervention being moved during a reschedule.
pub fn find_conflict<'a>(
    existing: impl IntoIterator<Item = &'a Intervention>,
    candidate: &Intervention,
    exclude: Option<InterventionId>,
) -> Option<&'a Intervention> {
    existing
        .into_iter()
        .filter(|other| exclude.is_none() || other.id != exclude)
        .find(|other| other.conflicts_with(candidate))
}

/// Fail with [`PlanningError::Conflict`] if `candidate` double-books.
pub fn ensure_free<'a>(
    existing: impl IntoIterator<Item = &'a Intervention>,
    candidate: &Intervention,
    exclude: Option<InterventionId>,
) -> Result<(), PlanningError> {
    match find_conflict(existing, candidate, exclude) {
        None => Ok(()),
        Some(other) => Err(PlanningError::Conflict {
            technician_id: candidate.technician_id,
            requested: candidate.window(),
            conflicting_id: other.id.unwrap_or_default(),
        }),
    }
}
