//! Intervention lifecycle states and the transition table
//!
//! ```text
//! Planned    -> Confirmed | InProgress | Postponed | Cancelled
//! Confirmed  -> InProgress | Postponed | Cancelled
//! InProgress -> Done | Postponed | Cancelled
//! Postponed  -> Planned | Cancelled
//! Done, Cancelled: terminal
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::PlanningError;
use crate::impl_domain_status_conversions;

/// Lifecycle state of an intervention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionStatus {
    #[default]
    Planned,
    Confirmed,
    InProgress,
    Done,
    Postponed,
    Cancelled,
}

impl_domain_status_conversions!(InterventionStatus {
    Planned => "planned",
    Confirmed => "confirmed",
    InProgress => "in_progress",
    Done => "done",
    Postponed => "postponed",
    Cancelled => "cancelled",
});

impl InterventionStatus {
    /// Every state, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Planned,
        Self::Confirmed,
        Self::InProgress,
        Self::Done,
        Self::Postponed,
        Self::Cancelled,
    ];

    /// States reachable from `self` in one step.
    pub fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::Planned => &[Self::Confirmed, Self::InProgress, Self::Postponed, Self::Cancelled],
            Self::Confirmed => &[Self::InProgress, Self::Postponed, Self::Cancelled],
            Self::InProgress => &[Self::Done, Self::Postponed, Self::Cancelled],
            // a postponed item must be explicitly replanned
            Self::Postponed => &[Self::Planned, Self::Cancelled],
            Self::Done | Self::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, target: Self) -> bool {
        self.allowed_targets().contains(&target)
    }

    /// Validate a transition, naming the rejected pair on failure.
    pub fn transition_to(self, target: Self) -> Result<Self, PlanningError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(PlanningError::InvalidTransition { from: self, to: target })
        }
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_targets().is_empty()
    }

    /// Cancelled interventions release their time slot.
    pub fn occupies_slot(self) -> bool {
        self != Self::Cancelled
    }

    /// Colour key used for calendar rendering.
    pub fn color_key(self) -> &'static str {
        match self {
            Self::Planned => "#007bff",
            Self::Confirmed => "#17a2b8",
            Self::InProgress => "#fd7e14",
            Self::Done => "#28a745",
            Self::Postponed => "#6c757d",
            Self::Cancelled => "#dc3545",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_have_no_targets() {
        assert!(InterventionStatus::Done.is_terminal());
        assert!(InterventionStatus::Cancelled.is_terminal());
        for status in [
            InterventionStatus::Planned,
            InterventionStatus::Confirmed,
            InterventionStatus::InProgress,
            InterventionStatus::Postponed,
        ] {
            assert!(!status.is_terminal(), "{status} should not be terminal");
        }
    }

    #[test]
    fn done_requires_in_progress() {
        assert!(!InterventionStatus::Planned.can_transition_to(InterventionStatus::Done));
        assert!(!InterventionStatus::Confirmed.can_transition_to(InterventionStatus::Done));
        assert!(InterventionStatus::InProgress.can_transition_to(InterventionStatus::Done));
    }

    #[test]
    fn postponed_only_back_to_planned_or_cancelled() {
        let from = InterventionStatus::Postponed;
        assert_eq!(from.transition_to(InterventionStatus::Planned), Ok(InterventionStatus::Planned));
        assert_eq!(
            from.transition_to(InterventionStatus::InProgress),
            Err(PlanningError::InvalidTransition { from, to: InterventionStatus::InProgress })
        );
    }

    #[test]
    fn self_transitions_are_rejected() {
        for status in InterventionStatus::ALL {
            assert!(!status.can_transition_to(status), "{status} -> {status} must be rejected");
        }
    }

    #[test]
    fn transition_table_has_twelve_edges() {
        let edges: usize =
            InterventionStatus::ALL.iter().map(|s| s.allowed_targets().len()).sum();
        assert_eq!(edges, 4 + 3 + 3 + 2);
    }

    #[test]
    fn labels_round_trip_through_serde_and_fromstr() {
        let json = serde_json::to_string(&InterventionStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        assert_eq!("In Progress".parse::<InterventionStatus>(), Ok(InterventionStatus::InProgress));
        assert_eq!(InterventionStatus::default(), InterventionStatus::Planned);
    }
}
