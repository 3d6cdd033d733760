//! Interventions and their time windows

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::status::InterventionStatus;
use super::technician::TechnicianId;

/// Store-assigned intervention identifier
pub type InterventionId = i64;

/// Half-open time interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Build a window from a start and a (fractional) number of hours.
    ///
    /// The end saturates at the latest representable instant.
    pub fn from_hours(start: DateTime<Utc>, hours: f64) -> Self {
        let end = start
            .checked_add_signed(hours_to_duration(hours))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { start, end }
    }

    /// Two windows overlap when each starts before the other ends. Touching
    /// windows (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start.format("%Y-%m-%d %H:%M"), self.end.format("%Y-%m-%d %H:%M"))
    }
}

/// Convert fractional hours to a duration, rounded to the millisecond.
pub fn hours_to_duration(hours: f64) -> Duration {
    #[allow(clippy::cast_possible_truncation)]
    let millis = (hours * 3_600_000.0).round() as i64;
    Duration::milliseconds(millis.max(-i64::MAX))
}

/// Descriptive fields of an intervention, opaque to scheduling rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionDetails {
    pub client_name: String,
    pub intervention_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl InterventionDetails {
    pub fn new(client_name: impl Into<String>, intervention_type: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            intervention_type: intervention_type.into(),
            location: None,
            notes: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A schedulable unit of field work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    /// Assigned by the schedule store on first save; `None` while unsaved.
    pub id: Option<InterventionId>,
    pub technician_id: TechnicianId,
    #[serde(flatten)]
    pub details: InterventionDetails,
    pub scheduled_start: DateTime<Utc>,
    pub duration_hours: f64,
    pub status: InterventionStatus,
    /// Set if and only if `status == Done`.
    pub actual_end_time: Option<DateTime<Utc>>,
    /// Remote calendar event id, present once a create succeeded.
    pub external_event_id: Option<String>,
}

impl Intervention {
    /// New, unsaved intervention in the `Planned` state.
    pub fn planned(
        technician_id: TechnicianId,
        scheduled_start: DateTime<Utc>,
        duration_hours: f64,
        details: InterventionDetails,
    ) -> Self {
        Self {
            id: None,
            technician_id,
            details,
            scheduled_start,
            duration_hours,
            status: InterventionStatus::Planned,
            actual_end_time: None,
            external_event_id: None,
        }
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::from_hours(self.scheduled_start, self.duration_hours)
    }

    pub fn scheduled_end(&self) -> DateTime<Utc> {
        self.window().end
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_synced(&self) -> bool {
        self.external_event_id.is_some()
    }

    /// Whether `other` would double-book this intervention's technician.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.technician_id == other.technician_id
            && self.status.occupies_slot()
            && other.status.occupies_slot()
            && self.window().overlaps(&other.window())
    }
}
