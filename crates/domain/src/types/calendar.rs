//! Calendar event payload mirroring one intervention

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::intervention::Intervention;
use super::status::InterventionStatus;

/// What the calendar gateway publishes for an intervention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEventPayload {
    pub summary: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: InterventionStatus,
    pub color: String,
}

impl From<&Intervention> for CalendarEventPayload {
    fn from(intervention: &Intervention) -> Self {
        let details = &intervention.details;
        let summary = format!("[{}] {}", details.intervention_type, details.client_name);

        let mut description = String::new();
        let _ = writeln!(description, "Client: {}", details.client_name);
        let _ = writeln!(description, "Technician: #{}", intervention.technician_id);
        let _ = writeln!(description, "Type: {}", details.intervention_type);
        let _ = writeln!(description, "Status: {}", intervention.status);
        let _ = write!(description, "Estimated duration: {} h", intervention.duration_hours);
        if let Some(notes) = details.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            let _ = write!(description, "\n\nNotes:\n{notes}");
        }

        let window = intervention.window();
        Self {
            summary,
            description,
            location: details.location.clone(),
            start: window.start,
            end: window.end,
            status: intervention.status,
            color: intervention.status.color_key().to_string(),
        }
    }
}
