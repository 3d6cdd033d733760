//! Week-level statistics

use serde::{Deserialize, Serialize};

use super::technician::TechnicianId;

/// Load carried by one technician during the displayed week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicianLoad {
    pub technician_id: TechnicianId,
    pub name: String,
    /// Non-cancelled interventions assigned this week.
    pub interventions: usize,
    /// Sum of scheduled hours over those interventions.
    pub booked_hours: f64,
}

/// Derived counts for the displayed week
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekStats {
    pub total: usize,
    pub planned_or_in_progress: usize,
    pub done: usize,
    /// `total / (technician_count * days_per_week)` as a percentage.
    pub occupancy_rate: f64,
    pub technician_count: usize,
    pub per_technician: Vec<TechnicianLoad>,
}

impl WeekStats {
    /// Occupancy formatted with one decimal, e.g. `"21.4%"`.
    pub fn occupancy_label(&self) -> String {
        format!("{:.1}%", self.occupancy_rate)
    }
}
