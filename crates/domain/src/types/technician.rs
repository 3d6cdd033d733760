//! Technician roster entries

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Store-assigned technician identifier
pub type TechnicianId = i64;

/// Whether a technician can receive new assignments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    #[default]
    Active,
    OnLeave,
    Unavailable,
    Inactive,
}

impl_domain_status_conversions!(AvailabilityStatus {
    Active => "active",
    OnLeave => "on_leave",
    Unavailable => "unavailable",
    Inactive => "inactive",
});

/// Technician record, read-only from the scheduler's point of view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    pub id: TechnicianId,
    pub name: String,
    #[serde(default)]
    pub availability_status: AvailabilityStatus,
}

impl Technician {
    pub fn new(id: TechnicianId, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), availability_status: AvailabilityStatus::Active }
    }

    pub fn with_availability(mut self, status: AvailabilityStatus) -> Self {
        self.availability_status = status;
        self
    }

    pub fn is_assignable(&self) -> bool {
        self.availability_status == AvailabilityStatus::Active
    }
}
