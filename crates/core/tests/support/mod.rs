//! Shared test helpers for `fieldplan-core` integration tests.
//!
//! These helpers provide in-memory ports and fixtures so that engine and sync
//! tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod gateway;
pub mod store;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fieldplan_domain::{AvailabilityStatus, InterventionDetails, Technician};

/// Monday of the week most fixtures live in.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

/// Timestamp on the fixture Monday.
pub fn monday_at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, hour, minute, 0).unwrap()
}

/// Timestamp on a given day of March 2024.
pub fn march(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

pub fn details(client: &str) -> InterventionDetails {
    InterventionDetails::new(client, "maintenance")
}

/// Two active technicians and one on leave.
pub fn roster() -> Vec<Technician> {
    vec![
        Technician::new(1, "Alice Martin"),
        Technician::new(2, "Bruno Keller"),
        Technician::new(3, "Chloé Weber").with_availability(AvailabilityStatus::OnLeave),
    ]
}
