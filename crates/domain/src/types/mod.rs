//! Domain types
//!
//! - [`intervention`]: interventions, details, time windows
//! - [`status`]: the intervention status machine
//! - [`technician`]: roster entries
//! - [`week`]: week ranges, week sets, filters
//! - [`stats`]: week statistics
//! - [`calendar`]: the payload mirrored into the external calendar

pub mod calendar;
pub mod intervention;
pub mod stats;
pub mod status;
pub mod technician;
pub mod week;

pub use calendar::CalendarEventPayload;
pub use intervention::{
    hours_to_duration, Intervention, InterventionDetails, InterventionId, TimeWindow,
};
pub use stats::{TechnicianLoad, WeekStats};
pub use status::InterventionStatus;
pub use technician::{AvailabilityStatus, Technician, TechnicianId};
pub use week::{WeekFilter, WeekRange, WeekSet};
