//! Calendar integration
//!
//! Publishes interventions to a REST calendar service shaped like the Google
//! Calendar v3 events API (`/calendars/{calendarId}/events[/{eventId}]`).

pub mod gateway;
pub mod types;

pub use gateway::HttpCalendarGateway;
pub use types::{EventBody, EventTime, ExtendedProperties, RemoteEvent};
