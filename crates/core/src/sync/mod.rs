//! Calendar synchronization: the gateway port, the coordinator and its
//! completion reports.

pub mod coordinator;
pub mod ports;
pub mod report;

pub use coordinator::{SyncCoordinator, SyncReports};
pub use ports::CalendarGateway;
pub use report::{SyncAction, SyncOutcome, SyncReport};
