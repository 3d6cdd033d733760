//! # FieldPlan Core
//!
//! Pure scheduling logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces ([`ScheduleStore`], [`CalendarGateway`])
//! - The [`PlanningEngine`] owning the displayed week
//! - The [`SyncCoordinator`] mirroring local changes into a calendar
//! - The [`StatisticsAggregator`]
//!
//! ## Architecture Principles
//! - Only depends on `fieldplan-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits, injected at construction

pub mod planning;
pub mod stats;
pub mod sync;

pub use planning::{EngineNotice, PlanningEngine, ScheduleStore};
pub use stats::StatisticsAggregator;
pub use sync::{CalendarGateway, SyncAction, SyncCoordinator, SyncOutcome, SyncReport, SyncReports};
