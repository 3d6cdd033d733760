//! Week planning: the engine, conflict detection and the store port.

pub mod conflicts;
pub mod engine;
pub mod ports;

pub use engine::{EngineNotice, PlanningEngine};
pub use ports::ScheduleStore;
