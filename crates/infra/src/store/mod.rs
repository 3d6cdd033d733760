//! Schedule store adapters

pub mod memory;

pub use memory::InMemoryScheduleStore;
