//! # FieldPlan Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Configuration loading (environment, JSON, TOML)
//! - Tracing subscriber setup
//! - HTTP client with retries
//! - The REST calendar gateway
//! - An in-memory schedule store
//!
//! ## Architecture
//! - Implements traits defined in `fieldplan-core`
//! - Contains all "impure" code (I/O, environment, network)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;
pub mod store;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::calendar::HttpCalendarGateway;
pub use observability::init_tracing;
pub use store::InMemoryScheduleStore;
