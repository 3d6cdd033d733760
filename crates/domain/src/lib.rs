//! # FieldPlan Domain
//!
//! Business domain types for field-service intervention scheduling.
//!
//! This crate contains:
//! - Interventions, technicians, week ranges and week sets
//! - The intervention status machine
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other FieldPlan crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
