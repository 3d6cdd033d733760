//! Week-level statistics

pub mod aggregator;

pub use aggregator::StatisticsAggregator;
