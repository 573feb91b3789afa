//! Snapshot aggregation module
//!
//! Discovers the snapshot files of one feed kind under a directory tree,
//! orders them by capture time and concatenates their normalized rows.
//!
//! # Overview
//!
//! - Names that fail metadata parsing are skipped with a warning.
//! - Files that fail to read, decode or normalize contribute nothing.
//! - The unified table lists rows file by file in ascending capture time,
//!   also when files are normalized in parallel.

mod aggregator;
mod types;

pub use aggregator::{aggregate_snapshots, SnapshotAggregator};
pub use types::{AggregateReport, Aggregation, DiscoveredSnapshot};

#[cfg(test)]
mod tests;
