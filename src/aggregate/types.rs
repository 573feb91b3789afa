//! Aggregation types

use crate::metadata::SnapshotMetadata;
use crate::normalize::FeedTable;
use serde::Serialize;
use std::path::PathBuf;

/// A discovered snapshot file with its parsed metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredSnapshot {
    pub path: PathBuf,
    pub metadata: SnapshotMetadata,
}

/// File counts for one aggregation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateReport {
    /// Files matching the kind's name pattern
    pub discovered: usize,
    /// Files whose names failed metadata parsing
    pub skipped_metadata: usize,
    /// Files that failed to read, decode or normalize
    pub failed: usize,
    /// Files that normalized to zero rows
    pub empty: usize,
    /// Files contributing at least one row
    pub contributing: usize,
    /// Total rows in the unified table
    pub rows: usize,
}

/// Unified table for one feed kind plus per-file counts
#[derive(Debug)]
pub struct Aggregation {
    pub table: FeedTable,
    pub report: AggregateReport,
}
