//! Partition types
//!
//! Defines the partition key, write options and the per-partition report.

use crate::error::Error;
use crate::normalize::FeedRecord;
use crate::output::ParquetWriterConfig;
use std::fmt;
use std::path::PathBuf;

/// Output partition key: one file per (agency, date)
///
/// Orders by agency, then date key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionKey {
    /// Agency label
    pub agency: String,
    /// `YYYYMMDD` capture date
    pub date_key: String,
}

impl PartitionKey {
    /// Create a new partition key
    pub fn new(agency: impl Into<String>, date_key: impl Into<String>) -> Self {
        Self {
            agency: agency.into(),
            date_key: date_key.into(),
        }
    }

    /// Key of the partition a record belongs to
    pub fn of<R: FeedRecord>(record: &R) -> Self {
        Self::new(record.agency(), record.date_key())
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.agency, self.date_key)
    }
}

/// Options for a partitioned write
#[derive(Debug, Clone, Default)]
pub struct PartitionWriteOptions {
    /// Only write partitions of exactly this agency
    pub agency_filter: Option<String>,
    /// Write partitions on the rayon pool
    pub parallel: bool,
    /// Parquet settings shared by every partition
    pub parquet: ParquetWriterConfig,
}

impl PartitionWriteOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict writing to one agency; an empty name means no filter
    #[must_use]
    pub fn with_agency_filter(mut self, agency: Option<String>) -> Self {
        self.agency_filter = agency.filter(|a| !a.is_empty());
        self
    }

    /// Enable parallel partition writes
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set Parquet writer settings
    #[must_use]
    pub fn with_parquet(mut self, parquet: ParquetWriterConfig) -> Self {
        self.parquet = parquet;
        self
    }
}

/// A partition file that was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPartition {
    pub key: PartitionKey,
    pub path: PathBuf,
    pub rows: usize,
}

/// A partition that could not be written
#[derive(Debug)]
pub struct FailedPartition {
    pub key: PartitionKey,
    pub error: Error,
}

/// Outcome of a partitioned write, ordered by partition key
#[derive(Debug, Default)]
pub struct WriteReport {
    /// Partitions persisted successfully
    pub written: Vec<WrittenPartition>,
    /// Partitions abandoned after an error
    pub failed: Vec<FailedPartition>,
}

impl WriteReport {
    /// Total rows across written partitions
    pub fn rows_written(&self) -> usize {
        self.written.iter().map(|p| p.rows).sum()
    }

    /// Whether every partition was written
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
