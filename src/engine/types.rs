//! Engine types
//!
//! Summaries reported by a batch run.

use crate::aggregate::AggregateReport;
use crate::partition::WriteReport;
use crate::types::FeedKind;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of processing one feed kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindSummary {
    /// Feed kind processed
    pub kind: FeedKind,
    /// Per-file counts from aggregation
    pub aggregate: AggregateReport,
    /// Partition files written
    pub partitions_written: usize,
    /// Partitions abandoned after a write error
    pub partitions_failed: usize,
    /// Rows persisted across written partitions
    pub rows_written: usize,
    /// JSON Lines rendering, when inspection was requested and succeeded
    pub inspect_path: Option<PathBuf>,
    /// Error that stopped this kind, if any
    pub error: Option<String>,
}

impl KindSummary {
    /// Summary for a kind that aggregated and wrote
    pub fn completed(
        kind: FeedKind,
        aggregate: AggregateReport,
        report: &WriteReport,
        inspect_path: Option<PathBuf>,
    ) -> Self {
        Self {
            kind,
            aggregate,
            partitions_written: report.written.len(),
            partitions_failed: report.failed.len(),
            rows_written: report.rows_written(),
            inspect_path,
            error: None,
        }
    }

    /// Summary for a kind that stopped early
    pub fn failed(kind: FeedKind, error: impl Into<String>) -> Self {
        Self {
            kind,
            aggregate: AggregateReport::default(),
            partitions_written: 0,
            partitions_failed: 0,
            rows_written: 0,
            inspect_path: None,
            error: Some(error.into()),
        }
    }

    /// Whether anything in this kind went wrong
    pub fn has_failures(&self) -> bool {
        self.error.is_some() || self.partitions_failed > 0 || self.aggregate.failed > 0
    }
}

/// Statistics from a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    /// One entry per processed kind, in processing order
    pub kinds: Vec<KindSummary>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl BatchSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Summary for a kind, if it was processed
    pub fn kind(&self, kind: FeedKind) -> Option<&KindSummary> {
        self.kinds.iter().find(|k| k.kind == kind)
    }

    /// Partition files written across kinds
    pub fn partitions_written(&self) -> usize {
        self.kinds.iter().map(|k| k.partitions_written).sum()
    }

    /// Rows persisted across kinds
    pub fn rows_written(&self) -> usize {
        self.kinds.iter().map(|k| k.rows_written).sum()
    }

    /// Whether any kind reported a failure
    pub fn has_failures(&self) -> bool {
        self.kinds.iter().any(KindSummary::has_failures)
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
