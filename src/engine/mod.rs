//! Batch engine module
//!
//! Runs aggregation and the partitioned write for each requested feed kind.
//!
//! # Overview
//!
//! The engine module provides:
//! - `IngestEngine` - Drives one batch run from an [`IngestConfig`]
//! - `BatchSummary` / `KindSummary` - What each kind produced
//!
//! Kinds are processed independently: an error in one is logged and
//! recorded, and the next kind still runs. Only an unusable input root
//! fails the run as a whole.

mod types;

pub use types::{BatchSummary, KindSummary};

use crate::aggregate::SnapshotAggregator;
use crate::config::IngestConfig;
use crate::error::{Error, Result};
use crate::normalize::FeedTable;
use crate::output::{table_to_batch, write_batch_to_jsonl, ParquetWriterConfig};
use crate::partition::{write_partitioned, PartitionWriteOptions, INSPECT_DIR};
use crate::types::FeedKind;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

/// Batch engine for one configured run
#[derive(Debug)]
pub struct IngestEngine {
    config: IngestConfig,
    aggregator: SnapshotAggregator,
    write_options: PartitionWriteOptions,
}

impl IngestEngine {
    /// Create an engine from a validated config
    pub fn new(config: IngestConfig) -> Result<Self> {
        config.validate()?;

        let aggregator =
            SnapshotAggregator::new(config.metadata_parser()?).with_parallel(config.parallel);
        let write_options = PartitionWriteOptions::new()
            .with_agency_filter(config.agency_filter().map(str::to_string))
            .with_parallel(config.parallel)
            .with_parquet(ParquetWriterConfig::from(&config.parquet));

        Ok(Self {
            config,
            aggregator,
            write_options,
        })
    }

    /// Get the config
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Process every requested feed kind
    pub fn run(&self) -> Result<BatchSummary> {
        let start = Instant::now();
        let input = &self.config.input_dir;
        if !input.is_dir() {
            return Err(Error::config(format!(
                "Input directory '{}' does not exist or is not a directory",
                input.display()
            )));
        }

        info!(
            input = %input.display(),
            output = %self.config.output_dir.display(),
            feeds = ?self.config.feeds,
            agency_filter = ?self.config.agency_filter(),
            "Starting batch run"
        );

        let mut summary = BatchSummary::new();
        for kind in self.config.feeds.kinds() {
            let kind_summary = match self.run_kind(kind) {
                Ok(s) => s,
                Err(e) => {
                    error!(kind = %kind, error = %e, "Feed kind failed");
                    KindSummary::failed(kind, e.to_string())
                }
            };
            summary.kinds.push(kind_summary);
        }

        summary.set_duration(start.elapsed().as_millis() as u64);
        info!(
            partitions = summary.partitions_written(),
            rows = summary.rows_written(),
            duration_ms = summary.duration_ms,
            "Batch run finished"
        );
        Ok(summary)
    }

    /// Aggregate, optionally inspect, and write one feed kind
    #[tracing::instrument(skip_all, fields(kind = %kind))]
    pub fn run_kind(&self, kind: FeedKind) -> Result<KindSummary> {
        let aggregation = self.aggregator.aggregate(&self.config.input_dir, kind)?;

        if aggregation.table.is_empty() {
            warn!(kind = %kind, "No rows to write");
        }

        let inspect_path = if self.config.inspect {
            self.write_inspection(&aggregation.table)
        } else {
            None
        };

        let report = write_partitioned(
            aggregation.table,
            &self.config.output_dir,
            &self.write_options,
        );

        Ok(KindSummary::completed(
            kind,
            aggregation.report,
            &report,
            inspect_path,
        ))
    }

    /// Render the (agency-filtered) table as JSON Lines; failures are logged
    fn write_inspection(&self, table: &FeedTable) -> Option<PathBuf> {
        let kind = table.kind();
        let path = self
            .config
            .output_dir
            .join(INSPECT_DIR)
            .join(format!("{kind}.jsonl"));

        let view = match self.config.agency_filter() {
            Some(agency) => table.clone().retain_agency(agency),
            None => table.clone(),
        };

        match table_to_batch(&view).and_then(|batch| write_batch_to_jsonl(&path, &batch)) {
            Ok(rows) => {
                info!(kind = %kind, rows, path = %path.display(), "Wrote inspection output");
                Some(path)
            }
            Err(e) => {
                warn!(kind = %kind, error = %e, "Failed to write inspection output");
                None
            }
        }
    }
}
