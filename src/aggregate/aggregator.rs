//! Snapshot discovery and concatenation

use super::types::{AggregateReport, Aggregation, DiscoveredSnapshot};
use crate::error::{Error, Result};
use crate::metadata::MetadataParser;
use crate::normalize::{load_snapshot, FeedTable, SnapshotOutcome};
use crate::types::FeedKind;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Aggregate every snapshot of `kind` under `root` with default settings
pub fn aggregate_snapshots(root: &Path, kind: FeedKind) -> Result<Aggregation> {
    SnapshotAggregator::default().aggregate(root, kind)
}

/// Builds the unified table for one feed kind
#[derive(Debug, Clone, Default)]
pub struct SnapshotAggregator {
    parser: MetadataParser,
    parallel: bool,
}

impl SnapshotAggregator {
    /// Create an aggregator using the given filename parser
    pub fn new(parser: MetadataParser) -> Self {
        Self {
            parser,
            parallel: false,
        }
    }

    /// Normalize files on the rayon pool
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Recursively find snapshot files of `kind`, ordered by capture time
    ///
    /// Walked paths are sorted by file name first, so ties on capture time
    /// resolve the same way on every run. Returns the ordered snapshots and
    /// the number of candidates whose names failed to parse.
    pub fn discover(&self, root: &Path, kind: FeedKind) -> Result<(Vec<DiscoveredSnapshot>, usize)> {
        check_root(root)?;

        let mut candidates: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| self.parser.matches_kind(name, kind))
            })
            .map(walkdir::DirEntry::into_path)
            .collect();
        candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));

        let mut skipped = 0;
        let mut snapshots = Vec::with_capacity(candidates.len());
        for path in candidates {
            match self.parser.parse_path(&path) {
                Ok(metadata) => snapshots.push(DiscoveredSnapshot { path, metadata }),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping snapshot with unparsable name");
                    skipped += 1;
                }
            }
        }

        // stable: equal timestamps keep file-name order
        snapshots.sort_by_key(|s| s.metadata.snapshot_ts);
        Ok((snapshots, skipped))
    }

    /// Discover, normalize and concatenate every snapshot of `kind`
    ///
    /// Only an unusable `root` is an error; per-file problems are logged
    /// and counted in the report.
    pub fn aggregate(&self, root: &Path, kind: FeedKind) -> Result<Aggregation> {
        let (snapshots, skipped_metadata) = self.discover(root, kind)?;
        let discovered = snapshots.len() + skipped_metadata;
        debug!(
            kind = %kind,
            root = %root.display(),
            discovered,
            parallel = self.parallel,
            "Loading snapshots"
        );

        let load = |s: DiscoveredSnapshot| load_snapshot(&s.path, s.metadata);
        // indexed collect keeps capture-time order under rayon
        let outcomes: Vec<SnapshotOutcome> = if self.parallel {
            snapshots.into_par_iter().map(load).collect()
        } else {
            snapshots.into_iter().map(load).collect()
        };

        let mut report = AggregateReport {
            discovered,
            skipped_metadata,
            ..AggregateReport::default()
        };
        let mut tables = Vec::with_capacity(outcomes.len());

        for outcome in outcomes {
            match outcome {
                SnapshotOutcome::Failed { path, error, .. } => {
                    warn!(path = %path.display(), "Skipping snapshot that failed to load");
                    debug!(path = %path.display(), error = ?error, "Snapshot load error detail");
                    report.failed += 1;
                }
                SnapshotOutcome::Loaded { table, .. } if table.is_empty() => {
                    report.empty += 1;
                }
                SnapshotOutcome::Loaded { table, .. } => {
                    report.contributing += 1;
                    tables.push(table);
                }
            }
        }

        let table = FeedTable::concat(kind, tables)?;
        report.rows = table.len();

        info!(
            kind = %kind,
            files = report.discovered,
            contributing = report.contributing,
            failed = report.failed,
            skipped = report.skipped_metadata,
            rows = report.rows,
            "Aggregated snapshots"
        );

        Ok(Aggregation { table, report })
    }
}

fn check_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(Error::FileNotFound {
            path: root.display().to_string(),
        });
    }
    if !root.is_dir() {
        return Err(Error::Other(format!(
            "Input root is not a directory: {}",
            root.display()
        )));
    }
    Ok(())
}
