//! Per-snapshot normalization

use super::types::FeedTable;
use super::{trip_updates, vehicle_positions};
use crate::decode::{read_feed, FeedShape};
use crate::error::{Error, Result};
use crate::infer::infer_agency;
use crate::metadata::SnapshotMetadata;
use crate::types::FeedKind;
use chrono::NaiveDateTime;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key fields stamped onto every row of one snapshot
#[derive(Debug, Clone, Copy)]
pub(crate) struct RowContext<'a> {
    snapshot_file: &'a str,
    metadata: &'a SnapshotMetadata,
}

impl RowContext<'_> {
    pub(crate) fn snapshot_file(&self) -> String {
        self.snapshot_file.to_string()
    }

    pub(crate) fn snapshot_ts(&self) -> NaiveDateTime {
        self.metadata.snapshot_ts
    }

    pub(crate) fn date_key(&self) -> String {
        self.metadata.date_key.clone()
    }

    pub(crate) fn agency(&self) -> String {
        self.metadata.agency.clone()
    }
}

/// Replace an unresolved agency with one inferred from feed content
///
/// A filename agency is never overridden. When inference finds nothing the
/// unresolved sentinel is kept.
pub fn resolve_agency(metadata: SnapshotMetadata, feed: &Value) -> SnapshotMetadata {
    if !metadata.is_unresolved() {
        return metadata;
    }
    match infer_agency(feed) {
        Some(agency) => {
            debug!(agency = %agency, "Inferred agency from feed content");
            metadata.with_agency(agency)
        }
        None => metadata,
    }
}

/// Normalize a decoded feed into rows of the metadata's feed kind
///
/// `snapshot_file` is the bare file name recorded on every row. The
/// metadata agency is used as-is; see [`resolve_agency`].
pub fn normalize_feed(
    feed: &Value,
    metadata: &SnapshotMetadata,
    snapshot_file: &str,
) -> Result<FeedTable> {
    let kind = metadata.feed_kind;
    let shape = FeedShape::detect(feed, kind)?;
    debug!(
        file = snapshot_file,
        flat = shape.is_flat(),
        items = shape.items().len(),
        "Resolved feed shape"
    );

    let ctx = RowContext {
        snapshot_file,
        metadata,
    };

    Ok(match kind {
        FeedKind::TripUpdates => FeedTable::TripUpdates(trip_updates::normalize(shape, &ctx)?),
        FeedKind::VehiclePositions => {
            FeedTable::VehiclePositions(vehicle_positions::normalize(shape, &ctx)?)
        }
    })
}

/// Result of processing one snapshot file
///
/// Failures stay inside the outcome; callers decide how to report them.
#[derive(Debug)]
pub enum SnapshotOutcome {
    /// The file was read and normalized (possibly to zero rows)
    Loaded {
        path: PathBuf,
        metadata: SnapshotMetadata,
        table: FeedTable,
    },
    /// Reading, decoding or normalizing the file failed
    Failed {
        path: PathBuf,
        metadata: SnapshotMetadata,
        error: Error,
    },
}

impl SnapshotOutcome {
    /// Path of the processed file
    pub fn path(&self) -> &Path {
        match self {
            SnapshotOutcome::Loaded { path, .. } | SnapshotOutcome::Failed { path, .. } => path,
        }
    }

    /// Metadata the rows were tagged with (agency resolved when loaded)
    pub fn metadata(&self) -> &SnapshotMetadata {
        match self {
            SnapshotOutcome::Loaded { metadata, .. } | SnapshotOutcome::Failed { metadata, .. } => {
                metadata
            }
        }
    }

    /// Whether processing failed
    pub fn is_failed(&self) -> bool {
        matches!(self, SnapshotOutcome::Failed { .. })
    }

    /// The file's rows; a failed file contributes the empty table
    pub fn into_table(self) -> FeedTable {
        match self {
            SnapshotOutcome::Loaded { table, .. } => table,
            SnapshotOutcome::Failed { metadata, .. } => FeedTable::empty(metadata.feed_kind),
        }
    }
}

/// Read, decode and normalize one snapshot file
///
/// Never fails: read, decode and normalization errors are captured in
/// [`SnapshotOutcome::Failed`].
pub fn load_snapshot(path: &Path, metadata: SnapshotMetadata) -> SnapshotOutcome {
    let feed = match read_feed(path) {
        Ok(feed) => feed,
        Err(error) => {
            return SnapshotOutcome::Failed {
                path: path.to_path_buf(),
                metadata,
                error,
            }
        }
    };

    let metadata = resolve_agency(metadata, &feed);
    let snapshot_file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match normalize_feed(&feed, &metadata, &snapshot_file) {
        Ok(table) => SnapshotOutcome::Loaded {
            path: path.to_path_buf(),
            metadata,
            table,
        },
        Err(error) => SnapshotOutcome::Failed {
            path: path.to_path_buf(),
            metadata,
            error,
        },
    }
}
