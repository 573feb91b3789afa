//! Normalized record and table types

use crate::error::{Error, Result};
use crate::types::FeedKind;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Access to the partitioning key shared by every record kind
pub trait FeedRecord {
    /// Name of the snapshot file the record came from
    fn snapshot_file(&self) -> &str;
    /// Capture time from the file name
    fn snapshot_ts(&self) -> NaiveDateTime;
    /// Agency label (never null)
    fn agency(&self) -> &str;
    /// `YYYYMMDD` capture date (never null)
    fn date_key(&self) -> &str;
}

/// One normalized `TripUpdate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripUpdateRecord {
    pub snapshot_file: String,
    pub snapshot_ts: NaiveDateTime,
    pub date_key: String,
    pub agency: String,
    pub entity_id: Option<String>,
    pub trip_id: Option<String>,
    pub route_id: Option<String>,
    pub direction_id: Option<i64>,
    pub start_time: Option<String>,
    pub start_date: Option<String>,
    pub vehicle_id: Option<String>,
    /// `TripUpdate.timestamp`
    pub timestamp: Option<i64>,
    /// `TripUpdate.delay`, seconds
    pub delay: Option<i64>,
}

/// One normalized `VehiclePosition`
///
/// Position fields stay `None` when the snapshot had no `position` block;
/// the sighting is kept regardless.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehiclePositionRecord {
    pub snapshot_file: String,
    pub snapshot_ts: NaiveDateTime,
    pub date_key: String,
    pub agency: String,
    pub entity_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub trip_id: Option<String>,
    pub route_id: Option<String>,
    pub direction_id: Option<i64>,
    pub start_time: Option<String>,
    pub start_date: Option<String>,
    pub current_stop_sequence: Option<i64>,
    pub current_status: Option<String>,
    /// `VehiclePosition.timestamp`
    pub timestamp: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bearing: Option<f64>,
    pub speed: Option<f64>,
}

macro_rules! impl_feed_record {
    ($($ty:ty),*) => {
        $(impl FeedRecord for $ty {
            fn snapshot_file(&self) -> &str {
                &self.snapshot_file
            }

            fn snapshot_ts(&self) -> NaiveDateTime {
                self.snapshot_ts
            }

            fn agency(&self) -> &str {
                &self.agency
            }

            fn date_key(&self) -> &str {
                &self.date_key
            }
        })*
    };
}

impl_feed_record!(TripUpdateRecord, VehiclePositionRecord);

/// Ordered rows of a single feed kind
///
/// Concatenation is associative, so tables built per file can be combined
/// in any grouping as long as file order is kept.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedTable {
    TripUpdates(Vec<TripUpdateRecord>),
    VehiclePositions(Vec<VehiclePositionRecord>),
}

impl FeedTable {
    /// The canonical empty table for a kind
    pub fn empty(kind: FeedKind) -> Self {
        match kind {
            FeedKind::TripUpdates => FeedTable::TripUpdates(Vec::new()),
            FeedKind::VehiclePositions => FeedTable::VehiclePositions(Vec::new()),
        }
    }

    /// Feed kind of the rows
    pub fn kind(&self) -> FeedKind {
        match self {
            FeedTable::TripUpdates(_) => FeedKind::TripUpdates,
            FeedTable::VehiclePositions(_) => FeedKind::VehiclePositions,
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        match self {
            FeedTable::TripUpdates(rows) => rows.len(),
            FeedTable::VehiclePositions(rows) => rows.len(),
        }
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append another table's rows after this table's rows
    pub fn append(&mut self, other: FeedTable) -> Result<()> {
        match (self, other) {
            (FeedTable::TripUpdates(rows), FeedTable::TripUpdates(more)) => rows.extend(more),
            (FeedTable::VehiclePositions(rows), FeedTable::VehiclePositions(more)) => {
                rows.extend(more);
            }
            (this, other) => {
                return Err(Error::KindMismatch {
                    expected: this.kind(),
                    found: other.kind(),
                })
            }
        }
        Ok(())
    }

    /// Concatenate tables in order
    ///
    /// Returns the canonical empty table when `tables` yields nothing.
    pub fn concat(kind: FeedKind, tables: impl IntoIterator<Item = FeedTable>) -> Result<Self> {
        let mut combined = FeedTable::empty(kind);
        for table in tables {
            combined.append(table)?;
        }
        Ok(combined)
    }

    /// Keep only rows whose agency matches
    #[must_use]
    pub fn retain_agency(self, agency: &str) -> Self {
        match self {
            FeedTable::TripUpdates(mut rows) => {
                rows.retain(|r| r.agency == agency);
                FeedTable::TripUpdates(rows)
            }
            FeedTable::VehiclePositions(mut rows) => {
                rows.retain(|r| r.agency == agency);
                FeedTable::VehiclePositions(rows)
            }
        }
    }

    /// Snapshot files contributing rows, in row order
    ///
    /// Consecutive rows from the same file collapse into one entry.
    pub fn snapshot_files(&self) -> Vec<&str> {
        fn distinct<R: FeedRecord>(rows: &[R]) -> Vec<&str> {
            let mut files: Vec<&str> = Vec::new();
            for row in rows {
                if files.last() != Some(&row.snapshot_file()) {
                    files.push(row.snapshot_file());
                }
            }
            files
        }

        match self {
            FeedTable::TripUpdates(rows) => distinct(rows),
            FeedTable::VehiclePositions(rows) => distinct(rows),
        }
    }
}
