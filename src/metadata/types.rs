//! Snapshot metadata types

use crate::types::FeedKind;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Agency placeholder for filenames without an agency segment
pub const UNRESOLVED_AGENCY: &str = "unknown";

/// Metadata derived from a snapshot filename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Agency label, or [`UNRESOLVED_AGENCY`]
    pub agency: String,
    /// Feed kind encoded in the filename
    pub feed_kind: FeedKind,
    /// Capture time
    pub snapshot_ts: NaiveDateTime,
    /// `YYYYMMDD` portion of the capture time
    pub date_key: String,
}

impl SnapshotMetadata {
    /// Build metadata from its parts, deriving the date key
    pub fn new(agency: impl Into<String>, feed_kind: FeedKind, snapshot_ts: NaiveDateTime) -> Self {
        Self {
            agency: agency.into(),
            feed_kind,
            snapshot_ts,
            date_key: snapshot_ts.format("%Y%m%d").to_string(),
        }
    }

    /// Whether the filename carried no agency
    pub fn is_unresolved(&self) -> bool {
        self.agency == UNRESOLVED_AGENCY
    }

    /// Return a copy with the agency replaced
    #[must_use]
    pub fn with_agency(self, agency: impl Into<String>) -> Self {
        Self {
            agency: agency.into(),
            ..self
        }
    }
}
