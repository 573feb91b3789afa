//! Filename pattern matching

use super::types::{SnapshotMetadata, UNRESOLVED_AGENCY};
use crate::error::{Error, Result};
use crate::types::FeedKind;
use chrono::NaiveDateTime;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Default filename prefix
pub const DEFAULT_PREFIX: &str = "gtfs_rt";

/// Default snapshot file extension
pub const DEFAULT_EXTENSION: &str = "json";

/// Timestamp layout embedded in filenames
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

static DEFAULT_PARSER: LazyLock<MetadataParser> =
    LazyLock::new(|| MetadataParser::new(DEFAULT_PREFIX, DEFAULT_EXTENSION).unwrap());

/// Parse snapshot metadata using the default `gtfs_rt_*.json` conventions
pub fn parse_metadata(name: &str) -> Result<SnapshotMetadata> {
    DEFAULT_PARSER.parse(name)
}

/// Matches snapshot filenames for one prefix/extension convention
#[derive(Debug, Clone)]
pub struct MetadataParser {
    prefix: String,
    extension: String,
    /// `prefix_{kind}_{agency}_{YYYYMMDD_HHMMSS}.ext`
    with_agency: Regex,
    /// `prefix_{kind}_{YYYYMMDD_HHMMSS}.ext`
    without_agency: Regex,
}

impl Default for MetadataParser {
    fn default() -> Self {
        DEFAULT_PARSER.clone()
    }
}

impl MetadataParser {
    /// Compile the filename patterns for a prefix and extension
    pub fn new(prefix: &str, extension: &str) -> Result<Self> {
        if prefix.is_empty() {
            return Err(Error::invalid_value("file_prefix", "cannot be empty"));
        }
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(Error::invalid_value("file_extension", "cannot be empty"));
        }

        let p = regex::escape(prefix);
        let ext = regex::escape(extension);
        let kinds = "trip_updates|vehicle_positions";
        let ts = "[0-9]{8}_[0-9]{6}";

        let with_agency = Regex::new(&format!(
            r"^{p}_(?P<kind>{kinds})_(?P<agency>.+?)_(?P<ts>{ts})\.{ext}$"
        ))
        .map_err(|e| Error::config(format!("Invalid filename pattern: {e}")))?;
        let without_agency = Regex::new(&format!(r"^{p}_(?P<kind>{kinds})_(?P<ts>{ts})\.{ext}$"))
            .map_err(|e| Error::config(format!("Invalid filename pattern: {e}")))?;

        Ok(Self {
            prefix: prefix.to_string(),
            extension: extension.to_string(),
            with_agency,
            without_agency,
        })
    }

    /// Filename prefix this parser matches
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// File extension this parser matches (without the dot)
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Whether a filename looks like a snapshot of `kind`
    ///
    /// Equivalent to the glob `{prefix}_{kind}_*.{ext}`. A name passing this
    /// check can still fail [`MetadataParser::parse`].
    pub fn matches_kind(&self, name: &str, kind: FeedKind) -> bool {
        let head = format!("{}_{}_", self.prefix, kind.as_str());
        let tail = format!(".{}", self.extension);
        name.len() >= head.len() + tail.len() && name.starts_with(&head) && name.ends_with(&tail)
    }

    /// Parse metadata from a bare filename
    pub fn parse(&self, name: &str) -> Result<SnapshotMetadata> {
        let (kind, agency, ts) = if let Some(caps) = self.with_agency.captures(name) {
            (
                caps["kind"].to_string(),
                caps["agency"].to_string(),
                caps["ts"].to_string(),
            )
        } else if let Some(caps) = self.without_agency.captures(name) {
            (
                caps["kind"].to_string(),
                UNRESOLVED_AGENCY.to_string(),
                caps["ts"].to_string(),
            )
        } else {
            return Err(Error::metadata(
                name,
                "does not match the expected snapshot pattern",
            ));
        };

        let feed_kind: FeedKind = kind.parse()?;
        let snapshot_ts = NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT)
            .map_err(|e| Error::metadata(name, format!("invalid timestamp '{ts}': {e}")))?;

        Ok(SnapshotMetadata::new(agency, feed_kind, snapshot_ts))
    }

    /// Parse metadata from the final component of a path
    pub fn parse_path(&self, path: &Path) -> Result<SnapshotMetadata> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::metadata(path.display().to_string(), "no UTF-8 file name"))?;
        self.parse(name)
    }
}
