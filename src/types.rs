//! Common types used throughout the ingester
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Feed Kind
// ============================================================================

/// One of the two recognized real-time data categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    /// `TripUpdate` messages
    TripUpdates,
    /// `VehiclePosition` messages
    VehiclePositions,
}

impl FeedKind {
    /// Both kinds, in processing order
    pub const ALL: [FeedKind; 2] = [FeedKind::TripUpdates, FeedKind::VehiclePositions];

    /// Literal used in filenames, flat-list keys and output directories
    pub fn as_str(self) -> &'static str {
        match self {
            FeedKind::TripUpdates => "trip_updates",
            FeedKind::VehiclePositions => "vehicle_positions",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trip_updates" => Ok(FeedKind::TripUpdates),
            "vehicle_positions" => Ok(FeedKind::VehiclePositions),
            other => Err(crate::Error::invalid_value(
                "feed_kind",
                format!("unknown feed kind '{other}'"),
            )),
        }
    }
}

// ============================================================================
// Feed Selector
// ============================================================================

/// Which feed kinds a batch run processes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum FeedSelector {
    /// Trip updates only
    TripUpdates,
    /// Vehicle positions only
    VehiclePositions,
    /// Trip updates, then vehicle positions
    #[default]
    Both,
}

impl FeedSelector {
    /// Expand into the kinds to process, in order
    pub fn kinds(self) -> Vec<FeedKind> {
        match self {
            FeedSelector::TripUpdates => vec![FeedKind::TripUpdates],
            FeedSelector::VehiclePositions => vec![FeedKind::VehiclePositions],
            FeedSelector::Both => FeedKind::ALL.to_vec(),
        }
    }
}

// ============================================================================
// Compression
// ============================================================================

/// Parquet compression codec, uniform across partitions
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    #[default]
    Zstd,
    Snappy,
    Gzip,
    None,
}

impl From<CompressionCodec> for parquet::basic::Compression {
    fn from(codec: CompressionCodec) -> Self {
        use parquet::basic::{Compression, GzipLevel, ZstdLevel};

        match codec {
            CompressionCodec::Zstd => Compression::ZSTD(ZstdLevel::default()),
            CompressionCodec::Snappy => Compression::SNAPPY,
            CompressionCodec::Gzip => Compression::GZIP(GzipLevel::default()),
            CompressionCodec::None => Compression::UNCOMPRESSED,
        }
    }
}

// ============================================================================
// Log Level
// ============================================================================

/// Log level for the batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}
