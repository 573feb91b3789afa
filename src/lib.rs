// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # GTFS-RT Bronze
//!
//! Batch normalizer that turns GTFS-Realtime JSON snapshots into
//! agency/date partitioned Parquet files.
//!
//! ## Features
//!
//! - **Filename metadata**: agency, feed kind and capture time from
//!   `gtfs_rt_{kind}[_{agency}]_{YYYYMMDD_HHMMSS}.json`
//! - **Agency inference**: recovers the agency from vehicle ids when the
//!   filename omits it
//! - **Two input shapes**: flat record lists and the GTFS-RT entity wrapper
//! - **Fault isolation**: bad files and failed partitions are logged and
//!   skipped, never fatal to the batch
//! - **Arrow Output**: fixed schemas per feed kind, Parquet with
//!   configurable compression
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gtfsrt_bronze::{IngestConfig, IngestEngine, Result};
//!
//! fn main() -> Result<()> {
//!     let config = IngestConfig::from_yaml_str("input_dir: ./data/raw\nparallel: true")?;
//!     let summary = IngestEngine::new(config)?.run()?;
//!     println!("wrote {} rows", summary.rows_written());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       IngestEngine::run                         │
//! │        for each feed kind: aggregate → inspect? → write         │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │ Metadata │  Decode   │   Normalize   │ Aggregate │  Partition  │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Filename │ JSON      │ Trip updates  │ Walk dir  │ agency/date │
//! │ patterns │ Shape     │ Vehicle pos.  │ Time sort │ Parquet     │
//! │ Infer    │ detection │ Null padding  │ Concat    │ Report      │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the ingester
pub mod error;

/// Common types and type aliases
pub mod types;

/// Snapshot filename parsing
pub mod metadata;

/// Agency inference from feed content
pub mod infer;

/// Snapshot decoding and input shape detection
pub mod decode;

/// Normalization into fixed row layouts
pub mod normalize;

/// Snapshot discovery and concatenation
pub mod aggregate;

/// Arrow/Parquet output
pub mod output;

/// Partitioned Parquet writing
pub mod partition;

/// Batch execution engine
pub mod engine;

/// Run configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use aggregate::{aggregate_snapshots, Aggregation, SnapshotAggregator};
pub use config::IngestConfig;
pub use engine::{BatchSummary, IngestEngine};
pub use metadata::{parse_metadata, SnapshotMetadata};
pub use normalize::{load_snapshot, normalize_feed, FeedTable, SnapshotOutcome};
pub use partition::{write_partitioned, WriteReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
