//! CLI arguments and parsing

use crate::types::{CompressionCodec, FeedSelector};
use clap::Parser;
use std::path::PathBuf;

/// Batch-convert GTFS-RT JSON snapshots into partitioned Parquet
///
/// Flags override values from `--config`; unset flags fall back to the
/// config file, then to built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "gtfsrt-bronze")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory searched recursively for snapshots [default: ./data/raw]
    #[arg(short, long)]
    pub input_dir: Option<PathBuf>,

    /// Root directory for Parquet partitions [default: ./data/bronze]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Feed kinds to process [default: both]
    #[arg(long, value_enum)]
    pub feed_type: Option<FeedSelector>,

    /// Only write partitions for this agency
    #[arg(long)]
    pub agency_filter: Option<String>,

    /// Also write each unified table as JSON Lines under `_inspect/`
    #[arg(long)]
    pub inspect: bool,

    /// Normalize files and write partitions in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Parquet compression codec [default: zstd]
    #[arg(long, value_enum)]
    pub compression: Option<CompressionCodec>,

    /// Summary output format
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format for the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (single line)
    Json,
    /// Human-readable output
    Pretty,
}
