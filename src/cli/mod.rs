//! CLI module
//!
//! Command-line interface for batch runs.
//!
//! A single invocation processes the requested feed kinds and exits with
//! status 1 only when the run cannot start (bad config file, unusable input
//! directory). Per-file and per-partition failures are logged and counted
//! in the printed summary.

mod commands;
mod runner;

pub use commands::{Cli, OutputFormat};
pub use runner::Runner;
