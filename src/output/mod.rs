//! Output module
//!
//! Handles Arrow RecordBatch creation and Parquet file writing.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Fixed Arrow schemas per feed kind
//! - Converting normalized tables to Arrow RecordBatches
//! - Writing Parquet files
//! - Rendering batches as JSON for inspection

mod schema;
mod writer;

pub use schema::{arrow_to_json, schema_for, table_to_batch};
pub use writer::{write_batch_to_jsonl, write_batch_to_parquet, ParquetWriterConfig};
