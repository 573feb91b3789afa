//! Parquet and JSON Lines file writers
//!
//! Provides utilities for writing Arrow RecordBatches to Parquet files and
//! rendering them as JSON Lines for inspection.

use super::schema::arrow_to_json;
use crate::error::{Error, Result, ResultExt};
use crate::types::CompressionCodec;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Configuration for Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
    dictionary_enabled: bool,
    statistics_enabled: bool,
}

impl ParquetWriterConfig {
    /// Get compression algorithm
    #[must_use]
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Get dictionary encoding enabled
    #[must_use]
    pub fn is_dictionary_enabled(&self) -> bool {
        self.dictionary_enabled
    }

    /// Get statistics enabled
    #[must_use]
    pub fn is_statistics_enabled(&self) -> bool {
        self.statistics_enabled
    }

    /// Get row group size
    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: CompressionCodec::default().into(),
            row_group_size: 1024 * 1024, // 1M rows
            dictionary_enabled: true,
            statistics_enabled: true,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression codec
    #[must_use]
    pub fn with_codec(mut self, codec: CompressionCodec) -> Self {
        self.compression = codec.into();
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Enable or disable dictionary encoding
    #[must_use]
    pub fn with_dictionary(mut self, enabled: bool) -> Self {
        self.dictionary_enabled = enabled;
        self
    }

    /// Enable or disable statistics
    #[must_use]
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.statistics_enabled = enabled;
        self
    }

    /// Build writer properties
    fn build_properties(&self) -> WriterProperties {
        let mut builder = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size);

        if !self.dictionary_enabled {
            builder = builder.set_dictionary_enabled(false);
        }

        if !self.statistics_enabled {
            builder = builder.set_statistics_enabled(EnabledStatistics::None);
        }

        builder.build()
    }
}

/// Write a single RecordBatch to a Parquet file
///
/// Parent directories are created as needed. The batch is written to a
/// hidden sibling temp file that replaces `path` only once it is complete,
/// so a failed write leaves any existing file untouched.
pub fn write_batch_to_parquet(
    path: impl AsRef<Path>,
    batch: &RecordBatch,
    config: &ParquetWriterConfig,
) -> Result<usize> {
    let path = path.as_ref();
    create_parent(path)?;

    let temp_path = temp_path_for(path);
    let result = write_parquet_file(&temp_path, batch, config).and_then(|rows| {
        fs::rename(&temp_path, path)
            .map_err(|e| Error::output(format!("Failed to replace {}: {e}", path.display())))?;
        Ok(rows)
    });
    if result.is_err() && temp_path.is_file() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// `dir/.name.tmp` next to the final file
pub(crate) fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

fn write_parquet_file(
    path: &Path,
    batch: &RecordBatch,
    config: &ParquetWriterConfig,
) -> Result<usize> {
    let file = File::create(path)
        .map_err(|e| Error::output(format!("Failed to create file: {e}")))?;

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(config.build_properties()))
        .map_err(|e| Error::output(format!("Failed to create Parquet writer: {e}")))?;
    writer
        .write(batch)
        .map_err(|e| Error::output(format!("Failed to write batch: {e}")))?;
    writer
        .close()
        .map_err(|e| Error::output(format!("Failed to close Parquet writer: {e}")))?;

    Ok(batch.num_rows())
}

/// Render a RecordBatch as JSON Lines, one object per row
pub fn write_batch_to_jsonl(path: impl AsRef<Path>, batch: &RecordBatch) -> Result<usize> {
    let path = path.as_ref();
    create_parent(path)?;

    let records = arrow_to_json(batch)?;
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for record in &records {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(records.len())
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| {
                Error::output(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            }),
        _ => Ok(()),
    }
}
