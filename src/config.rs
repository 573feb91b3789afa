//! Configuration for batch runs
//!
//! Every field has a default, so an empty YAML document is a valid config.
//! CLI flags override values loaded from a file.

use crate::error::{Error, Result};
use crate::metadata::{MetadataParser, DEFAULT_EXTENSION, DEFAULT_PREFIX};
use crate::output::ParquetWriterConfig;
use crate::types::{CompressionCodec, FeedSelector, LogLevel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Top-Level Ingest Config
// ============================================================================

/// Batch ingest configuration loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Root directory searched recursively for snapshots
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Root directory for partitioned Parquet output
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Feed kinds to process
    #[serde(default)]
    pub feeds: FeedSelector,

    /// Only write partitions for this agency
    #[serde(default)]
    pub agency_filter: Option<String>,

    /// Also render each unified table as JSON Lines under `_inspect/`
    #[serde(default)]
    pub inspect: bool,

    /// Normalize files and write partitions on the rayon pool
    #[serde(default)]
    pub parallel: bool,

    /// Snapshot filename prefix
    #[serde(default = "default_prefix")]
    pub file_prefix: String,

    /// Snapshot filename extension, without the dot
    #[serde(default = "default_extension")]
    pub file_extension: String,

    /// Log level used when `RUST_LOG` is unset
    #[serde(default)]
    pub log_level: LogLevel,

    /// Parquet writer settings
    #[serde(default)]
    pub parquet: ParquetSettings,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("./data/raw")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./data/bronze")
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            feeds: FeedSelector::default(),
            agency_filter: None,
            inspect: false,
            parallel: false,
            file_prefix: default_prefix(),
            file_extension: default_extension(),
            log_level: LogLevel::default(),
            parquet: ParquetSettings::default(),
        }
    }
}

impl IngestConfig {
    /// Load and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // an empty document deserializes as unit, not as an empty mapping
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.file_prefix.is_empty() {
            return Err(Error::invalid_value("file_prefix", "cannot be empty"));
        }
        if self.file_extension.trim_start_matches('.').is_empty() {
            return Err(Error::invalid_value("file_extension", "cannot be empty"));
        }
        if self.parquet.row_group_size == 0 {
            return Err(Error::invalid_value(
                "parquet.row_group_size",
                "must be greater than zero",
            ));
        }
        if self.input_dir.as_os_str().is_empty() {
            return Err(Error::invalid_value("input_dir", "cannot be empty"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::invalid_value("output_dir", "cannot be empty"));
        }
        Ok(())
    }

    /// Agency filter, treating an empty name as no filter
    pub fn agency_filter(&self) -> Option<&str> {
        self.agency_filter.as_deref().filter(|a| !a.is_empty())
    }

    /// Filename parser for the configured prefix and extension
    pub fn metadata_parser(&self) -> Result<MetadataParser> {
        MetadataParser::new(&self.file_prefix, &self.file_extension)
    }
}

// ============================================================================
// Parquet Settings
// ============================================================================

/// Parquet writer settings, uniform across partitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParquetSettings {
    /// Compression codec
    #[serde(default)]
    pub compression: CompressionCodec,

    /// Maximum rows per row group
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,

    /// Dictionary encoding
    #[serde(default = "default_true")]
    pub dictionary: bool,

    /// Column statistics
    #[serde(default = "default_true")]
    pub statistics: bool,
}

impl Default for ParquetSettings {
    fn default() -> Self {
        Self {
            compression: CompressionCodec::default(),
            row_group_size: default_row_group_size(),
            dictionary: true,
            statistics: true,
        }
    }
}

fn default_row_group_size() -> usize {
    1024 * 1024
}

fn default_true() -> bool {
    true
}

impl From<&ParquetSettings> for ParquetWriterConfig {
    fn from(settings: &ParquetSettings) -> Self {
        ParquetWriterConfig::new()
            .with_codec(settings.compression)
            .with_row_group_size(settings.row_group_size)
            .with_dictionary(settings.dictionary)
            .with_statistics(settings.statistics)
    }
}
