//! Error types for the GTFS-RT bronze ingester
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Per-file and per-partition errors (`Metadata`, `Decode`,
//! `Normalization`, `Write`) never propagate past the file or partition
//! that produced them. They are carried in outcome types and logged by
//! the caller.

use crate::types::FeedKind;
use thiserror::Error;

/// The main error type for the ingester
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Snapshot Errors
    // ============================================================================
    #[error("Invalid snapshot filename '{filename}': {message}")]
    Metadata { filename: String, message: String },

    #[error("Failed to decode snapshot: {message}")]
    Decode { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to normalize {kind} feed: {message}")]
    Normalization { kind: FeedKind, message: String },

    #[error("Cannot combine {expected} table with {found} table")]
    KindMismatch { expected: FeedKind, found: FeedKind },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    #[error("Failed to write partition {agency}/{date_key}: {message}")]
    Write {
        agency: String,
        date_key: String,
        message: String,
    },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a filename metadata error
    pub fn metadata(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Metadata {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a normalization error
    pub fn normalization(kind: FeedKind, message: impl Into<String>) -> Self {
        Self::Normalization {
            kind,
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Create a partition write error
    pub fn write(
        agency: impl Into<String>,
        date_key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Write {
            agency: agency.into(),
            date_key: date_key.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for the ingester
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::metadata("foo.json", "does not match");
        assert_eq!(
            err.to_string(),
            "Invalid snapshot filename 'foo.json': does not match"
        );

        let err = Error::normalization(FeedKind::VehiclePositions, "entity is not an object");
        assert_eq!(
            err.to_string(),
            "Failed to normalize vehicle_positions feed: entity is not an object"
        );

        let err = Error::write("toei", "20250101", "disk full");
        assert_eq!(
            err.to_string(),
            "Failed to write partition toei/20250101: disk full"
        );
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
