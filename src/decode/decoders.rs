//! JSON snapshot decoding

use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Decode snapshot bytes into a JSON document
pub fn decode_feed(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))
}

/// Read and decode a snapshot file
///
/// Read failures are reported as decode errors: either way the file has no
/// usable content.
pub fn read_feed(path: &Path) -> Result<Value> {
    let bytes = fs::read(path)
        .map_err(|e| Error::decode(format!("Failed to read {}: {e}", path.display())))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::decode(format!("Invalid JSON in {}: {e}", path.display())))
}
