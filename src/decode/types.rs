//! Feed shape types
//!
//! Defines the tagged union over the recognized input encodings.

use crate::error::{Error, Result};
use crate::types::FeedKind;
use serde_json::Value;

/// Input encoding of one snapshot, resolved for a specific feed kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedShape<'a> {
    /// Top-level `trip_updates` / `vehicle_positions` array of flat objects
    FlatList(&'a [Value]),
    /// Top-level `entity` array of `FeedEntity` wrappers
    EntityWrapper(&'a [Value]),
}

impl<'a> FeedShape<'a> {
    /// Resolve the shape of a decoded feed for `kind`
    ///
    /// The flat list wins when the kind's key holds an array; anything else
    /// falls back to the entity wrapper. A missing or `null` `entity` is an
    /// empty feed.
    pub fn detect(feed: &'a Value, kind: FeedKind) -> Result<Self> {
        let obj = feed
            .as_object()
            .ok_or_else(|| Error::normalization(kind, "feed document is not a JSON object"))?;

        if let Some(Value::Array(items)) = obj.get(kind.as_str()) {
            return Ok(FeedShape::FlatList(items));
        }

        match obj.get("entity") {
            None | Some(Value::Null) => Ok(FeedShape::EntityWrapper(&[])),
            Some(Value::Array(entities)) => Ok(FeedShape::EntityWrapper(entities)),
            Some(_) => Err(Error::normalization(kind, "'entity' is not a list")),
        }
    }

    /// The raw items of the feed, whichever shape
    pub fn items(&self) -> &'a [Value] {
        match self {
            FeedShape::FlatList(items) | FeedShape::EntityWrapper(items) => items,
        }
    }

    /// Whether this is the flat-list encoding
    pub fn is_flat(&self) -> bool {
        matches!(self, FeedShape::FlatList(_))
    }
}
