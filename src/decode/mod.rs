//! Snapshot decoding and shape detection
//!
//! Snapshots come in two JSON encodings per feed kind:
//!
//! - **Flat list**: `{"trip_updates": [{...}, ...]}` or
//!   `{"vehicle_positions": [{...}, ...]}`, one flat object per record
//! - **Entity wrapper**: the GTFS-RT `FeedMessage` layout,
//!   `{"entity": [{"id": ..., "trip_update": {...}}, ...]}`
//!
//! The shape is resolved once per file into a [`FeedShape`] so the
//! normalizer dispatches to exactly one extraction path.

mod decoders;
mod types;

pub use decoders::{decode_feed, read_feed};
pub use types::FeedShape;

#[cfg(test)]
mod tests;
