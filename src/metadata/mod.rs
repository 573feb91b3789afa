//! Snapshot filename metadata
//!
//! Snapshot files carry their agency, feed kind and capture time in the
//! filename:
//!
//! ```text
//! gtfs_rt_trip_updates_toei_bus_20250101_120000.json
//! └─────┘ └──────────┘ └──────┘ └─────────────┘
//! prefix   feed kind    agency   capture time (UTC, naive)
//! ```
//!
//! The agency segment is optional. When it is missing the metadata carries
//! the [`UNRESOLVED_AGENCY`] sentinel and the agency is inferred later from
//! feed content (see [`crate::infer`]).

mod parser;
mod types;

pub use parser::{parse_metadata, MetadataParser, DEFAULT_EXTENSION, DEFAULT_PREFIX};
pub use types::{SnapshotMetadata, UNRESOLVED_AGENCY};
