//! Feed normalization
//!
//! Turns a decoded snapshot into a [`FeedTable`] with a fixed row layout per
//! feed kind, whatever the input shape.
//!
//! # Rules
//!
//! - Every row carries the snapshot's file name, capture time, date key and
//!   agency.
//! - Missing optional fields become `None`; records are never dropped for
//!   missing data. A vehicle without a `position` is still a sighting.
//! - Entity-wrapper feeds skip entities that lack the kind's sub-object.
//! - Structural surprises (an entity that is not an object, a `trip` that is
//!   a string) fail the whole snapshot with a normalization error.

mod fields;
mod snapshot;
mod trip_updates;
mod types;
mod vehicle_positions;

pub use snapshot::{load_snapshot, normalize_feed, resolve_agency, SnapshotOutcome};
pub use types::{FeedRecord, FeedTable, TripUpdateRecord, VehiclePositionRecord};
