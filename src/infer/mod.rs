//! Agency inference from feed content
//!
//! Snapshot files without an agency segment in their name get a best-effort
//! agency label from the first vehicle identifier found in the feed. Vehicle
//! ids are commonly namespaced like `chitetsu_tram_5007`, so the first two
//! segments are taken as the agency.
//!
//! The heuristic is lossy: colliding id conventions can misattribute an
//! agency. A filename agency always takes precedence over inference.

mod inference;

pub use inference::{agency_from_vehicle_id, infer_agency};
