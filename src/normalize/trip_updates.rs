//! Trip update rows

use super::fields::Scope;
use super::snapshot::RowContext;
use super::types::TripUpdateRecord;
use crate::decode::FeedShape;
use crate::error::Result;
use crate::types::FeedKind;
use serde_json::Value;

const KIND: FeedKind = FeedKind::TripUpdates;

/// Build trip update rows for a resolved feed shape
pub(crate) fn normalize(shape: FeedShape<'_>, ctx: &RowContext<'_>) -> Result<Vec<TripUpdateRecord>> {
    match shape {
        FeedShape::FlatList(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| from_flat_item(item, i, ctx))
            .collect(),
        FeedShape::EntityWrapper(entities) => {
            let mut rows = Vec::with_capacity(entities.len());
            for (i, entity) in entities.iter().enumerate() {
                if let Some(row) = from_entity(entity, i, ctx)? {
                    rows.push(row);
                }
            }
            Ok(rows)
        }
    }
}

/// `{"trip_id": ..., "vehicle_id": ..., "delay": ...}`
///
/// An item that is not an object still yields a row, null apart from the
/// snapshot key columns. A non-object `vehicle` leaves the vehicle id null.
fn from_flat_item(item: &Value, index: usize, ctx: &RowContext<'_>) -> Result<TripUpdateRecord> {
    let tu = Scope::lenient(item, KIND, &format!("trip_updates[{index}]"));

    let vehicle_id = match tu.non_empty_text("vehicle_id")? {
        Some(id) => Some(id),
        None => tu.child_or_empty("vehicle").text("id")?,
    };

    Ok(TripUpdateRecord {
        snapshot_file: ctx.snapshot_file(),
        snapshot_ts: ctx.snapshot_ts(),
        date_key: ctx.date_key(),
        agency: ctx.agency(),
        entity_id: None,
        trip_id: tu.text("trip_id")?,
        route_id: tu.text("route_id")?,
        direction_id: tu.int("direction_id")?,
        start_time: tu.text("start_time")?,
        start_date: tu.text("start_date")?,
        vehicle_id,
        timestamp: tu.int("timestamp")?,
        delay: tu.int("delay")?,
    })
}

/// `{"id": ..., "trip_update": {"trip": {...}, "vehicle": {...}, ...}}`
///
/// Entities without a `trip_update` produce no row.
fn from_entity(
    entity: &Value,
    index: usize,
    ctx: &RowContext<'_>,
) -> Result<Option<TripUpdateRecord>> {
    let entity = Scope::root(entity, KIND, &format!("entity[{index}]"))?;
    if !entity.has("trip_update") {
        return Ok(None);
    }

    let tu = entity.child("trip_update")?;
    let trip = tu.child("trip")?;
    let vehicle = tu.child("vehicle")?;

    Ok(Some(TripUpdateRecord {
        snapshot_file: ctx.snapshot_file(),
        snapshot_ts: ctx.snapshot_ts(),
        date_key: ctx.date_key(),
        agency: ctx.agency(),
        entity_id: entity.text("id")?,
        trip_id: trip.text("trip_id")?,
        route_id: trip.text("route_id")?,
        direction_id: trip.int("direction_id")?,
        start_time: trip.text("start_time")?,
        start_date: trip.text("start_date")?,
        vehicle_id: vehicle.text("id")?,
        timestamp: tu.int("timestamp")?,
        delay: tu.int("delay")?,
    }))
}
