//! Vehicle position rows

use super::fields::Scope;
use super::snapshot::RowContext;
use super::types::VehiclePositionRecord;
use crate::decode::FeedShape;
use crate::error::Result;
use crate::types::FeedKind;
use serde_json::Value;

const KIND: FeedKind = FeedKind::VehiclePositions;

/// Build vehicle position rows for a resolved feed shape
pub(crate) fn normalize(
    shape: FeedShape<'_>,
    ctx: &RowContext<'_>,
) -> Result<Vec<VehiclePositionRecord>> {
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

/// `{"vehicle_id": ..., "trip": {...}, "position": {...}, ...}`
fn from_flat_item(
    item: &Value,
    index: usize,
    ctx: &RowContext<'_>,
) -> Result<VehiclePositionRecord> {
    let vp = Scope::root(item, KIND, &format!("vehicle_positions[{index}]"))?;

    let vehicle_id = match vp.non_empty_text("vehicle_id")? {
        Some(id) => Some(id),
        None => vp.child("vehicle")?.text("id")?,
    };

    build(&vp, None, vehicle_id, ctx)
}

/// `{"id": ..., "vehicle": {"vehicle": {"id": ...}, "trip": {...}, "position": {...}}}`
///
/// Entities without a `vehicle` produce no row; a `vehicle` without a
/// `position` still does.
fn from_entity(
    entity: &Value,
    index: usize,
    ctx: &RowContext<'_>,
) -> Result<Option<VehiclePositionRecord>> {
    let entity = Scope::root(entity, KIND, &format!("entity[{index}]"))?;
    if !entity.has("vehicle") {
        return Ok(None);
    }

    let vp = entity.child("vehicle")?;

    // VehiclePosition.vehicle (the descriptor) first, then a bare id
    let descriptor = vp.child("vehicle")?;
    let vehicle_id = match descriptor.non_empty_text("id")? {
        Some(id) => Some(id),
        None => vp.text("id")?,
    };

    build(&vp, entity.text("id")?, vehicle_id, ctx).map(Some)
}

/// Fields shared by both shapes, read relative to the position object
fn build(
    vp: &Scope<'_>,
    entity_id: Option<String>,
    vehicle_id: Option<String>,
    ctx: &RowContext<'_>,
) -> Result<VehiclePositionRecord> {
    let trip = vp.child("trip")?;
    let position = vp.child("position")?;

    Ok(VehiclePositionRecord {
        snapshot_file: ctx.snapshot_file(),
        snapshot_ts: ctx.snapshot_ts(),
        date_key: ctx.date_key(),
        agency: ctx.agency(),
        entity_id,
        vehicle_id,
        trip_id: trip.text("trip_id")?,
        route_id: trip.text("route_id")?,
        direction_id: trip.int("direction_id")?,
        start_time: trip.text("start_time")?,
        start_date: trip.text("start_date")?,
        current_stop_sequence: vp.int("current_stop_sequence")?,
        current_status: vp.text("current_status")?,
        timestamp: vp.int("timestamp")?,
        latitude: position.float("latitude")?,
        longitude: position.float("longitude")?,
        bearing: position.float("bearing")?,
        speed: position.float("speed")?,
    })
}
