//! Vehicle id search and agency normalization

use serde_json::Value;

/// Infer an agency label from decoded feed content
///
/// Candidates are searched in priority order:
///
/// 1. per entity, in order: `trip_update.vehicle.id`, then the vehicle
///    position id (`vehicle.vehicle.id` before `vehicle.id`)
/// 2. flat `trip_updates[]`: `vehicle_id`, then `vehicle.id`
/// 3. flat `vehicle_positions[]`: `vehicle_id`, then `vehicle.id`, then `id`
///
/// The first non-empty identifier wins. Returns `None` when no identifier is
/// found; shapes that don't fit the search are ignored rather than reported.
pub fn infer_agency(feed: &Value) -> Option<String> {
    let obj = feed.as_object()?;

    let from_entities = obj
        .get("entity")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find_map(|entity| {
            trip_update_vehicle_id(entity).or_else(|| vehicle_position_vehicle_id(entity))
        });

    let from_flat_trip_updates = || {
        obj.get("trip_updates")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .find_map(|item| first_id(item, &[&["vehicle_id"], &["vehicle", "id"]]))
    };

    let from_flat_vehicle_positions = || {
        obj.get("vehicle_positions")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .find_map(|item| first_id(item, &[&["vehicle_id"], &["vehicle", "id"], &["id"]]))
    };

    from_entities
        .or_else(from_flat_trip_updates)
        .or_else(from_flat_vehicle_positions)
        .and_then(|id| agency_from_vehicle_id(&id))
}

/// Normalize a raw vehicle id into an agency label
///
/// `-` and `.` are treated as `_`; the first two `_` segments form the
/// agency. A single segment is returned as-is, an empty id yields `None`.
///
/// ```
/// use gtfsrt_bronze::infer::agency_from_vehicle_id;
///
/// assert_eq!(agency_from_vehicle_id("chitetsu_bus-5007").as_deref(), Some("chitetsu_bus"));
/// assert_eq!(agency_from_vehicle_id("5007").as_deref(), Some("5007"));
/// assert_eq!(agency_from_vehicle_id(""), None);
/// ```
pub fn agency_from_vehicle_id(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let normalized = raw.replace(['-', '.'], "_");
    let parts: Vec<&str> = normalized.split('_').collect();
    if parts.len() >= 2 {
        Some(parts[..2].join("_"))
    } else {
        Some(normalized)
    }
}

fn trip_update_vehicle_id(entity: &Value) -> Option<String> {
    id_at(entity, &["trip_update", "vehicle", "id"])
}

fn vehicle_position_vehicle_id(entity: &Value) -> Option<String> {
    first_id(entity, &[&["vehicle", "vehicle", "id"], &["vehicle", "id"]])
}

fn first_id(value: &Value, paths: &[&[&str]]) -> Option<String> {
    paths.iter().find_map(|path| id_at(value, path))
}

/// Non-empty identifier at a key path; numeric ids are rendered to text
fn id_at(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    match current {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
