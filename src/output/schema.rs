//! Arrow schemas and table conversion
//!
//! Each feed kind has one fixed schema. The four key columns
//! (`snapshot_filename`, `snapshot_ts`, `date_str`, `agency`) are
//! non-nullable; every other column is nullable. An empty table converts to
//! a zero-row batch with the same schema.

use crate::error::{Error, Result};
use crate::normalize::{FeedRecord, FeedTable, TripUpdateRecord, VehiclePositionRecord};
use crate::types::FeedKind;
use arrow::array::{
    Array, ArrayRef, Float64Array, Int64Array, StringArray, TimestampMicrosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::DateTime;
use serde_json::Value;
use std::sync::{Arc, LazyLock};

static TRIP_UPDATES_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    let mut fields = key_fields();
    fields.extend([
        Field::new("entity_id", DataType::Utf8, true),
        Field::new("trip_id", DataType::Utf8, true),
        Field::new("route_id", DataType::Utf8, true),
        Field::new("direction_id", DataType::Int64, true),
        Field::new("start_time", DataType::Utf8, true),
        Field::new("start_date", DataType::Utf8, true),
        Field::new("vehicle_id", DataType::Utf8, true),
        Field::new("tu_timestamp", DataType::Int64, true),
        Field::new("delay", DataType::Int64, true),
    ]);
    Arc::new(Schema::new(fields))
});

static VEHICLE_POSITIONS_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    let mut fields = key_fields();
    fields.extend([
        Field::new("entity_id", DataType::Utf8, true),
        Field::new("vehicle_id", DataType::Utf8, true),
        Field::new("trip_id", DataType::Utf8, true),
        Field::new("route_id", DataType::Utf8, true),
        Field::new("direction_id", DataType::Int64, true),
        Field::new("start_time", DataType::Utf8, true),
        Field::new("start_date", DataType::Utf8, true),
        Field::new("current_stop_sequence", DataType::Int64, true),
        Field::new("current_status", DataType::Utf8, true),
        Field::new("vp_timestamp", DataType::Int64, true),
        Field::new("lat", DataType::Float64, true),
        Field::new("lon", DataType::Float64, true),
        Field::new("bearing", DataType::Float64, true),
        Field::new("speed", DataType::Float64, true),
    ]);
    Arc::new(Schema::new(fields))
});

fn key_fields() -> Vec<Field> {
    vec![
        Field::new("snapshot_filename", DataType::Utf8, false),
        Field::new(
            "snapshot_ts",
            DataType::Timestamp(TimeUnit::Microsecond, None),
            false,
        ),
        Field::new("date_str", DataType::Utf8, false),
        Field::new("agency", DataType::Utf8, false),
    ]
}

/// Fixed output schema for a feed kind
pub fn schema_for(kind: FeedKind) -> SchemaRef {
    match kind {
        FeedKind::TripUpdates => Arc::clone(&TRIP_UPDATES_SCHEMA),
        FeedKind::VehiclePositions => Arc::clone(&VEHICLE_POSITIONS_SCHEMA),
    }
}

/// Convert a table to a RecordBatch with its kind's fixed schema
pub fn table_to_batch(table: &FeedTable) -> Result<RecordBatch> {
    let columns = match table {
        FeedTable::TripUpdates(rows) => trip_update_columns(rows),
        FeedTable::VehiclePositions(rows) => vehicle_position_columns(rows),
    };
    Ok(RecordBatch::try_new(schema_for(table.kind()), columns)?)
}

fn trip_update_columns(rows: &[TripUpdateRecord]) -> Vec<ArrayRef> {
    let mut columns = key_columns(rows);
    columns.extend([
        text(rows, |r| r.entity_id.as_deref()),
        text(rows, |r| r.trip_id.as_deref()),
        text(rows, |r| r.route_id.as_deref()),
        int(rows, |r| r.direction_id),
        text(rows, |r| r.start_time.as_deref()),
        text(rows, |r| r.start_date.as_deref()),
        text(rows, |r| r.vehicle_id.as_deref()),
        int(rows, |r| r.timestamp),
        int(rows, |r| r.delay),
    ]);
    columns
}

fn vehicle_position_columns(rows: &[VehiclePositionRecord]) -> Vec<ArrayRef> {
    let mut columns = key_columns(rows);
    columns.extend([
        text(rows, |r| r.entity_id.as_deref()),
        text(rows, |r| r.vehicle_id.as_deref()),
        text(rows, |r| r.trip_id.as_deref()),
        text(rows, |r| r.route_id.as_deref()),
        int(rows, |r| r.direction_id),
        text(rows, |r| r.start_time.as_deref()),
        text(rows, |r| r.start_date.as_deref()),
        int(rows, |r| r.current_stop_sequence),
        text(rows, |r| r.current_status.as_deref()),
        int(rows, |r| r.timestamp),
        float(rows, |r| r.latitude),
        float(rows, |r| r.longitude),
        float(rows, |r| r.bearing),
        float(rows, |r| r.speed),
    ]);
    columns
}

fn key_columns<R: FeedRecord>(rows: &[R]) -> Vec<ArrayRef> {
    vec![
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(FeedRecord::snapshot_file),
        )),
        Arc::new(TimestampMicrosecondArray::from_iter_values(
            rows.iter()
                .map(|r| r.snapshot_ts().and_utc().timestamp_micros()),
        )),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(FeedRecord::date_key),
        )),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(FeedRecord::agency),
        )),
    ]
}

fn text<R>(rows: &[R], f: impl Fn(&R) -> Option<&str>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<StringArray>())
}

fn int<R>(rows: &[R], f: impl Fn(&R) -> Option<i64>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<Int64Array>())
}

fn float<R>(rows: &[R], f: impl Fn(&R) -> Option<f64>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<Float64Array>())
}

/// Convert an Arrow RecordBatch to JSON records
///
/// Returns a vector of JSON objects, one per row in the batch. Timestamps
/// render as naive ISO-8601 text.
pub fn arrow_to_json(batch: &RecordBatch) -> Result<Vec<Value>> {
    let schema = batch.schema();
    let num_rows = batch.num_rows();
    let mut records = Vec::with_capacity(num_rows);

    for row_idx in 0..num_rows {
        let mut record = serde_json::Map::new();

        for (col_idx, field) in schema.fields().iter().enumerate() {
            let column = batch.column(col_idx);
            let value = array_value_to_json(column.as_ref(), row_idx)?;
            record.insert(field.name().clone(), value);
        }

        records.push(Value::Object(record));
    }

    Ok(records)
}

fn downcast<'a, T: 'static>(array: &'a dyn Array, name: &str) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::output(format!("Failed to downcast to {name}")))
}

/// Convert a single array element to JSON
fn array_value_to_json(array: &dyn Array, row: usize) -> Result<Value> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }

    match array.data_type() {
        DataType::Int64 => {
            let arr = downcast::<Int64Array>(array, "Int64Array")?;
            Ok(Value::Number(arr.value(row).into()))
        }

        DataType::Float64 => {
            let arr = downcast::<Float64Array>(array, "Float64Array")?;
            let val = arr.value(row);
            Ok(serde_json::Number::from_f64(val).map_or(Value::Null, Value::Number))
        }

        DataType::Utf8 => {
            let arr = downcast::<StringArray>(array, "StringArray")?;
            Ok(Value::String(arr.value(row).to_string()))
        }

        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            let arr = downcast::<TimestampMicrosecondArray>(array, "TimestampMicrosecondArray")?;
            let micros = arr.value(row);
            let ts = DateTime::from_timestamp_micros(micros)
                .ok_or_else(|| Error::output(format!("Timestamp out of range: {micros}")))?;
            Ok(Value::String(
                ts.naive_utc().format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            ))
        }

        other => Err(Error::output(format!(
            "Unsupported column type for JSON rendering: {other}"
        ))),
    }
}
