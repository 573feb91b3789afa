//! Tests for aggregate module

use super::*;
use crate::error::Error;
use crate::metadata::MetadataParser;
use crate::normalize::FeedTable;
use crate::types::FeedKind;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use test_case::test_case;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn trip_feed(trip_ids: &[&str]) -> String {
    let items: Vec<_> = trip_ids.iter().map(|t| json!({"trip_id": t})).collect();
    json!({ "trip_updates": items }).to_string()
}

fn trip_ids(table: &FeedTable) -> Vec<String> {
    match table {
        FeedTable::TripUpdates(rows) => rows.iter().filter_map(|r| r.trip_id.clone()).collect(),
        FeedTable::VehiclePositions(_) => panic!("Expected trip updates"),
    }
}

// ============================================================================
// Discovery Tests
// ============================================================================

#[test]
fn test_discover_orders_by_capture_time() {
    let dir = tempdir().unwrap();
    // name order (a < b) is the reverse of time order
    write(dir.path(), "gtfs_rt_trip_updates_a_20250101_130000.json", "{}");
    write(dir.path(), "nested/deeper/gtfs_rt_trip_updates_b_20250101_120000.json", "{}");

    let (snapshots, skipped) = SnapshotAggregator::default()
        .discover(dir.path(), FeedKind::TripUpdates)
        .unwrap();

    assert_eq!(skipped, 0);
    let agencies: Vec<_> = snapshots.iter().map(|s| s.metadata.agency.as_str()).collect();
    assert_eq!(agencies, vec!["b", "a"]);
}

#[test]
fn test_discover_filters_by_kind_and_extension() {
    let dir = tempdir().unwrap();
    write(dir.path(), "gtfs_rt_trip_updates_a_20250101_120000.json", "{}");
    write(dir.path(), "gtfs_rt_vehicle_positions_a_20250101_120000.json", "{}");
    write(dir.path(), "gtfs_rt_trip_updates_a_20250101_120000.json.bak", "{}");
    write(dir.path(), "notes.txt", "hello");

    let (snapshots, skipped) = SnapshotAggregator::default()
        .discover(dir.path(), FeedKind::TripUpdates)
        .unwrap();

    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].metadata.feed_kind, FeedKind::TripUpdates);
    assert_eq!(skipped, 0);
}

#[test]
fn test_discover_skips_unparsable_names() {
    let dir = tempdir().unwrap();
    write(dir.path(), "gtfs_rt_trip_updates_a_20250101_120000.json", "{}");
    write(dir.path(), "gtfs_rt_trip_updates_latest.json", "{}");
    write(dir.path(), "gtfs_rt_trip_updates_a_20251399_120000.json", "{}");

    let (snapshots, skipped) = SnapshotAggregator::default()
        .discover(dir.path(), FeedKind::TripUpdates)
        .unwrap();

    assert_eq!(snapshots.len(), 1);
    assert_eq!(skipped, 2);
}

#[test]
fn test_discover_equal_timestamps_use_name_order() {
    let dir = tempdir().unwrap();
    write(dir.path(), "z/gtfs_rt_trip_updates_a_20250101_120000.json", "{}");
    write(dir.path(), "a/gtfs_rt_trip_updates_c_20250101_120000.json", "{}");
    write(dir.path(), "m/gtfs_rt_trip_updates_b_20250101_120000.json", "{}");

    let (snapshots, _) = SnapshotAggregator::default()
        .discover(dir.path(), FeedKind::TripUpdates)
        .unwrap();
    let agencies: Vec<_> = snapshots.iter().map(|s| s.metadata.agency.as_str()).collect();
    assert_eq!(agencies, vec!["a", "b", "c"]);
}

#[test]
fn test_discover_custom_prefix() {
    let dir = tempdir().unwrap();
    write(dir.path(), "rt_trip_updates_a_20250101_120000.jsonl", "{}");
    write(dir.path(), "gtfs_rt_trip_updates_a_20250101_120000.json", "{}");

    let parser = MetadataParser::new("rt", "jsonl").unwrap();
    let (snapshots, _) = SnapshotAggregator::new(parser)
        .discover(dir.path(), FeedKind::TripUpdates)
        .unwrap();

    assert_eq!(snapshots.len(), 1);
    assert!(snapshots[0].path.ends_with("rt_trip_updates_a_20250101_120000.jsonl"));
}

#[test]
fn test_missing_root_is_error() {
    let dir = tempdir().unwrap();
    let err = aggregate_snapshots(&dir.path().join("nope"), FeedKind::TripUpdates).unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[test]
fn test_file_root_is_error() {
    let dir = tempdir().unwrap();
    write(dir.path(), "file.json", "{}");
    assert!(aggregate_snapshots(&dir.path().join("file.json"), FeedKind::TripUpdates).is_err());
}

// ============================================================================
// Aggregation Tests
// ============================================================================

#[test_case(false ; "sequential")]
#[test_case(true ; "parallel")]
fn test_aggregate_preserves_time_order(parallel: bool) {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "a/gtfs_rt_trip_updates_x_20250101_120200.json",
        &trip_feed(&["t3-1", "t3-2"]),
    );
    write(
        dir.path(),
        "b/gtfs_rt_trip_updates_x_20250101_120000.json",
        &trip_feed(&["t1-1"]),
    );
    write(
        dir.path(),
        "c/gtfs_rt_trip_updates_x_20250101_120100.json",
        &trip_feed(&["t2-1", "t2-2"]),
    );

    let aggregation = SnapshotAggregator::default()
        .with_parallel(parallel)
        .aggregate(dir.path(), FeedKind::TripUpdates)
        .unwrap();

    assert_eq!(
        trip_ids(&aggregation.table),
        vec!["t1-1", "t2-1", "t2-2", "t3-1", "t3-2"]
    );
    assert_eq!(aggregation.report.contributing, 3);
    assert_eq!(aggregation.report.rows, 5);
}

#[test]
fn test_aggregate_tolerates_bad_files() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "gtfs_rt_trip_updates_x_20250101_120000.json",
        &trip_feed(&["good"]),
    );
    write(dir.path(), "gtfs_rt_trip_updates_x_20250101_120100.json", "{ broken");
    write(
        dir.path(),
        "gtfs_rt_trip_updates_x_20250101_120200.json",
        r#"{"entity": "nope"}"#,
    );
    write(
        dir.path(),
        "gtfs_rt_trip_updates_x_20250101_120300.json",
        &trip_feed(&[]),
    );
    write(dir.path(), "gtfs_rt_trip_updates_bad_name.json", "{}");

    let aggregation = aggregate_snapshots(dir.path(), FeedKind::TripUpdates).unwrap();

    assert_eq!(trip_ids(&aggregation.table), vec!["good"]);
    assert_eq!(
        aggregation.report,
        AggregateReport {
            discovered: 5,
            skipped_metadata: 1,
            failed: 2,
            empty: 1,
            contributing: 1,
            rows: 1,
        }
    );
}

#[test]
fn test_aggregate_nothing_is_canonical_empty() {
    let dir = tempdir().unwrap();
    let aggregation = aggregate_snapshots(dir.path(), FeedKind::VehiclePositions).unwrap();
    assert_eq!(aggregation.table, FeedTable::empty(FeedKind::VehiclePositions));
    assert_eq!(aggregation.report, AggregateReport::default());
}

#[test]
fn test_aggregate_keeps_sightings_without_position() {
    let dir = tempdir().unwrap();
    let feed = json!({"entity": [
        {"id": "1", "vehicle": {"vehicle": {"id": "bus_a_1"}}},
        {"id": "2", "vehicle": {"vehicle": {"id": "bus_a_2"}, "position": {"latitude": 1.0, "longitude": 2.0}}}
    ]});
    write(
        dir.path(),
        "gtfs_rt_vehicle_positions_20250101_120000.json",
        &feed.to_string(),
    );

    let aggregation = aggregate_snapshots(dir.path(), FeedKind::VehiclePositions).unwrap();
    let FeedTable::VehiclePositions(rows) = aggregation.table else {
        panic!("Expected vehicle positions");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].latitude, None);
    assert!(rows.iter().all(|r| r.agency == "bus_a"));
}

#[test]
fn test_aggregations_concatenate_like_union() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    let union = tempdir().unwrap();

    let files = [
        ("gtfs_rt_trip_updates_x_20250101_120000.json", ["a", "b"]),
        ("gtfs_rt_trip_updates_x_20250101_130000.json", ["c", "d"]),
    ];
    write(first.path(), files[0].0, &trip_feed(&files[0].1));
    write(second.path(), files[1].0, &trip_feed(&files[1].1));
    for (name, ids) in &files {
        write(union.path(), name, &trip_feed(ids));
    }

    let combined = FeedTable::concat(
        FeedKind::TripUpdates,
        [
            aggregate_snapshots(first.path(), FeedKind::TripUpdates).unwrap().table,
            aggregate_snapshots(second.path(), FeedKind::TripUpdates).unwrap().table,
        ],
    )
    .unwrap();
    let whole = aggregate_snapshots(union.path(), FeedKind::TripUpdates).unwrap().table;

    assert_eq!(combined, whole);
}
