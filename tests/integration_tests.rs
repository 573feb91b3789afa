//! Integration tests over real directory trees
//!
//! Tests the full end-to-end flow: snapshot files → aggregation → Parquet
//! partitions read back from disk

use arrow::array::{Array, Float64Array, StringArray};
use arrow::record_batch::RecordBatch;
use gtfsrt_bronze::config::IngestConfig;
use gtfsrt_bronze::engine::IngestEngine;
use gtfsrt_bronze::types::{CompressionCodec, FeedKind, FeedSelector};
use gtfsrt_bronze::{aggregate_snapshots, write_partitioned, FeedTable};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

// ============================================================================
// Helpers
// ============================================================================

fn write_snapshot(root: &Path, relative: &str, feed: &Value) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_vec(feed).unwrap()).unwrap();
}

fn read_parquet(path: &Path) -> Vec<RecordBatch> {
    ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap())
        .unwrap()
        .build()
        .unwrap()
        .map(|b| b.unwrap())
        .collect()
}

fn string_column(batches: &[RecordBatch], name: &str) -> Vec<Option<String>> {
    let mut values = Vec::new();
    for batch in batches {
        let col = batch
            .column_by_name(name)
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        for i in 0..col.len() {
            values.push((!col.is_null(i)).then(|| col.value(i).to_string()));
        }
    }
    values
}

fn parquet_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|e| e == "parquet") {
                files.push(path.strip_prefix(root).unwrap().to_path_buf());
            }
        }
    }
    files.sort();
    files
}

/// Two agencies over two days, both kinds, plus a few broken files
fn seeded_input() -> TempDir {
    let dir = tempdir().unwrap();
    let raw = dir.path().join("raw");

    // toei: entity wrapper, agency in filename
    write_snapshot(
        &raw,
        "toei/gtfs_rt_trip_updates_toei_20250101_120500.json",
        &json!({"entity": [
            {"id": "e2", "trip_update": {"trip": {"trip_id": "toei-late"}, "delay": 120}}
        ]}),
    );
    write_snapshot(
        &raw,
        "toei/gtfs_rt_trip_updates_toei_20250101_120000.json",
        &json!({"entity": [
            {"id": "e1", "trip_update": {"trip": {"trip_id": "toei-early"}, "delay": "30"}}
        ]}),
    );
    write_snapshot(
        &raw,
        "toei/gtfs_rt_trip_updates_toei_20250102_080000.json",
        &json!({"entity": [
            {"id": "e3", "trip_update": {"trip": {"trip_id": "toei-day2"}}}
        ]}),
    );

    // chitetsu: flat list, agency inferred from vehicle ids
    write_snapshot(
        &raw,
        "chitetsu/gtfs_rt_trip_updates_20250101_090000.json",
        &json!({"trip_updates": [
            {"trip_id": "chi-1", "vehicle_id": "chitetsu_tram_5007"}
        ]}),
    );
    write_snapshot(
        &raw,
        "chitetsu/gtfs_rt_vehicle_positions_20250102_090000.json",
        &json!({"entity": [
            {"id": "v1", "vehicle": {"vehicle": {"id": "chitetsu_bus-5007"},
                "position": {"latitude": 36.7, "longitude": 137.2}}},
            {"id": "v2", "vehicle": {"vehicle": {"id": "chitetsu_bus-5008"}}}
        ]}),
    );

    // noise
    write_snapshot(
        &raw,
        "gtfs_rt_trip_updates_toei_20250101_130000.json",
        &json!([1, 2, 3]),
    );
    fs::write(
        raw.join("gtfs_rt_vehicle_positions_toei_20250101_130000.json"),
        "{ truncated",
    )
    .unwrap();
    fs::write(raw.join("gtfs_rt_trip_updates_toei_latest.json"), "{}").unwrap();
    fs::write(raw.join("README.md"), "not a snapshot").unwrap();

    dir
}

fn config_for(dir: &TempDir) -> IngestConfig {
    IngestConfig {
        input_dir: dir.path().join("raw"),
        output_dir: dir.path().join("bronze"),
        ..IngestConfig::default()
    }
}

// ============================================================================
// End-to-End Tests
// ============================================================================

#[test]
fn test_end_to_end_partitions() {
    let dir = seeded_input();
    let summary = IngestEngine::new(config_for(&dir)).unwrap().run().unwrap();

    let bronze = dir.path().join("bronze");
    assert_eq!(
        parquet_files(&bronze),
        vec![
            PathBuf::from("chitetsu_bus/vehicle_positions/20250102.parquet"),
            PathBuf::from("chitetsu_tram/trip_updates/20250101.parquet"),
            PathBuf::from("toei/trip_updates/20250101.parquet"),
            PathBuf::from("toei/trip_updates/20250102.parquet"),
        ]
    );

    let trips = summary.kind(FeedKind::TripUpdates).unwrap();
    assert_eq!(trips.aggregate.failed, 1);
    assert_eq!(trips.aggregate.skipped_metadata, 1);
    assert_eq!(trips.rows_written, 4);

    let positions = summary.kind(FeedKind::VehiclePositions).unwrap();
    assert_eq!(positions.aggregate.failed, 1);
    assert_eq!(positions.rows_written, 2);
}

#[test]
fn test_end_to_end_time_order_within_partition() {
    let dir = seeded_input();
    IngestEngine::new(config_for(&dir)).unwrap().run().unwrap();

    let batches = read_parquet(
        &dir.path()
            .join("bronze/toei/trip_updates/20250101.parquet"),
    );
    assert_eq!(
        string_column(&batches, "trip_id"),
        vec![Some("toei-early".to_string()), Some("toei-late".to_string())]
    );
    assert_eq!(
        string_column(&batches, "snapshot_filename"),
        vec![
            Some("gtfs_rt_trip_updates_toei_20250101_120000.json".to_string()),
            Some("gtfs_rt_trip_updates_toei_20250101_120500.json".to_string()),
        ]
    );
}

#[test]
fn test_end_to_end_positionless_sightings_kept() {
    let dir = seeded_input();
    IngestEngine::new(config_for(&dir)).unwrap().run().unwrap();

    let batches = read_parquet(
        &dir.path()
            .join("bronze/chitetsu_bus/vehicle_positions/20250102.parquet"),
    );
    assert_eq!(
        string_column(&batches, "vehicle_id"),
        vec![
            Some("chitetsu_bus-5007".to_string()),
            Some("chitetsu_bus-5008".to_string()),
        ]
    );

    let lat = batches[0]
        .column_by_name("lat")
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert_eq!(lat.value(0), 36.7);
    assert!(lat.is_null(1));
}

#[test]
fn test_end_to_end_idempotent() {
    let dir = seeded_input();
    let engine = IngestEngine::new(config_for(&dir)).unwrap();
    let path = dir.path().join("bronze/toei/trip_updates/20250101.parquet");

    engine.run().unwrap();
    let first = string_column(&read_parquet(&path), "trip_id");
    engine.run().unwrap();
    let second = string_column(&read_parquet(&path), "trip_id");

    assert_eq!(first, second);
    assert_eq!(parquet_files(&dir.path().join("bronze")).len(), 4);
}

#[test]
fn test_end_to_end_parallel_matches_sequential() {
    let seq_dir = seeded_input();
    let par_dir = seeded_input();

    IngestEngine::new(config_for(&seq_dir)).unwrap().run().unwrap();
    let par_config = IngestConfig {
        parallel: true,
        ..config_for(&par_dir)
    };
    IngestEngine::new(par_config).unwrap().run().unwrap();

    let seq_bronze = seq_dir.path().join("bronze");
    let par_bronze = par_dir.path().join("bronze");
    let files = parquet_files(&seq_bronze);
    assert_eq!(files, parquet_files(&par_bronze));

    for file in files {
        let seq = read_parquet(&seq_bronze.join(&file));
        let par = read_parquet(&par_bronze.join(&file));
        assert_eq!(
            string_column(&seq, "snapshot_filename"),
            string_column(&par, "snapshot_filename")
        );
        assert_eq!(string_column(&seq, "trip_id"), string_column(&par, "trip_id"));
    }
}

#[test]
fn test_end_to_end_filtered_inspect_and_codec() {
    let dir = seeded_input();
    let config = IngestConfig {
        feeds: FeedSelector::TripUpdates,
        agency_filter: Some("toei".to_string()),
        inspect: true,
        parquet: gtfsrt_bronze::config::ParquetSettings {
            compression: CompressionCodec::Snappy,
            ..Default::default()
        },
        ..config_for(&dir)
    };
    IngestEngine::new(config).unwrap().run().unwrap();

    let bronze = dir.path().join("bronze");
    assert_eq!(
        parquet_files(&bronze),
        vec![
            PathBuf::from("toei/trip_updates/20250101.parquet"),
            PathBuf::from("toei/trip_updates/20250102.parquet"),
        ]
    );

    let inspect = fs::read_to_string(bronze.join("_inspect/trip_updates.jsonl")).unwrap();
    let rows: Vec<Value> = inspect
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let ids: Vec<_> = rows.iter().map(|r| r["trip_id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["toei-early", "toei-late", "toei-day2"]);
    assert_eq!(rows[0]["delay"], 30);
}

#[test]
fn test_missing_input_dir_fails_run() {
    let dir = tempdir().unwrap();
    let engine = IngestEngine::new(config_for(&dir)).unwrap();
    assert!(engine.run().is_err());
}

// ============================================================================
// Library Composition Tests
// ============================================================================

#[test]
fn test_aggregate_then_write_cross_product() {
    let dir = tempdir().unwrap();
    let raw = dir.path().join("raw");
    for (agency, date, time) in [
        ("A", "20250101", "100000"),
        ("B", "20250101", "100000"),
        ("A", "20250102", "100000"),
    ] {
        write_snapshot(
            &raw,
            &format!("gtfs_rt_trip_updates_{agency}_{date}_{time}.json"),
            &json!({"trip_updates": [{"trip_id": format!("{agency}-{date}")}]}),
        );
    }

    let aggregation = aggregate_snapshots(&raw, FeedKind::TripUpdates).unwrap();
    assert_eq!(aggregation.table.len(), 3);

    let out = dir.path().join("out");
    let report = write_partitioned(aggregation.table, &out, &Default::default());
    assert!(report.is_complete());

    // B/20250102 has no rows and must not exist
    assert_eq!(
        parquet_files(&out),
        vec![
            PathBuf::from("A/trip_updates/20250101.parquet"),
            PathBuf::from("A/trip_updates/20250102.parquet"),
            PathBuf::from("B/trip_updates/20250101.parquet"),
        ]
    );
}

#[test]
fn test_empty_input_produces_empty_table() {
    let dir = tempdir().unwrap();
    let aggregation = aggregate_snapshots(dir.path(), FeedKind::VehiclePositions).unwrap();
    assert_eq!(aggregation.table, FeedTable::empty(FeedKind::VehiclePositions));
}
