//! Tests for decoder module

use super::*;
use crate::error::Error;
use crate::types::FeedKind;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn test_decode_feed_object() {
    let value = decode_feed(br#"{"entity": []}"#).unwrap();
    assert_eq!(value, json!({"entity": []}));
}

#[test]
fn test_decode_feed_invalid() {
    let err = decode_feed(b"{\"entity\": [").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("Failed to parse JSON"));
}

#[test]
fn test_read_feed_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"trip_updates": [{{"trip_id": "t1"}}]}}"#).unwrap();

    let value = read_feed(file.path()).unwrap();
    assert_eq!(value["trip_updates"][0]["trip_id"], "t1");
}

#[test]
fn test_read_feed_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_feed(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("Failed to read"));
}

#[test]
fn test_read_feed_invalid_utf8() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[0xff, 0xfe, 0x00]).unwrap();
    assert!(matches!(
        read_feed(file.path()),
        Err(Error::Decode { .. })
    ));
}

// ============================================================================
// Shape detection
// ============================================================================

#[test]
fn test_detect_flat_list() {
    let feed = json!({"trip_updates": [{"trip_id": "a"}, {"trip_id": "b"}]});
    let shape = FeedShape::detect(&feed, FeedKind::TripUpdates).unwrap();
    assert!(shape.is_flat());
    assert_eq!(shape.items().len(), 2);
}

#[test]
fn test_detect_flat_key_is_kind_specific() {
    // A trip_updates list says nothing about vehicle positions
    let feed = json!({"trip_updates": [{"trip_id": "a"}]});
    let shape = FeedShape::detect(&feed, FeedKind::VehiclePositions).unwrap();
    assert_eq!(shape, FeedShape::EntityWrapper(&[]));
}

#[test]
fn test_detect_flat_key_not_a_list_falls_back() {
    let feed = json!({
        "trip_updates": {"count": 3},
        "entity": [{"id": "1", "trip_update": {}}]
    });
    let shape = FeedShape::detect(&feed, FeedKind::TripUpdates).unwrap();
    assert!(!shape.is_flat());
    assert_eq!(shape.items().len(), 1);
}

#[test]
fn test_detect_entity_wrapper() {
    let feed = json!({"header": {"gtfs_realtime_version": "2.0"}, "entity": [{"id": "1"}]});
    let shape = FeedShape::detect(&feed, FeedKind::VehiclePositions).unwrap();
    assert!(matches!(shape, FeedShape::EntityWrapper(items) if items.len() == 1));
}

#[test]
fn test_detect_missing_or_null_entity_is_empty() {
    for feed in [json!({}), json!({"entity": null})] {
        let shape = FeedShape::detect(&feed, FeedKind::TripUpdates).unwrap();
        assert_eq!(shape, FeedShape::EntityWrapper(&[]));
    }
}

#[test]
fn test_detect_rejects_bad_shapes() {
    let not_object = json!([1, 2, 3]);
    assert!(matches!(
        FeedShape::detect(&not_object, FeedKind::TripUpdates),
        Err(Error::Normalization { .. })
    ));

    let entity_scalar = json!({"entity": "oops"});
    assert!(matches!(
        FeedShape::detect(&entity_scalar, FeedKind::VehiclePositions),
        Err(Error::Normalization {
            kind: FeedKind::VehiclePositions,
            ..
        })
    ));
}
