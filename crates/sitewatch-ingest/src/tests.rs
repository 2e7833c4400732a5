use crate::channels::{self, ChannelKind, CountField, EnvField};
use crate::normalize::normalize;
use serde_json::json;
use sitewatch_common::types::ReadingStatus;

const RECEIVED: i64 = 1_700_000_000_000;

#[test]
fn detector_maps_detect_flag_to_status() {
    let raw = json!({"value": 412.0, "detect": true, "ts": 1764491064.09, "src": "node"});
    let reading = normalize(&ChannelKind::Detector, &raw, RECEIVED).unwrap();
    assert_eq!(reading.value, 412.0);
    assert_eq!(reading.timestamp_ms, 1_764_491_064_090);
    assert_eq!(reading.status, Some(ReadingStatus::Critical));

    let raw = json!({"value": 3.0, "detect": false, "ts": 1764491064.0});
    let reading = normalize(&ChannelKind::Detector, &raw, RECEIVED).unwrap();
    assert_eq!(reading.status, Some(ReadingStatus::Ok));
}

#[test]
fn detector_without_value_is_invalid() {
    assert!(normalize(&ChannelKind::Detector, &json!({"detect": true}), RECEIVED).is_none());
    assert!(normalize(&ChannelKind::Detector, &json!({"value": "high"}), RECEIVED).is_none());
    assert!(normalize(&ChannelKind::Detector, &json!(null), RECEIVED).is_none());
}

#[test]
fn missing_timestamp_falls_back_to_receipt_time() {
    let raw = json!({"value": 1.0});
    let reading = normalize(&ChannelKind::Detector, &raw, RECEIVED).unwrap();
    assert_eq!(reading.timestamp_ms, RECEIVED);

    // Non-numeric ts also falls back.
    let raw = json!({"value": 1.0, "ts": "yesterday"});
    let reading = normalize(&ChannelKind::Detector, &raw, RECEIVED).unwrap();
    assert_eq!(reading.timestamp_ms, RECEIVED);
}

#[test]
fn environment_selects_field_and_leaves_status_unset() {
    let raw = json!({"temperature_c": 24.5, "humidity_pct": 61.0, "ts": 1764491000.5});
    let temp = normalize(
        &ChannelKind::Environment(EnvField::TemperatureC),
        &raw,
        RECEIVED,
    )
    .unwrap();
    assert_eq!(temp.value, 24.5);
    assert_eq!(temp.status, None);

    let humid = normalize(
        &ChannelKind::Environment(EnvField::HumidityPct),
        &raw,
        RECEIVED,
    )
    .unwrap();
    assert_eq!(humid.value, 61.0);
}

#[test]
fn environment_missing_field_is_invalid() {
    let raw = json!({"humidity_pct": 61.0});
    assert!(normalize(
        &ChannelKind::Environment(EnvField::TemperatureC),
        &raw,
        RECEIVED
    )
    .is_none());
}

#[test]
fn vibration_maps_shaking_to_warn() {
    let raw = json!({"magnitude": 3.2, "is_shaking": true, "ts": 1764491000.0});
    let reading = normalize(&ChannelKind::Vibration, &raw, RECEIVED).unwrap();
    assert_eq!(reading.value, 3.2);
    assert_eq!(reading.status, Some(ReadingStatus::Warn));

    let raw = json!({"magnitude": 0.1, "is_shaking": false});
    let reading = normalize(&ChannelKind::Vibration, &raw, RECEIVED).unwrap();
    assert_eq!(reading.status, Some(ReadingStatus::Ok));
}

#[test]
fn headcount_reads_total_and_classes_with_zero_default() {
    let raw = json!({"classes": {"hat": 2.0, "person": 3.0}, "total": 5.0, "ts": 1764491000.0});
    let total = normalize(&ChannelKind::Headcount(CountField::Total), &raw, RECEIVED).unwrap();
    assert_eq!(total.value, 5.0);
    assert_eq!(total.status, None);

    let hats = normalize(
        &ChannelKind::Headcount(CountField::Class("hat")),
        &raw,
        RECEIVED,
    )
    .unwrap();
    assert_eq!(hats.value, 2.0);

    // Absent class counts default to zero rather than dropping the sample.
    let raw = json!({"total": 0.0, "ts": 1764491000.0});
    let people = normalize(
        &ChannelKind::Headcount(CountField::Class("person")),
        &raw,
        RECEIVED,
    )
    .unwrap();
    assert_eq!(people.value, 0.0);
}

#[test]
fn headcount_non_object_payload_is_invalid() {
    assert!(normalize(
        &ChannelKind::Headcount(CountField::Total),
        &json!(null),
        RECEIVED
    )
    .is_none());
}

#[test]
fn registry_lookup() {
    assert!(channels::channel("raspi/node/flame").is_some());
    assert!(channels::channel("raspi/node/unknown").is_none());

    let fed: Vec<_> = channels::channels_for_source("raspi/sensors/dht")
        .map(|c| c.id)
        .collect();
    assert_eq!(fed, vec!["raspi/sensors/dht/temp", "raspi/sensors/dht/humid"]);

    let fed: Vec<_> = channels::channels_for_source("raspi/ppe").map(|c| c.id).collect();
    assert_eq!(fed.len(), 3);
}
