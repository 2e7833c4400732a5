use crate::channels::{ChannelKind, CountField};
use serde_json::Value;
use sitewatch_common::types::{Reading, ReadingStatus};

/// Convert a raw source payload into a [`Reading`] for one channel kind.
///
/// Returns `None` when a required numeric field is absent or not a number;
/// callers treat that as a silent skip, not an error. A missing source
/// timestamp falls back to `received_at_ms`, the wall-clock receipt time
/// supplied by the caller.
pub fn normalize(kind: &ChannelKind, raw: &Value, received_at_ms: i64) -> Option<Reading> {
    let timestamp_ms = source_timestamp_ms(raw).unwrap_or(received_at_ms);

    match kind {
        ChannelKind::Detector => {
            let value = number(raw, "value")?;
            let status = match raw.get("detect").and_then(Value::as_bool) {
                Some(true) => ReadingStatus::Critical,
                _ => ReadingStatus::Ok,
            };
            Some(Reading {
                timestamp_ms,
                value,
                status: Some(status),
            })
        }
        ChannelKind::Environment(field) => {
            let value = number(raw, field.key())?;
            Some(Reading {
                timestamp_ms,
                value,
                status: None,
            })
        }
        ChannelKind::Vibration => {
            let value = number(raw, "magnitude")?;
            let status = match raw.get("is_shaking").and_then(Value::as_bool) {
                Some(true) => ReadingStatus::Warn,
                _ => ReadingStatus::Ok,
            };
            Some(Reading {
                timestamp_ms,
                value,
                status: Some(status),
            })
        }
        ChannelKind::Headcount(field) => {
            if !raw.is_object() {
                return None;
            }
            // Counts are sparse: a class with no detections is simply absent.
            let value = match field {
                CountField::Total => number(raw, "total").unwrap_or(0.0),
                CountField::Class(class) => raw
                    .get("classes")
                    .and_then(|c| c.get(class))
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0),
            };
            Some(Reading {
                timestamp_ms,
                value,
                status: None,
            })
        }
    }
}

/// Source `ts` is seconds with a fractional part; floor to integer ms.
fn source_timestamp_ms(raw: &Value) -> Option<i64> {
    let secs = raw.get("ts")?.as_f64()?;
    Some((secs * 1000.0).floor() as i64)
}

fn number(raw: &Value, key: &str) -> Option<f64> {
    raw.get(key)?.as_f64()
}
