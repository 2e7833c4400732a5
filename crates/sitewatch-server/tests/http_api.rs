mod common;

use axum::http::StatusCode;
use common::{assert_err_envelope, assert_ok_envelope, build_test_context, request_json, request_no_body};
use serde_json::json;
use sitewatch_common::now_ms;
use sitewatch_server::scheduler::TickScheduler;

#[tokio::test]
async fn health_returns_envelope() {
    let ctx = build_test_context().unwrap();
    let (status, body, trace_id) = request_no_body(&ctx.app, "GET", "/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_ok_envelope(&body);
    assert!(trace_id.is_some());
    assert_eq!(body["data"]["channel_count"], 9);
    assert!(body["data"]["version"].is_string());
}

#[tokio::test]
async fn channels_start_offline() {
    let ctx = build_test_context().unwrap();
    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/channels").await;

    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 9);
    for item in items {
        assert_eq!(item["online"], false);
        assert!(item["latest"].is_null());
    }
}

#[tokio::test]
async fn ingest_then_tick_exposes_series() {
    let ctx = build_test_context().unwrap();
    let ts = now_ms() as f64 / 1000.0;

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/ingest?path=raspi/sensors/dht",
        Some(json!({"temperature_c": 24.5, "humidity_pct": 61.0, "ts": ts})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_ok_envelope(&body);
    assert_eq!(body["data"]["accepted"], 2);
    assert_eq!(body["data"]["channels"], 2);

    // Pending readings are invisible until a tick merges them.
    let (_, body, _) = request_no_body(
        &ctx.app,
        "GET",
        "/v1/series?channel=raspi/sensors/dht/temp&range=15m",
    )
    .await;
    assert_eq!(body["data"]["points"].as_array().unwrap().len(), 0);

    TickScheduler::new(ctx.state.clone()).run_cycle();

    let (status, body, _) = request_no_body(
        &ctx.app,
        "GET",
        "/v1/series?channel=raspi/sensors/dht/temp&range=15m",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let points = body["data"]["points"].as_array().unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0]["value"], 24.5);

    // The channel now reports online with a latest reading.
    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/channels").await;
    let temp = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == "raspi/sensors/dht/temp")
        .unwrap();
    assert_eq!(temp["online"], true);
    assert_eq!(temp["latest"]["value"], 24.5);
}

#[tokio::test]
async fn ingest_malformed_payload_is_skipped_silently() {
    let ctx = build_test_context().unwrap();

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/ingest?path=raspi/node/flame",
        Some(json!({"detect": true})), // missing required `value`
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["accepted"], 0);
    assert_eq!(body["data"]["channels"], 1);
}

#[tokio::test]
async fn ingest_unknown_path_is_accepted_and_dropped() {
    let ctx = build_test_context().unwrap();

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/ingest?path=raspi/unknown",
        Some(json!({"value": 1.0})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["accepted"], 0);
    assert_eq!(body["data"]["channels"], 0);
}

#[tokio::test]
async fn series_rejects_unknown_channel_and_bad_range() {
    let ctx = build_test_context().unwrap();

    let (status, body, _) =
        request_no_body(&ctx.app, "GET", "/v1/series?channel=raspi/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_err_envelope(&body, 1004);

    let (status, body, _) = request_no_body(
        &ctx.app,
        "GET",
        "/v1/series?channel=raspi/node/flame&range=7d",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_err_envelope(&body, 1001);
}

#[tokio::test]
async fn rule_crud_and_validation() {
    let ctx = build_test_context().unwrap();

    // Default rule is visible before any user configuration.
    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/alerts/rules").await;
    let rules = body["data"].as_array().unwrap();
    assert_eq!(rules.len(), 9);
    let temp = rules
        .iter()
        .find(|r| r["channel_id"] == "raspi/sensors/dht/temp")
        .unwrap();
    assert_eq!(temp["source"], "default");
    assert_eq!(temp["threshold"], 30.0);

    // Upsert an explicit rule.
    let (status, body, _) = request_json(
        &ctx.app,
        "PUT",
        "/v1/alerts/rules",
        Some(json!({
            "channel_id": "raspi/sensors/dht/temp",
            "threshold": 25.0,
            "op": "gte",
            "window_secs": 30,
            "enabled": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], "explicit");

    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/alerts/rules").await;
    let temp = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["channel_id"] == "raspi/sensors/dht/temp")
        .cloned()
        .unwrap();
    assert_eq!(temp["source"], "explicit");
    assert_eq!(temp["threshold"], 25.0);

    // Validation failures block the save.
    let (status, body, _) = request_json(
        &ctx.app,
        "PUT",
        "/v1/alerts/rules",
        Some(json!({
            "channel_id": "raspi/sensors/dht/temp",
            "threshold": 50000.0,
            "op": "gt",
            "window_secs": 30,
            "enabled": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_err_envelope(&body, 1001);

    let (status, _, _) = request_json(
        &ctx.app,
        "PUT",
        "/v1/alerts/rules",
        Some(json!({
            "channel_id": "raspi/sensors/dht/temp",
            "threshold": 25.0,
            "op": "gt",
            "window_secs": 0,
            "enabled": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown channels cannot hold rules.
    let (status, _, _) = request_json(
        &ctx.app,
        "PUT",
        "/v1/alerts/rules",
        Some(json!({
            "channel_id": "raspi/nope",
            "threshold": 1.0,
            "op": "gt",
            "window_secs": 10,
            "enabled": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Delete falls back to the default.
    let (status, _, _) = request_no_body(
        &ctx.app,
        "DELETE",
        "/v1/alerts/rules?channel=raspi/sensors/dht/temp",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = request_no_body(
        &ctx.app,
        "DELETE",
        "/v1/alerts/rules?channel=raspi/sensors/dht/temp",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/alerts/rules").await;
    let temp = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["channel_id"] == "raspi/sensors/dht/temp")
        .cloned()
        .unwrap();
    assert_eq!(temp["source"], "default");
}

#[tokio::test]
async fn breach_produces_one_event_and_ack_flow_works() {
    let ctx = build_test_context().unwrap();
    let scheduler = TickScheduler::new(ctx.state.clone());
    let ts = now_ms() as f64 / 1000.0;

    // Temperature default: threshold 30, gt, 5s window, enabled.
    // 40 > 31.5 and |40-30| = 10 > 3 => critical.
    let (status, _, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/ingest?path=raspi/sensors/dht",
        Some(json!({"temperature_c": 40.0, "humidity_pct": 50.0, "ts": ts})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    // Several cycles over a sustained breach still emit exactly one event.
    for _ in 0..3 {
        scheduler.run_cycle();
    }

    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/alerts/events").await;
    assert_eq!(status, StatusCode::OK);
    let events = body["data"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["channel_id"], "raspi/sensors/dht/temp");
    assert_eq!(events[0]["severity"], "critical");
    assert_eq!(events[0]["acknowledged"], false);
    let event_id = events[0]["event_id"].as_str().unwrap().to_string();

    // Overview reflects the active alert.
    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/dashboard/overview").await;
    assert_eq!(body["data"]["critical_channels"], 1);
    assert_eq!(body["data"]["unacknowledged_events"], 1);

    // Acknowledge it.
    let (status, _, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/alerts/events/acknowledge",
        Some(json!({"event_id": event_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/alerts/events").await;
    assert_eq!(body["data"][0]["acknowledged"], true);

    // Unknown event ids are a 404.
    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/alerts/events/acknowledge",
        Some(json!({"event_id": "nope-0"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_err_envelope(&body, 1004);
}

#[tokio::test]
async fn dashboard_overview_defaults() {
    let ctx = build_test_context().unwrap();
    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/dashboard/overview").await;

    assert_eq!(status, StatusCode::OK);
    assert_ok_envelope(&body);
    assert_eq!(body["data"]["channel_count"], 9);
    assert_eq!(body["data"]["online_channels"], 0);
    assert_eq!(body["data"]["warn_channels"], 0);
    assert_eq!(body["data"]["total_events"], 0);
    assert!(body["data"]["camera_stream_url"].is_null());
}
