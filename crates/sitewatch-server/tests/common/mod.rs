#![allow(dead_code)]

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sitewatch_server::app;
use sitewatch_server::config::ServerConfig;
use sitewatch_server::state::AppState;
use sitewatch_store::RuleStore;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub struct TestContext {
    pub temp_dir: TempDir,
    pub state: AppState,
    pub app: axum::Router,
}

pub fn build_test_context() -> Result<TestContext> {
    let temp_dir = tempfile::tempdir()?;
    let config = ServerConfig {
        data_dir: temp_dir.path().to_string_lossy().to_string(),
        ..ServerConfig::default()
    };
    let store = RuleStore::open(temp_dir.path())?;
    let state = AppState::new(config, store);
    let app = app::build_http_app(state.clone());

    Ok(TestContext {
        temp_dir,
        state,
        app,
    })
}

pub async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value, Option<String>) {
    let mut builder = Request::builder().method(method).uri(uri);
    builder = builder.header("Content-Type", "application/json");

    let req_body = body.unwrap_or(Value::Null).to_string();
    let req = builder
        .body(Body::from(req_body))
        .expect("request should build");

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");

    let status = resp.status();
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    (status, json, trace_id)
}

pub async fn request_no_body(
    app: &axum::Router,
    method: &str,
    uri: &str,
) -> (StatusCode, Value, Option<String>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");
    let status = resp.status();
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    (status, json, trace_id)
}

pub fn assert_ok_envelope(json: &Value) {
    assert_eq!(json["err_code"], 0);
    assert_eq!(json["err_msg"], "success");
    assert!(json.get("trace_id").is_some());
}

pub fn assert_err_envelope(json: &Value, err_code: i32) {
    assert_eq!(json["err_code"], err_code);
    assert!(json["err_msg"].is_string());
    assert!(json.get("trace_id").is_some());
    assert!(json["data"].is_null());
}
