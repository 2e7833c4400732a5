use crate::api::{error_response, success_response};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use sitewatch_alert::defaults;
use sitewatch_common::types::{AlertEvent, AlertRule, CompareOp};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Threshold form bounds (validation failures block the save).
const THRESHOLD_MIN: f64 = -1000.0;
const THRESHOLD_MAX: f64 = 10000.0;
const WINDOW_SECS_MIN: u32 = 1;
const WINDOW_SECS_MAX: u32 = 3600;

/// Effective rule for a channel, with its provenance.
#[derive(Serialize, ToSchema)]
struct EffectiveRuleResponse {
    channel_id: String,
    threshold: f64,
    op: CompareOp,
    window_secs: u32,
    enabled: bool,
    /// `explicit`, `default` or `generic`.
    source: String,
}

/// Effective rule per registered channel (explicit > default > generic).
#[utoipa::path(
    get,
    path = "/v1/alerts/rules",
    tag = "Alerts",
    responses(
        (status = 200, description = "Effective rules", body = Vec<EffectiveRuleResponse>)
    )
)]
async fn list_rules(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let store = state
        .store
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let items: Vec<EffectiveRuleResponse> = sitewatch_ingest::registry()
        .iter()
        .map(|spec| {
            let (rule, source) = defaults::resolve(spec.id, store.rule(spec.id));
            EffectiveRuleResponse {
                channel_id: rule.channel_id,
                threshold: rule.threshold,
                op: rule.op,
                window_secs: rule.window_secs,
                enabled: rule.enabled,
                source: source.as_str().to_string(),
            }
        })
        .collect();

    success_response(StatusCode::OK, &trace_id, items)
}

#[derive(Deserialize, ToSchema)]
struct UpsertRuleRequest {
    channel_id: String,
    threshold: f64,
    op: CompareOp,
    window_secs: u32,
    enabled: bool,
}

fn validate_rule(req: &UpsertRuleRequest) -> Result<(), String> {
    if !req.threshold.is_finite() || !(THRESHOLD_MIN..=THRESHOLD_MAX).contains(&req.threshold) {
        return Err(format!(
            "threshold must be a number between {THRESHOLD_MIN} and {THRESHOLD_MAX}"
        ));
    }
    if !(WINDOW_SECS_MIN..=WINDOW_SECS_MAX).contains(&req.window_secs) {
        return Err(format!(
            "window_secs must be between {WINDOW_SECS_MIN} and {WINDOW_SECS_MAX}"
        ));
    }
    Ok(())
}

/// Create or replace a channel's alert rule.
#[utoipa::path(
    put,
    path = "/v1/alerts/rules",
    tag = "Alerts",
    request_body = UpsertRuleRequest,
    responses(
        (status = 200, description = "Rule saved", body = EffectiveRuleResponse),
        (status = 400, description = "Validation failed", body = crate::api::ApiError),
        (status = 404, description = "Unknown channel", body = crate::api::ApiError)
    )
)]
async fn upsert_rule(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Json(req): Json<UpsertRuleRequest>,
) -> impl IntoResponse {
    if sitewatch_ingest::channel(&req.channel_id).is_none() {
        return error_response(
            StatusCode::NOT_FOUND,
            &trace_id,
            "not_found",
            &format!("unknown channel '{}'", req.channel_id),
        );
    }
    if let Err(msg) = validate_rule(&req) {
        return error_response(StatusCode::BAD_REQUEST, &trace_id, "bad_request", &msg);
    }

    let rule = AlertRule {
        channel_id: req.channel_id,
        threshold: req.threshold,
        op: req.op,
        window_secs: req.window_secs,
        enabled: req.enabled,
    };

    let mut store = state
        .store
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Err(e) = store.set_rule(rule.clone()) {
        tracing::error!(error = %e, "failed to persist rule");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &trace_id,
            "storage_error",
            "failed to persist rule",
        );
    }

    success_response(
        StatusCode::OK,
        &trace_id,
        EffectiveRuleResponse {
            channel_id: rule.channel_id,
            threshold: rule.threshold,
            op: rule.op,
            window_secs: rule.window_secs,
            enabled: rule.enabled,
            source: defaults::RuleSource::Explicit.as_str().to_string(),
        },
    )
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
struct RuleChannelParams {
    /// Channel id whose explicit rule to delete.
    channel: String,
}

/// Delete a channel's explicit rule; the channel falls back to its default.
#[utoipa::path(
    delete,
    path = "/v1/alerts/rules",
    tag = "Alerts",
    params(RuleChannelParams),
    responses(
        (status = 200, description = "Rule removed"),
        (status = 404, description = "No explicit rule", body = crate::api::ApiError)
    )
)]
async fn delete_rule(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(params): Query<RuleChannelParams>,
) -> impl IntoResponse {
    let mut store = state
        .store
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    match store.remove_rule(&params.channel) {
        Ok(true) => success_response(StatusCode::OK, &trace_id, params.channel),
        Ok(false) => error_response(
            StatusCode::NOT_FOUND,
            &trace_id,
            "not_found",
            &format!("no explicit rule for channel '{}'", params.channel),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to persist rule removal");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "storage_error",
                "failed to persist rule removal",
            )
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
struct EventListParams {
    /// Maximum events to return (the log itself holds at most 100).
    #[param(required = false)]
    limit: Option<usize>,
}

/// Alert event log, most recent first.
#[utoipa::path(
    get,
    path = "/v1/alerts/events",
    tag = "Alerts",
    params(EventListParams),
    responses(
        (status = 200, description = "Alert events", body = Vec<AlertEvent>)
    )
)]
async fn list_events(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(params): Query<EventListParams>,
) -> impl IntoResponse {
    let store = state
        .store
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut events: Vec<AlertEvent> = store.events().to_vec();
    if let Some(limit) = params.limit {
        events.truncate(limit);
    }
    success_response(StatusCode::OK, &trace_id, events)
}

#[derive(Deserialize, ToSchema)]
struct AckRequest {
    event_id: String,
}

/// Acknowledge an alert event.
#[utoipa::path(
    post,
    path = "/v1/alerts/events/acknowledge",
    tag = "Alerts",
    request_body = AckRequest,
    responses(
        (status = 200, description = "Event acknowledged"),
        (status = 404, description = "Unknown event", body = crate::api::ApiError)
    )
)]
async fn acknowledge_event(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Json(req): Json<AckRequest>,
) -> impl IntoResponse {
    let mut store = state
        .store
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    match store.ack_event(&req.event_id) {
        Ok(true) => success_response(StatusCode::OK, &trace_id, req.event_id),
        Ok(false) => error_response(
            StatusCode::NOT_FOUND,
            &trace_id,
            "not_found",
            &format!("unknown event '{}'", req.event_id),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to persist acknowledgment");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "storage_error",
                "failed to persist acknowledgment",
            )
        }
    }
}

pub fn alert_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_rules, upsert_rule, delete_rule))
        .routes(routes!(list_events))
        .routes(routes!(acknowledge_event))
}
