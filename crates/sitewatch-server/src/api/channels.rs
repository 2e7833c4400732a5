use crate::api::{error_response, success_response};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use sitewatch_common::now_ms;
use sitewatch_common::types::Reading;
use sitewatch_series::TimeRange;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// One registered channel with its live status.
#[derive(Serialize, ToSchema)]
struct ChannelResponse {
    id: String,
    name: String,
    unit: String,
    kind: String,
    /// An ingest was received within the liveness timeout.
    online: bool,
    latest: Option<Reading>,
    /// Wall-clock receipt time of the last ingest, ms since epoch.
    last_ingest_ms: Option<i64>,
}

/// List registered channels with latest reading and liveness.
#[utoipa::path(
    get,
    path = "/v1/channels",
    tag = "Channels",
    responses(
        (status = 200, description = "Registered channels", body = Vec<ChannelResponse>)
    )
)]
async fn list_channels(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let now = now_ms();
    let liveness_ms = state.config.liveness_timeout_secs as i64 * 1000;
    let buffer = state
        .buffer
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let items: Vec<ChannelResponse> = sitewatch_ingest::registry()
        .iter()
        .map(|spec| {
            let view = buffer.view(spec.id);
            ChannelResponse {
                id: spec.id.to_string(),
                name: spec.name.to_string(),
                unit: spec.unit.to_string(),
                kind: spec.kind.name().to_string(),
                online: view
                    .last_ingest_ms
                    .is_some_and(|t| now - t <= liveness_ms),
                latest: view.latest,
                last_ingest_ms: view.last_ingest_ms,
            }
        })
        .collect();

    success_response(StatusCode::OK, &trace_id, items)
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
struct SeriesParams {
    /// Channel id (e.g. `raspi/sensors/dht/temp`).
    channel: String,
    /// Time range: `15m`, `1h`, `6h` or `24h`. Defaults to `1h`.
    #[param(required = false)]
    range: Option<String>,
}

#[derive(Serialize, ToSchema)]
struct SeriesResponse {
    channel_id: String,
    range: String,
    points: Vec<Reading>,
}

/// Snapshot of a channel's windowed series.
///
/// The snapshot is detached: it never shares state with the live buffer.
#[utoipa::path(
    get,
    path = "/v1/series",
    tag = "Channels",
    params(SeriesParams),
    responses(
        (status = 200, description = "Windowed series", body = SeriesResponse),
        (status = 400, description = "Invalid range", body = crate::api::ApiError),
        (status = 404, description = "Unknown channel", body = crate::api::ApiError)
    )
)]
async fn channel_series(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(params): Query<SeriesParams>,
) -> impl IntoResponse {
    if sitewatch_ingest::channel(&params.channel).is_none() {
        return error_response(
            StatusCode::NOT_FOUND,
            &trace_id,
            "not_found",
            &format!("unknown channel '{}'", params.channel),
        );
    }

    let range: TimeRange = match params.range.as_deref().unwrap_or("1h").parse() {
        Ok(range) => range,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &trace_id, "bad_request", &e);
        }
    };

    let now = now_ms();
    let mut points = {
        let buffer = state
            .buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        buffer.series(&params.channel)
    };
    // The buffer retains the configured window; a narrower range filters here.
    points.retain(|r| now - r.timestamp_ms <= range.as_millis());

    success_response(
        StatusCode::OK,
        &trace_id,
        SeriesResponse {
            channel_id: params.channel,
            range: range.to_string(),
            points,
        },
    )
}

pub fn channel_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_channels))
        .routes(routes!(channel_series))
}
