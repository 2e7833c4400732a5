use crate::api::success_response;
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sitewatch_common::now_ms;
use sitewatch_ingest::{channels_for_source, normalize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
struct IngestParams {
    /// Raw source document path (e.g. `raspi/sensors/dht`).
    path: String,
}

#[derive(Serialize, ToSchema)]
struct IngestResponse {
    /// Channels that produced a reading from this payload.
    accepted: usize,
    /// Channels registered for the source path.
    channels: usize,
}

/// Push one raw sensor payload.
///
/// The payload fans out to every channel fed by the source path. Channels
/// whose required fields are absent or malformed are skipped silently;
/// unknown paths are accepted and dropped.
#[utoipa::path(
    post,
    path = "/v1/ingest",
    tag = "Ingest",
    params(IngestParams),
    request_body = Value,
    responses(
        (status = 202, description = "Payload accepted", body = IngestResponse)
    )
)]
async fn ingest_payload(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(params): Query<IngestParams>,
    Json(raw): Json<Value>,
) -> impl IntoResponse {
    let received_at = now_ms();
    let specs: Vec<_> = channels_for_source(&params.path).collect();
    if specs.is_empty() {
        tracing::debug!(path = %params.path, "payload for unknown source path dropped");
    }

    let mut accepted = 0usize;
    {
        let mut buffer = state
            .buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for spec in &specs {
            match normalize(&spec.kind, &raw, received_at) {
                Some(reading) => {
                    buffer.ingest(spec.id, reading, received_at);
                    accepted += 1;
                }
                None => {
                    tracing::debug!(channel = spec.id, "malformed payload field set skipped");
                }
            }
        }
    }

    success_response(
        StatusCode::ACCEPTED,
        &trace_id,
        IngestResponse {
            accepted,
            channels: specs.len(),
        },
    )
}

pub fn ingest_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(ingest_payload))
}
