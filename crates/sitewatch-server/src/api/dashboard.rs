use crate::api::success_response;
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Serialize;
use sitewatch_common::now_ms;
use sitewatch_common::types::Severity;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Dashboard overview.
#[derive(Serialize, ToSchema)]
struct DashboardOverview {
    channel_count: usize,
    online_channels: usize,
    /// Channels currently in warn state.
    warn_channels: usize,
    /// Channels currently in critical state.
    critical_channels: usize,
    unacknowledged_events: usize,
    total_events: usize,
    /// Opaque camera stream URL, if configured. The feed itself is not
    /// proxied or processed here.
    camera_stream_url: Option<String>,
    uptime_secs: i64,
}

/// Aggregated dashboard counters.
#[utoipa::path(
    get,
    path = "/v1/dashboard/overview",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard overview", body = DashboardOverview)
    )
)]
async fn dashboard_overview(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let now = now_ms();
    let liveness_ms = state.config.liveness_timeout_secs as i64 * 1000;

    let online_channels = {
        let buffer = state
            .buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sitewatch_ingest::registry()
            .iter()
            .filter(|spec| {
                buffer
                    .last_ingest_ms(spec.id)
                    .is_some_and(|t| now - t <= liveness_ms)
            })
            .count()
    };

    let (warn_channels, critical_channels) = {
        let alerts = state
            .alerts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let warn = alerts.active().filter(|(_, s)| *s == Severity::Warn).count();
        let critical = alerts
            .active()
            .filter(|(_, s)| *s == Severity::Critical)
            .count();
        (warn, critical)
    };

    let (unacknowledged_events, total_events) = {
        let store = state
            .store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        (store.unacknowledged(), store.events().len())
    };

    success_response(
        StatusCode::OK,
        &trace_id,
        DashboardOverview {
            channel_count: sitewatch_ingest::registry().len(),
            online_channels,
            warn_channels,
            critical_channels,
            unacknowledged_events,
            total_events,
            camera_stream_url: state.config.camera.stream_url.clone(),
            uptime_secs: (Utc::now() - state.start_time).num_seconds(),
        },
    )
}

pub fn dashboard_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(dashboard_overview))
}
