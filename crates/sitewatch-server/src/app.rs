use crate::state::AppState;
use crate::{api, logging};
use axum::middleware;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "sitewatch API",
        description = "Live sensor telemetry and threshold alerting",
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Ingest", description = "Raw sensor payload intake"),
        (name = "Channels", description = "Channel registry and series snapshots"),
        (name = "Alerts", description = "Alert rules and event log"),
        (name = "Dashboard", description = "Aggregated overview")
    )
)]
struct ApiDoc;

pub fn build_http_app(state: AppState) -> Router {
    let (router, api_spec) = api::routes().split_for_parts();

    let mut spec = ApiDoc::openapi();
    spec.merge(api_spec);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/v1/openapi.json", spec))
        .layer(cors)
        .layer(middleware::from_fn(logging::request_logging))
}
