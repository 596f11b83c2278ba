use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Router, middleware};
use engine::telemetry::{Telemetry, track_http};
use news_core::NewsEngine;
use news_routes::routes::NewsDocs;
use news_routes::state::NewsAppState;
use topics_core::TopicEngine;
use topics_routes::routes::TopicDocs;
use topics_routes::state::TopicAppState;
use tracing::{debug, info};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

const API_PREFIX: &str = "/api/v1";

#[derive(OpenApi)]
#[openapi(
    info(title = "News Portal API", description = "Topics, news, and the links between them"),
    nest(
        (path = "/api/v1/topics", api = TopicDocs),
        (path = "/api/v1/news", api = NewsDocs),
    )
)]
struct ApiDoc;

/// Everything the service answers: the versioned API, health, metrics, and the docs.
pub fn build<E>(engine: E, telemetry: Telemetry) -> Router
where
    E: TopicEngine + NewsEngine,
{
    let api = OpenApiRouter::new()
        .merge(topics_routes::routes::routes(TopicAppState::new(
            engine.clone(),
            telemetry.clone(),
        )))
        .merge(news_routes::routes::routes(NewsAppState::new(
            engine,
            telemetry.clone(),
        )));

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest(API_PREFIX, api)
        .split_for_parts();

    let metrics = if telemetry.is_enabled() {
        info!("metrics enabled, serving /metrics");
        Router::new().route("/metrics", get(render_metrics))
    } else {
        info!("metrics not enabled, /metrics will answer with service unavailable");
        Router::new().route("/metrics", get(metrics_disabled))
    };

    debug!("routes built");
    router
        .route("/", get(health))
        .merge(metrics.with_state(telemetry.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(middleware::from_fn_with_state(telemetry, track_http))
}

async fn health() -> &'static str {
    "All is well!"
}

async fn render_metrics(State(telemetry): State<Telemetry>) -> Response {
    telemetry
        .render()
        .map(IntoResponse::into_response)
        .unwrap_or_else(metrics_disabled_response)
}

async fn metrics_disabled() -> Response {
    metrics_disabled_response()
}

fn metrics_disabled_response() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        "Metrics endpoint is disabled. Metrics must be enabled and the service restarted",
    )
        .into_response()
}
