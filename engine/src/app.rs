use axum::Router;
use axum::http::StatusCode;
use axum::response::Response;
use error_stack::{Report, ResultExt};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{Span, info, warn};

pub struct AppProperties {
    pub host: IpAddr,
    pub port: u16,
    pub request_timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
#[error("the app exited with an error")]
pub struct AppError;

pub type AppResult<T> = Result<T, Report<AppError>>;

pub async fn run(routes: Router, properties: AppProperties) -> AppResult<()> {
    let listener = build_listener(properties.host, properties.port).await?;

    let routes = with_request_layers(routes, properties.request_timeout);

    info!(
        "starting up news service on {}",
        listener.local_addr().change_context(AppError)?
    );

    serve_on(listener, routes).await
}

/// Request logging, and a 408 for handlers that run past `request_timeout`.
fn with_request_layers(routes: Router, request_timeout: Duration) -> Router {
    routes.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http().on_response(
                |res: &Response, latency: Duration, _span: &Span| {
                    info!("returned {} in {}ms", res.status(), latency.as_millis());
                },
            ))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                request_timeout,
            )),
    )
}

async fn serve_on(listener: TcpListener, routes: Router) -> AppResult<()> {
    axum::serve(listener, routes)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .change_context(AppError)
}

async fn build_listener(host: IpAddr, port: u16) -> AppResult<TcpListener> {
    TcpListener::bind(SocketAddr::new(host, port))
        .await
        .change_context(AppError)
        .attach_with(|| format!("could not bind to {host}:{port}"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        // without a signal handler the server runs until the process is killed
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received, draining connections..");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use tower::ServiceExt;

    fn request() -> Request<Body> {
        Request::builder().uri("/").body(Body::empty()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn slow_handler_times_out() {
        let routes = Router::new().route(
            "/",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                "late"
            }),
        );

        let response = with_request_layers(routes, Duration::from_secs(1))
            .oneshot(request())
            .await
            .unwrap();

        assert_eq!(StatusCode::REQUEST_TIMEOUT, response.status());
    }

    #[tokio::test(start_paused = true)]
    async fn fast_handler_answers() {
        let routes = Router::new().route("/", get(|| async { "on time" }));

        let response = with_request_layers(routes, Duration::from_secs(1))
            .oneshot(request())
            .await
            .unwrap();

        assert_eq!(StatusCode::OK, response.status());
    }
}
