//! Metrics recorded into an explicitly owned Prometheus registry.
//!
//! The recorder is never installed as the process wide recorder, so every
//! component that records a metric has to be handed a [`Telemetry`].

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use error_stack::{Report, ResultExt};
use metrics::{Key, Label, Level, Metadata, Recorder};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use std::sync::Arc;
use std::time::Instant;

const REQUESTS_TOTAL_METRIC_NAME: &str = "http_requests_total";
const REQUEST_DURATION_METRIC_NAME: &str = "http_requests_duration_seconds";
const REQUEST_SIZE_METRIC_NAME: &str = "http_request_size";

static METADATA: Metadata<'static> = Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

#[derive(Debug, thiserror::Error)]
#[error("failed to build metrics recorder")]
pub struct TelemetryError;

struct Inner {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

#[derive(Clone)]
pub struct Telemetry {
    inner: Option<Arc<Inner>>,
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Telemetry {
    pub fn prometheus() -> Result<Self, Report<TelemetryError>> {
        const EXPONENTIAL_SECONDS: &[f64] =
            &[0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

        const REQ_RES_BUCKETS: &[f64] =
            &[128.0, 256.0, 512.0, 1024.0, 2048.0, 4096.0, 8192.0, 16384.0];

        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(REQUEST_DURATION_METRIC_NAME.to_string()),
                EXPONENTIAL_SECONDS,
            )
            .change_context(TelemetryError)?
            .set_buckets_for_metric(
                Matcher::Full(REQUEST_SIZE_METRIC_NAME.to_string()),
                REQ_RES_BUCKETS,
            )
            .change_context(TelemetryError)?
            .build_recorder();

        let handle = recorder.handle();

        Ok(Self {
            inner: Some(Arc::new(Inner { recorder, handle })),
        })
    }

    /// A context that drops everything recorded into it.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    pub fn increment(&self, name: &'static str) {
        self.increment_labeled(name, Vec::new());
    }

    pub fn increment_labeled(&self, name: &'static str, labels: Vec<Label>) {
        if let Some(inner) = &self.inner {
            inner
                .recorder
                .register_counter(&Key::from_parts(name, labels), &METADATA)
                .increment(1);
        }
    }

    pub fn record(&self, name: &'static str, labels: Vec<Label>, value: f64) {
        if let Some(inner) = &self.inner {
            inner
                .recorder
                .register_histogram(&Key::from_parts(name, labels), &METADATA)
                .record(value);
        }
    }

    /// Renders the registry in the Prometheus text format, `None` when disabled.
    pub fn render(&self) -> Option<String> {
        self.inner.as_ref().map(|inner| inner.handle.render())
    }
}

/// Middleware recording request counts, latencies, and sizes.
pub async fn track_http(
    State(telemetry): State<Telemetry>,
    req: Request,
    next: Next,
) -> Response {
    let path = if let Some(matched_path) = req.extensions().get::<MatchedPath>() {
        matched_path.as_str().to_owned()
    } else {
        req.uri().path().to_owned()
    };

    if !telemetry.is_enabled() || path.ends_with("metrics") {
        return next.run(req).await;
    }

    let method = req.method().clone();

    let req_size = req
        .headers()
        .get("Content-Length")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok());

    if let Some(req_size) = req_size {
        telemetry.record(REQUEST_SIZE_METRIC_NAME, Vec::new(), req_size as f64);
    }

    let start = Instant::now();
    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    let labels = vec![
        Label::new("method", method.to_string()),
        Label::new("path", path),
        Label::new("status", status),
    ];

    telemetry.increment_labeled(REQUESTS_TOTAL_METRIC_NAME, labels.clone());
    telemetry.record(REQUEST_DURATION_METRIC_NAME, labels, latency);

    response
}
