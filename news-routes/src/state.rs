use crate::service::NewsService;
use axum::extract::FromRef;
use engine::telemetry::Telemetry;
use news_core::NewsEngine;

#[derive(Clone)]
pub struct NewsAppState<N: NewsEngine> {
    pub service: NewsService<N>,
}

impl<N: NewsEngine> NewsAppState<N> {
    pub fn new(engine: N, telemetry: Telemetry) -> Self {
        Self {
            service: NewsService::new(engine, telemetry),
        }
    }
}

impl<N: NewsEngine> FromRef<NewsAppState<N>> for NewsService<N> {
    fn from_ref(input: &NewsAppState<N>) -> Self {
        input.service.clone()
    }
}
