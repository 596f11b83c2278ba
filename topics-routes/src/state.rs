use crate::service::TopicService;
use axum::extract::FromRef;
use engine::telemetry::Telemetry;
use topics_core::TopicEngine;

#[derive(Clone)]
pub struct TopicAppState<T: TopicEngine> {
    pub service: TopicService<T>,
}

impl<T: TopicEngine> TopicAppState<T> {
    pub fn new(engine: T, telemetry: Telemetry) -> Self {
        Self {
            service: TopicService::new(engine, telemetry),
        }
    }
}

impl<T: TopicEngine> FromRef<TopicAppState<T>> for TopicService<T> {
    fn from_ref(input: &TopicAppState<T>) -> Self {
        input.service.clone()
    }
}
