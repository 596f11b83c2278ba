use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// A reference to an existing topic.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TopicRef {
    pub topic_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNewsRequest {
    /// The slug is always derived from it.
    pub title: String,
    pub status: String,
    pub content: String,
    #[serde(default)]
    pub topics: Vec<TopicRef>,
}

/// Every field is optional. Leaving `topics` out keeps the current topics, an empty
/// array detaches them all.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateNewsRequest {
    pub title: Option<String>,
    pub status: Option<String>,
    pub content: Option<String>,
    pub topics: Option<Vec<TopicRef>>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NewsSearch {
    /// Case-insensitive text matched against title and content
    pub search: Option<String>,
}

pub(super) fn topic_ids(topics: Vec<TopicRef>) -> Vec<String> {
    topics.into_iter().map(|t| t.topic_id).collect()
}
