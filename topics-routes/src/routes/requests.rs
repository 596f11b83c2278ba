use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTopicRequest {
    /// Display name. The slug is always derived from it.
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTopicRequest {
    /// The new name. Left out, the current name is kept.
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopicSearch {
    /// Case-insensitive text matched against name and slug
    pub search: Option<String>,
}
