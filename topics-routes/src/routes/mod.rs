use crate::error::TopicServiceError;
use crate::service::TopicService;
use crate::state::TopicAppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response, Result},
    routing::get,
};
use engine::error::EndpointError;
use engine::id::TopicId;
use engine::response::ApiResponse;
use requests::{CreateTopicRequest, TopicSearch, UpdateTopicRequest};
use topics_core::TopicEngine;
use topics_core::model::{Topic, TopicPatch};
use tracing::{instrument, warn};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

pub mod requests;

pub const TOPIC_ROOT_PATH: &str = "/topics";

const TOPIC_LIST_PATH: &str = "/";
const TOPIC_ID_PATH: &str = "/{topic_id}";

const INVALID_ID: &str = "Invalid topic ID format";

/// Topic endpoints, meant to be nested under [`TOPIC_ROOT_PATH`].
#[derive(OpenApi)]
#[openapi(paths(list_topics, get_topic, create_topic, update_topic, delete_topic))]
pub struct TopicDocs;

pub fn routes<S, T>(app_state: TopicAppState<T>) -> OpenApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
    T: TopicEngine,
{
    let router = OpenApiRouter::new()
        .route(TOPIC_LIST_PATH, get(list_topics).post(create_topic))
        .route(
            TOPIC_ID_PATH,
            get(get_topic).put(update_topic).delete(delete_topic),
        );

    OpenApiRouter::new()
        .nest(TOPIC_ROOT_PATH, router)
        .with_state(app_state)
}

type ResponseType = ApiResponse<Topic>;
type ListResponseType = ApiResponse<Vec<Topic>>;

fn parse_id(raw: &str) -> Option<TopicId> {
    match raw.parse::<TopicId>() {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}

/// List every active topic, optionally narrowed by a search string.
#[utoipa::path(
    get,
    path = TOPIC_LIST_PATH,
    responses(
        (status = OK, description = "All matching topics, possibly none", body = ListResponseType),
    ),
    params(TopicSearch)
)]
#[instrument(skip(service), err(Debug))]
pub async fn list_topics<T>(
    State(service): State<TopicService<T>>,
    Query(query): Query<TopicSearch>,
) -> Result<Response, EndpointError<TopicServiceError>>
where
    T: TopicEngine,
{
    let topics = service.list(query.search).await?;
    Ok(ApiResponse::ok("Topics retrieved successfully", topics).into_response())
}

/// Get the topic associated with the given id.
#[utoipa::path(
    get,
    path = TOPIC_ID_PATH,
    responses(
        (status = OK, description = "The topic with the given id", body = ResponseType),
        (status = BAD_REQUEST, description = "The id is not a valid UUID"),
        (status = NOT_FOUND, description = "No active topic has the given id"),
    ),
    params(
        ("topic_id" = String, Path, description = "The id of the topic to find"),
    )
)]
#[instrument(skip(service), err(Debug))]
pub async fn get_topic<T>(
    State(service): State<TopicService<T>>,
    Path(topic_id): Path<String>,
) -> Result<Response, EndpointError<TopicServiceError>>
where
    T: TopicEngine,
{
    let Some(topic_id) = parse_id(&topic_id) else {
        return Ok(ApiResponse::bad_request(INVALID_ID).into_response());
    };

    let topic = service.get(topic_id).await?;
    Ok(ApiResponse::ok("Topic retrieved successfully", topic).into_response())
}

/// Create a new topic. Its slug is derived from the name.
#[utoipa::path(
    post,
    path = TOPIC_LIST_PATH,
    responses(
        (status = CREATED, description = "The topic was created", body = ResponseType),
        (status = BAD_REQUEST, description = "The name was blank"),
        (status = UNPROCESSABLE_ENTITY, description = "The body was missing a name"),
    ),
    request_body = CreateTopicRequest
)]
#[instrument(skip_all, err(Debug), fields(req.name = topic.name))]
pub async fn create_topic<T>(
    State(service): State<TopicService<T>>,
    Json(topic): Json<CreateTopicRequest>,
) -> Result<Response, EndpointError<TopicServiceError>>
where
    T: TopicEngine,
{
    let topic = service.create(topic.name).await?;
    Ok(ApiResponse::created("Topic successfully created", topic).into_response())
}

/// Update the topic associated with the given id. Fields left out keep their values.
#[utoipa::path(
    put,
    path = TOPIC_ID_PATH,
    responses(
        (status = OK, description = "The topic was updated", body = ResponseType),
        (status = BAD_REQUEST, description = "The id was malformed or the name was blank"),
        (status = NOT_FOUND, description = "No active topic has the given id"),
    ),
    params(
        ("topic_id" = String, Path, description = "The id of the topic to update")
    ),
    request_body = UpdateTopicRequest,
)]
#[instrument(skip(service, topic), err(Debug), fields(req.name = topic.name))]
pub async fn update_topic<T>(
    State(service): State<TopicService<T>>,
    Path(topic_id): Path<String>,
    Json(topic): Json<UpdateTopicRequest>,
) -> Result<Response, EndpointError<TopicServiceError>>
where
    T: TopicEngine,
{
    let Some(topic_id) = parse_id(&topic_id) else {
        return Ok(ApiResponse::bad_request(INVALID_ID).into_response());
    };

    let topic = service
        .update(topic_id, TopicPatch::new(topic.name))
        .await?;
    Ok(ApiResponse::ok("Topic successfully updated", topic).into_response())
}

/// Soft delete the topic associated with the given id.
#[utoipa::path(
    delete,
    path = TOPIC_ID_PATH,
    responses(
        (status = NO_CONTENT, description = "The topic was deleted"),
        (status = BAD_REQUEST, description = "The id is not a valid UUID"),
        (status = NOT_FOUND, description = "No active topic has the given id"),
    ),
    params(
        ("topic_id" = String, Path, description = "The id of the topic to delete")
    )
)]
#[instrument(skip(service), err(Debug))]
pub async fn delete_topic<T>(
    State(service): State<TopicService<T>>,
    Path(topic_id): Path<String>,
) -> Result<Response, EndpointError<TopicServiceError>>
where
    T: TopicEngine,
{
    let Some(topic_id) = parse_id(&topic_id) else {
        return Ok(ApiResponse::bad_request(INVALID_ID).into_response());
    };

    service.delete(topic_id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
