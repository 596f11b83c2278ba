use crate::error::NewsServiceError;
use crate::service::{NewsChanges, NewsDraft, NewsService};
use crate::state::NewsAppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response, Result},
    routing::get,
};
use engine::error::EndpointError;
use engine::id::NewsId;
use engine::response::ApiResponse;
use news_core::NewsEngine;
use news_core::model::News;
use requests::{CreateNewsRequest, NewsSearch, UpdateNewsRequest, topic_ids};
use tracing::{instrument, warn};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

pub mod requests;

pub const NEWS_ROOT_PATH: &str = "/news";

const NEWS_LIST_PATH: &str = "/";
const NEWS_ID_PATH: &str = "/{news_id}";

const INVALID_ID: &str = "Invalid news ID format";

#[derive(OpenApi)]
#[openapi(paths(list_news, get_news, create_news, update_news, delete_news))]
pub struct NewsDocs;

pub fn routes<S, N>(app_state: NewsAppState<N>) -> OpenApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
    N: NewsEngine,
{
    let router = OpenApiRouter::new()
        .route(NEWS_LIST_PATH, get(list_news).post(create_news))
        .route(
            NEWS_ID_PATH,
            get(get_news).put(update_news).delete(delete_news),
        );

    OpenApiRouter::new()
        .nest(NEWS_ROOT_PATH, router)
        .with_state(app_state)
}

type ResponseType = ApiResponse<News>;
type ListResponseType = ApiResponse<Vec<News>>;

fn parse_id(raw: &str) -> Option<NewsId> {
    raw.parse::<NewsId>()
        .inspect_err(|e| warn!("{e}"))
        .ok()
}

/// List every active news entry with its topics, optionally narrowed by a search string.
#[utoipa::path(
    get,
    path = NEWS_LIST_PATH,
    responses(
        (status = OK, description = "All matching news, possibly none", body = ListResponseType),
    ),
    params(NewsSearch)
)]
#[instrument(skip(service), err(Debug))]
pub async fn list_news<N>(
    State(service): State<NewsService<N>>,
    Query(query): Query<NewsSearch>,
) -> Result<Response, EndpointError<NewsServiceError>>
where
    N: NewsEngine,
{
    let news = service.list(query.search).await?;
    Ok(ApiResponse::ok("News list retrieved successfully", news).into_response())
}

#[utoipa::path(
    get,
    path = NEWS_ID_PATH,
    responses(
        (status = OK, description = "The news entry with its topics", body = ResponseType),
        (status = BAD_REQUEST, description = "The id is not a valid UUID"),
        (status = NOT_FOUND, description = "No active news entry has the given id"),
    ),
    params(
        ("news_id" = String, Path, description = "The id of the news entry to find"),
    )
)]
#[instrument(skip(service), err(Debug))]
pub async fn get_news<N>(
    State(service): State<NewsService<N>>,
    Path(news_id): Path<String>,
) -> Result<Response, EndpointError<NewsServiceError>>
where
    N: NewsEngine,
{
    let Some(news_id) = parse_id(&news_id) else {
        return Ok(ApiResponse::bad_request(INVALID_ID).into_response());
    };

    let news = service.get(news_id).await?;
    Ok(ApiResponse::ok("News retrieved successfully", news).into_response())
}

/// Create a news entry linked to the given topics.
#[utoipa::path(
    post,
    path = NEWS_LIST_PATH,
    responses(
        (status = CREATED, description = "The news entry was created", body = ResponseType),
        (status = BAD_REQUEST, description = "A required field was blank, or a topic id was malformed or unknown"),
        (status = UNPROCESSABLE_ENTITY, description = "The body was missing a required field"),
    ),
    request_body = CreateNewsRequest
)]
#[instrument(skip_all, err(Debug), fields(req.title = news.title, req.topics = news.topics.len()))]
pub async fn create_news<N>(
    State(service): State<NewsService<N>>,
    Json(news): Json<CreateNewsRequest>,
) -> Result<Response, EndpointError<NewsServiceError>>
where
    N: NewsEngine,
{
    let news = service
        .create(NewsDraft {
            title: news.title,
            status: news.status,
            content: news.content,
            topics: topic_ids(news.topics),
        })
        .await?;
    Ok(ApiResponse::created("News successfully created", news).into_response())
}

/// Update a news entry. Fields left out keep their values.
#[utoipa::path(
    put,
    path = NEWS_ID_PATH,
    responses(
        (status = OK, description = "The news entry was updated", body = ResponseType),
        (status = BAD_REQUEST, description = "The id was malformed, a field was blank, or a topic id was malformed or unknown"),
        (status = NOT_FOUND, description = "No active news entry has the given id"),
    ),
    params(
        ("news_id" = String, Path, description = "The id of the news entry to update")
    ),
    request_body = UpdateNewsRequest,
)]
#[instrument(skip(service, news), err(Debug))]
pub async fn update_news<N>(
    State(service): State<NewsService<N>>,
    Path(news_id): Path<String>,
    Json(news): Json<UpdateNewsRequest>,
) -> Result<Response, EndpointError<NewsServiceError>>
where
    N: NewsEngine,
{
    let Some(news_id) = parse_id(&news_id) else {
        return Ok(ApiResponse::bad_request(INVALID_ID).into_response());
    };

    let changes = NewsChanges {
        title: news.title,
        status: news.status,
        content: news.content,
        topics: news.topics.map(topic_ids),
    };
    let news = service.update(news_id, changes).await?;
    Ok(ApiResponse::ok("News successfully updated", news).into_response())
}

/// Soft delete a news entry. Its topic links are left in place.
#[utoipa::path(
    delete,
    path = NEWS_ID_PATH,
    responses(
        (status = NO_CONTENT, description = "The news entry was deleted"),
        (status = BAD_REQUEST, description = "The id is not a valid UUID"),
        (status = NOT_FOUND, description = "No active news entry has the given id"),
    ),
    params(
        ("news_id" = String, Path, description = "The id of the news entry to delete")
    )
)]
#[instrument(skip(service), err(Debug))]
pub async fn delete_news<N>(
    State(service): State<NewsService<N>>,
    Path(news_id): Path<String>,
) -> Result<Response, EndpointError<NewsServiceError>>
where
    N: NewsEngine,
{
    let Some(news_id) = parse_id(&news_id) else {
        return Ok(ApiResponse::bad_request(INVALID_ID).into_response());
    };

    service.delete(news_id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
