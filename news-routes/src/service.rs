use crate::ServiceResult;
use crate::error::NewsServiceError;
use engine::error::ReasonExt;
use engine::id::{NewsId, TopicId};
use engine::slugify;
use engine::telemetry::Telemetry;
use error_stack::{IntoReport, ResultExt};
use itertools::Itertools;
use news_core::list_filter::NewsListCriteria;
use news_core::model::{NewNews, News, NewsPatch};
use news_core::{NewsEngine, NewsRepository};
use tracing::{debug, instrument};

const NEWS_CREATED: &str = "news_created";
const NEWS_UPDATED: &str = "news_updated";
const NEWS_DELETED: &str = "news_deleted";

/// What a caller supplies to create a news entry. Topic ids arrive unparsed.
#[derive(Debug, Clone, Default)]
pub struct NewsDraft {
    pub title: String,
    pub status: String,
    pub content: String,
    pub topics: Vec<String>,
}

/// Partial changes to a news entry. `None` keeps the current value, and
/// `Some(vec![])` for `topics` detaches every topic.
#[derive(Debug, Clone, Default)]
pub struct NewsChanges {
    pub title: Option<String>,
    pub status: Option<String>,
    pub content: Option<String>,
    pub topics: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct NewsService<N> {
    engine: N,
    telemetry: Telemetry,
}

fn require(value: &str, message: &'static str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(NewsServiceError::Invalid(message).into_report());
    }
    Ok(())
}

fn forbid_blank(value: Option<&str>, message: &'static str) -> ServiceResult<()> {
    value.map_or(Ok(()), |v| require(v, message))
}

/// Parses every id, dropping repeats while keeping first-seen order.
fn parse_topic_ids(raw: &[String]) -> ServiceResult<Vec<TopicId>> {
    let ids = raw
        .iter()
        .map(|id| {
            id.parse::<TopicId>()
                .change_context(NewsServiceError::Invalid("Invalid topic ID format"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids.into_iter().unique().collect())
}

impl<N> NewsService<N>
where
    N: NewsEngine,
{
    pub fn new(engine: N, telemetry: Telemetry) -> Self {
        NewsService { engine, telemetry }
    }

    #[instrument(skip_all, name = "service#get", fields(news.id = %id))]
    pub async fn get(&self, id: NewsId) -> ServiceResult<News> {
        self.engine
            .news()
            .get(id)
            .await
            .change_reason(NewsServiceError::from)?
            .ok_or_else(|| NewsServiceError::NotFound.into_report())
            .attach_with(|| format!("no active news with id {id}"))
    }

    #[instrument(skip_all, name = "service#list")]
    pub async fn list(&self, search: Option<String>) -> ServiceResult<Vec<News>> {
        let news = self
            .engine
            .news()
            .list(NewsListCriteria::new(search))
            .await
            .change_reason(NewsServiceError::from)?;
        debug!("found {} news entries", news.len());
        Ok(news)
    }

    #[instrument(skip_all, name = "service#create", fields(news.topics = draft.topics.len()))]
    pub async fn create(&self, draft: NewsDraft) -> ServiceResult<News> {
        require(&draft.title, "title is required")?;
        require(&draft.content, "content is required")?;
        let topic_ids = parse_topic_ids(&draft.topics)?;

        let news = self
            .engine
            .news()
            .create(NewNews {
                slug: slugify(&draft.title),
                title: draft.title,
                status: draft.status,
                content: draft.content,
                topic_ids,
            })
            .await
            .change_reason(NewsServiceError::from)?;

        self.telemetry.increment(NEWS_CREATED);
        Ok(news)
    }

    /// Loads the entry, merges `changes` into it, and writes the whole result back,
    /// association set included.
    #[instrument(skip_all, name = "service#update", fields(news.id = %id))]
    pub async fn update(&self, id: NewsId, changes: NewsChanges) -> ServiceResult<News> {
        forbid_blank(changes.title.as_deref(), "title cannot be blank")?;
        forbid_blank(changes.content.as_deref(), "content cannot be blank")?;
        let topic_ids = changes
            .topics
            .as_deref()
            .map(parse_topic_ids)
            .transpose()?;

        let current = self.get(id).await?;
        let update = current.merge(NewsPatch {
            title: changes.title,
            status: changes.status,
            content: changes.content,
            topic_ids,
        });

        let news = self
            .engine
            .news()
            .update(id, update)
            .await
            .change_reason(NewsServiceError::from)?;

        self.telemetry.increment(NEWS_UPDATED);
        Ok(news)
    }

    #[instrument(skip_all, name = "service#delete", fields(news.id = %id))]
    pub async fn delete(&self, id: NewsId) -> ServiceResult<()> {
        self.get(id).await?;
        self.engine
            .news()
            .delete(id)
            .await
            .change_reason(NewsServiceError::from)?;

        self.telemetry.increment(NEWS_DELETED);
        Ok(())
    }
}
