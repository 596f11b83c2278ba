use crate::postgres::statements::{contains_pattern, topic};
use crate::postgres::{ClassifyExt, RepoInitErr};
use deadpool_postgres::{Object, Pool};
use engine::error::Reason;
use engine::id::TopicId;
use error_stack::{IntoReport, Report, ResultExt};
use tokio_postgres::Row;
use topics_core::TopicRepository;
use topics_core::list_filter::TopicListCriteria;
use topics_core::model::{NewTopic, Topic, TopicUpdate};
use topics_core::result::{OptRepoResult, RepoResult, TopicRepoError};
use tracing::debug;

#[derive(Clone)]
pub struct TopicRepo {
    pool: Pool,
}

impl TopicRepo {
    pub async fn new(pool: Pool) -> Result<Self, Report<RepoInitErr>> {
        // fail fast if the database can't be reached
        pool.get().await.change_context(RepoInitErr::topics())?;
        Ok(Self { pool })
    }

    async fn client(&self, on_err: TopicRepoError) -> RepoResult<Object> {
        self.pool.get().await.change_context(on_err)
    }
}

fn row_to_topic(row: Row) -> Topic {
    Topic::new(
        TopicId::new_with(row.get("id")),
        row.get("name"),
        row.get("slug"),
        row.get("created_at"),
        row.get("updated_at"),
    )
}

impl TopicRepository for TopicRepo {
    async fn get(&self, id: TopicId) -> OptRepoResult<Topic> {
        let client = self
            .client(TopicRepoError::Get(Reason::Persistence))
            .await?;
        let stmt = client
            .prepare_cached(topic::GET)
            .await
            .classify(TopicRepoError::Get)?;

        let topic = client
            .query_opt(&stmt, &[&id.uuid()])
            .await
            .classify(TopicRepoError::Get)?
            .map(row_to_topic);
        Ok(topic)
    }

    async fn list(&self, list_criteria: TopicListCriteria) -> RepoResult<Vec<Topic>> {
        let client = self
            .client(TopicRepoError::List(Reason::Persistence))
            .await?;
        let stmt = client
            .prepare_cached(topic::LIST)
            .await
            .classify(TopicRepoError::List)?;

        let pattern = list_criteria.search().map(contains_pattern);
        let topics = client
            .query(&stmt, &[&pattern])
            .await
            .classify(TopicRepoError::List)?
            .into_iter()
            .map(row_to_topic)
            .collect::<Vec<_>>();

        debug!("listed {} topics", topics.len());
        Ok(topics)
    }

    async fn create(&self, new_topic: NewTopic) -> RepoResult<Topic> {
        let client = self
            .client(TopicRepoError::Create(Reason::Persistence))
            .await?;
        let stmt = client
            .prepare_cached(topic::CREATE)
            .await
            .classify(TopicRepoError::Create)?;

        client
            .query_one(
                &stmt,
                &[&TopicId::new().uuid(), &new_topic.name, &new_topic.slug],
            )
            .await
            .classify(TopicRepoError::Create)
            .map(row_to_topic)
    }

    async fn update(&self, id: TopicId, update: TopicUpdate) -> RepoResult<Topic> {
        let client = self
            .client(TopicRepoError::Update(Reason::Persistence))
            .await?;
        let stmt = client
            .prepare_cached(topic::UPDATE)
            .await
            .classify(TopicRepoError::Update)?;

        client
            .query_opt(&stmt, &[&id.uuid(), &update.name, &update.slug])
            .await
            .classify(TopicRepoError::Update)?
            .map(row_to_topic)
            .ok_or_else(|| TopicRepoError::Update(Reason::NotFound).into_report())
            .attach_with(|| format!("no active topic with id {id}"))
    }

    async fn delete(&self, id: TopicId) -> RepoResult<()> {
        let client = self
            .client(TopicRepoError::Delete(Reason::Persistence))
            .await?;
        let stmt = client
            .prepare_cached(topic::DELETE)
            .await
            .classify(TopicRepoError::Delete)?;

        let deleted = client
            .execute(&stmt, &[&id.uuid()])
            .await
            .classify(TopicRepoError::Delete)?;

        if deleted == 0 {
            return Err(TopicRepoError::Delete(Reason::NotFound).into_report())
                .attach_with(|| format!("no active topic with id {id}"));
        }
        Ok(())
    }
}
