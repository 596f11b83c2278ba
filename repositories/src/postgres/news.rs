use crate::postgres::insert_many::{InsertMany, InsertManyBuilder, value_set};
use crate::postgres::statements::{contains_pattern, news};
use crate::postgres::{ClassifyExt, RepoInitErr};
use deadpool_postgres::{GenericClient, Object, Pool};
use engine::error::Reason;
use engine::id::{NewsId, NewsTopicId, TopicId};
use error_stack::{IntoReport, Report, ResultExt};
use news_core::NewsRepository;
use news_core::list_filter::NewsListCriteria;
use news_core::model::{NewNews, News, NewsUpdate, TopicSummary};
use news_core::result::{NewsRepoError, OptRepoResult, RepoResult};
use tokio_postgres::Row;
use tokio_postgres::types::Json;
use tracing::debug;
use uuid::Uuid;

#[derive(Clone)]
pub struct NewsRepo {
    pool: Pool,
}

impl NewsRepo {
    pub async fn new(pool: Pool) -> Result<Self, Report<RepoInitErr>> {
        pool.get().await.change_context(RepoInitErr::news())?;
        Ok(Self { pool })
    }

    async fn client(&self, on_err: NewsRepoError) -> RepoResult<Object> {
        self.pool.get().await.change_context(on_err)
    }
}

fn row_to_news(row: Row) -> News {
    let Json(topics): Json<Vec<TopicSummary>> = row.get("topics");
    News {
        id: NewsId::new_with(row.get("id")),
        title: row.get("title"),
        slug: row.get("slug"),
        status: row.get("status"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        topics,
    }
}

fn topic_links(news_id: NewsId, topic_ids: &[TopicId]) -> Option<InsertMany> {
    let (first, rest) = topic_ids.split_first()?;

    let mut builder = InsertManyBuilder::new(
        news::TOPIC_TABLE,
        news::TOPIC_COLUMNS,
        value_set![NewsTopicId::new().uuid() => Uuid, news_id.uuid() => Uuid, first.uuid() => Uuid],
    );

    for topic_id in rest {
        builder.add_value_set(
            value_set![NewsTopicId::new().uuid() => Uuid, news_id.uuid() => Uuid, topic_id.uuid() => Uuid],
        );
    }

    Some(builder.build())
}

/// Re-reads a single entry through `client`, which may be an open transaction so the
/// caller sees its own uncommitted writes.
async fn fetch<C, F>(client: &C, id: NewsId, on_err: F) -> RepoResult<Option<News>>
where
    C: GenericClient + Sync,
    F: Fn(Reason) -> NewsRepoError + Copy,
{
    let stmt = client.prepare_cached(news::GET).await.classify(on_err)?;
    let news = client
        .query_opt(&stmt, &[&id.uuid()])
        .await
        .classify(on_err)?
        .map(row_to_news);
    Ok(news)
}

/// Inserts one association row per topic id. An id naming no topic trips the foreign key
/// and comes back as a validation failure.
async fn link_topics<C, F>(
    client: &C,
    id: NewsId,
    topic_ids: &[TopicId],
    on_err: F,
) -> RepoResult<()>
where
    C: GenericClient + Sync,
    F: Fn(Reason) -> NewsRepoError + Copy,
{
    let Some(insert) = topic_links(id, topic_ids) else {
        return Ok(());
    };

    client
        .execute(insert.query.as_str(), &insert.params())
        .await
        .classify(on_err)
        .attach_with(|| format!("linking {} topics to news {id}", topic_ids.len()))?;
    Ok(())
}

impl NewsRepository for NewsRepo {
    async fn get(&self, id: NewsId) -> OptRepoResult<News> {
        let client = self.client(NewsRepoError::Get(Reason::Persistence)).await?;
        fetch(&client, id, NewsRepoError::Get).await
    }

    async fn list(&self, list_criteria: NewsListCriteria) -> RepoResult<Vec<News>> {
        let client = self.client(NewsRepoError::List(Reason::Persistence)).await?;
        let stmt = client
            .prepare_cached(news::LIST)
            .await
            .classify(NewsRepoError::List)?;

        let pattern = list_criteria.search().map(contains_pattern);
        let news = client
            .query(&stmt, &[&pattern])
            .await
            .classify(NewsRepoError::List)?
            .into_iter()
            .map(row_to_news)
            .collect::<Vec<_>>();

        debug!("listed {} news entries", news.len());
        Ok(news)
    }

    async fn create(&self, new_news: NewNews) -> RepoResult<News> {
        let mut client = self
            .client(NewsRepoError::Create(Reason::Persistence))
            .await?;
        let tx = client
            .transaction()
            .await
            .classify(NewsRepoError::Create)?;

        let id = NewsId::new();
        let stmt = tx
            .prepare_cached(news::CREATE)
            .await
            .classify(NewsRepoError::Create)?;
        tx.execute(
            &stmt,
            &[
                &id.uuid(),
                &new_news.title,
                &new_news.slug,
                &new_news.status,
                &new_news.content,
            ],
        )
        .await
        .classify(NewsRepoError::Create)?;

        link_topics(&tx, id, &new_news.topic_ids, NewsRepoError::Create).await?;

        let created = fetch(&tx, id, NewsRepoError::Create)
            .await?
            .ok_or_else(|| NewsRepoError::Create(Reason::Persistence).into_report())
            .attach_with(|| format!("news {id} vanished inside its own transaction"))?;

        tx.commit().await.classify(NewsRepoError::Create)?;
        Ok(created)
    }

    async fn update(&self, id: NewsId, update: NewsUpdate) -> RepoResult<News> {
        let mut client = self
            .client(NewsRepoError::Update(Reason::Persistence))
            .await?;
        let tx = client
            .transaction()
            .await
            .classify(NewsRepoError::Update)?;

        let stmt = tx
            .prepare_cached(news::UPDATE)
            .await
            .classify(NewsRepoError::Update)?;
        let updated = tx
            .execute(
                &stmt,
                &[
                    &id.uuid(),
                    &update.title,
                    &update.slug,
                    &update.status,
                    &update.content,
                ],
            )
            .await
            .classify(NewsRepoError::Update)?;

        if updated == 0 {
            // dropping the transaction rolls it back
            return Err(NewsRepoError::Update(Reason::NotFound).into_report())
                .attach_with(|| format!("no active news with id {id}"));
        }

        let clear = tx
            .prepare_cached(news::CLEAR_TOPICS)
            .await
            .classify(NewsRepoError::Update)?;
        tx.execute(&clear, &[&id.uuid()])
            .await
            .classify(NewsRepoError::Update)?;

        link_topics(&tx, id, &update.topic_ids, NewsRepoError::Update).await?;

        let news = fetch(&tx, id, NewsRepoError::Update)
            .await?
            .ok_or_else(|| NewsRepoError::Update(Reason::NotFound).into_report())?;

        tx.commit().await.classify(NewsRepoError::Update)?;
        Ok(news)
    }

    async fn delete(&self, id: NewsId) -> RepoResult<()> {
        let client = self
            .client(NewsRepoError::Delete(Reason::Persistence))
            .await?;
        let stmt = client
            .prepare_cached(news::DELETE)
            .await
            .classify(NewsRepoError::Delete)?;

        let deleted = client
            .execute(&stmt, &[&id.uuid()])
            .await
            .classify(NewsRepoError::Delete)?;

        if deleted == 0 {
            return Err(NewsRepoError::Delete(Reason::NotFound).into_report())
                .attach_with(|| format!("no active news with id {id}"));
        }
        Ok(())
    }
}
