//! Repositories backed by plain maps, used to exercise services and routes without a
//! database. They follow the postgres repos' rules: deletes are soft, deleted rows
//! stay invisible, and linking news to a topic id that was never created is a
//! validation failure.

use chrono::{DateTime, Utc};
use engine::ArwLock;
use engine::error::Reason;
use engine::id::{NewsId, TopicId};
use error_stack::{IntoReport, ResultExt};
use indexmap::IndexMap;
use news_core::NewsRepository;
use news_core::list_filter::NewsListCriteria;
use news_core::model::{NewNews, News, NewsUpdate, TopicSummary};
use news_core::result::NewsRepoError;
use topics_core::TopicRepository;
use topics_core::list_filter::TopicListCriteria;
use topics_core::model::{NewTopic, Topic, TopicUpdate};
use topics_core::result::TopicRepoError;

#[cfg(test)]
mod tests;

struct StoredTopic {
    topic: Topic,
    deleted_at: Option<DateTime<Utc>>,
}

struct StoredNews {
    id: NewsId,
    title: String,
    slug: String,
    status: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Db {
    topics: IndexMap<TopicId, StoredTopic>,
    news: IndexMap<NewsId, StoredNews>,
    links: Vec<(NewsId, TopicId)>,
}

impl Db {
    fn active_topic(&self, id: &TopicId) -> Option<&Topic> {
        self.topics
            .get(id)
            .filter(|t| t.deleted_at.is_none())
            .map(|t| &t.topic)
    }

    fn active_news(&self, id: &NewsId) -> Option<&StoredNews> {
        self.news.get(id).filter(|n| n.deleted_at.is_none())
    }

    fn summaries(&self, news_id: NewsId) -> Vec<TopicSummary> {
        self.links
            .iter()
            .filter(|(n, _)| *n == news_id)
            .filter_map(|(_, t)| self.active_topic(t))
            .map(|t| TopicSummary {
                id: t.id,
                name: t.name.clone(),
                slug: t.slug.clone(),
                created_at: t.created_at,
                updated_at: t.updated_at,
            })
            .collect()
    }

    fn to_news(&self, stored: &StoredNews) -> News {
        News {
            id: stored.id,
            title: stored.title.clone(),
            slug: stored.slug.clone(),
            status: stored.status.clone(),
            content: stored.content.clone(),
            created_at: stored.created_at,
            updated_at: stored.updated_at,
            topics: self.summaries(stored.id),
        }
    }

    /// Mirrors the foreign key on the association table, which only cares that the
    /// topic row exists.
    fn unknown_topic(&self, topic_ids: &[TopicId]) -> Option<TopicId> {
        topic_ids
            .iter()
            .find(|id| !self.topics.contains_key(*id))
            .copied()
    }
}

/// Shared storage handing out topic and news repos that see each other's writes.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    db: ArwLock<Db>,
}

impl InMemoryStore {
    pub fn topics(&self) -> InMemoryTopicRepo {
        InMemoryTopicRepo {
            db: self.db.clone(),
        }
    }

    pub fn news(&self) -> InMemoryNewsRepo {
        InMemoryNewsRepo {
            db: self.db.clone(),
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryTopicRepo {
    db: ArwLock<Db>,
}

impl TopicRepository for InMemoryTopicRepo {
    async fn get(&self, id: TopicId) -> topics_core::result::OptRepoResult<Topic> {
        let db = self.db.read().await;
        Ok(db.active_topic(&id).cloned())
    }

    async fn list(
        &self,
        list_criteria: TopicListCriteria,
    ) -> topics_core::result::RepoResult<Vec<Topic>> {
        let db = self.db.read().await;
        Ok(db
            .topics
            .values()
            .filter(|t| t.deleted_at.is_none())
            .map(|t| &t.topic)
            .filter(|t| list_criteria.matches(t))
            .cloned()
            .collect())
    }

    async fn create(&self, new_topic: NewTopic) -> topics_core::result::RepoResult<Topic> {
        let mut db = self.db.write().await;
        let now = Utc::now();
        let topic = Topic::new(TopicId::new(), new_topic.name, new_topic.slug, now, now);
        db.topics.insert(
            topic.id,
            StoredTopic {
                topic: topic.clone(),
                deleted_at: None,
            },
        );
        Ok(topic)
    }

    async fn update(
        &self,
        id: TopicId,
        update: TopicUpdate,
    ) -> topics_core::result::RepoResult<Topic> {
        let mut db = self.db.write().await;
        let stored = db
            .topics
            .get_mut(&id)
            .filter(|t| t.deleted_at.is_none())
            .ok_or_else(|| TopicRepoError::Update(Reason::NotFound).into_report())
            .attach_with(|| format!("no active topic with id {id}"))?;

        stored.topic.name = update.name;
        stored.topic.slug = update.slug;
        stored.topic.updated_at = Utc::now();
        Ok(stored.topic.clone())
    }

    async fn delete(&self, id: TopicId) -> topics_core::result::RepoResult<()> {
        let mut db = self.db.write().await;
        let stored = db
            .topics
            .get_mut(&id)
            .filter(|t| t.deleted_at.is_none())
            .ok_or_else(|| TopicRepoError::Delete(Reason::NotFound).into_report())
            .attach_with(|| format!("no active topic with id {id}"))?;

        stored.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryNewsRepo {
    db: ArwLock<Db>,
}

impl NewsRepository for InMemoryNewsRepo {
    async fn get(&self, id: NewsId) -> news_core::result::OptRepoResult<News> {
        let db = self.db.read().await;
        Ok(db.active_news(&id).map(|n| db.to_news(n)))
    }

    async fn list(
        &self,
        list_criteria: NewsListCriteria,
    ) -> news_core::result::RepoResult<Vec<News>> {
        let db = self.db.read().await;
        Ok(db
            .news
            .values()
            .filter(|n| n.deleted_at.is_none())
            .map(|n| db.to_news(n))
            .filter(|n| list_criteria.matches(n))
            .collect())
    }

    async fn create(&self, new_news: NewNews) -> news_core::result::RepoResult<News> {
        let mut db = self.db.write().await;
        if let Some(unknown) = db.unknown_topic(&new_news.topic_ids) {
            return Err(NewsRepoError::Create(Reason::Validation).into_report())
                .attach_with(|| format!("topic {unknown} does not exist"));
        }

        let now = Utc::now();
        let id = NewsId::new();
        db.news.insert(
            id,
            StoredNews {
                id,
                title: new_news.title,
                slug: new_news.slug,
                status: new_news.status,
                content: new_news.content,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            },
        );
        db.links
            .extend(new_news.topic_ids.into_iter().map(|topic_id| (id, topic_id)));

        let stored = &db.news[&id];
        Ok(db.to_news(stored))
    }

    async fn update(
        &self,
        id: NewsId,
        update: NewsUpdate,
    ) -> news_core::result::RepoResult<News> {
        let mut db = self.db.write().await;
        if db.active_news(&id).is_none() {
            return Err(NewsRepoError::Update(Reason::NotFound).into_report())
                .attach_with(|| format!("no active news with id {id}"));
        }
        if let Some(unknown) = db.unknown_topic(&update.topic_ids) {
            return Err(NewsRepoError::Update(Reason::Validation).into_report())
                .attach_with(|| format!("topic {unknown} does not exist"));
        }

        db.links.retain(|(news_id, _)| *news_id != id);
        db.links
            .extend(update.topic_ids.into_iter().map(|topic_id| (id, topic_id)));

        let stored = &mut db.news[&id];
        stored.title = update.title;
        stored.slug = update.slug;
        stored.status = update.status;
        stored.content = update.content;
        stored.updated_at = Utc::now();

        let stored = &db.news[&id];
        Ok(db.to_news(stored))
    }

    async fn delete(&self, id: NewsId) -> news_core::result::RepoResult<()> {
        let mut db = self.db.write().await;
        let stored = db
            .news
            .get_mut(&id)
            .filter(|n| n.deleted_at.is_none())
            .ok_or_else(|| NewsRepoError::Delete(Reason::NotFound).into_report())
            .attach_with(|| format!("no active news with id {id}"))?;

        stored.deleted_at = Some(Utc::now());
        Ok(())
    }
}

/// Fails every call with the configured reason.
#[derive(Clone)]
pub struct FailingTopicRepo {
    reason: Reason,
}

impl FailingTopicRepo {
    pub fn new(reason: Reason) -> Self {
        Self { reason }
    }
}

impl Default for FailingTopicRepo {
    fn default() -> Self {
        Self::new(Reason::Persistence)
    }
}

impl TopicRepository for FailingTopicRepo {
    async fn get(&self, _: TopicId) -> topics_core::result::OptRepoResult<Topic> {
        Err(TopicRepoError::Get(self.reason).into_report())
    }

    async fn list(&self, _: TopicListCriteria) -> topics_core::result::RepoResult<Vec<Topic>> {
        Err(TopicRepoError::List(self.reason).into_report())
    }

    async fn create(&self, _: NewTopic) -> topics_core::result::RepoResult<Topic> {
        Err(TopicRepoError::Create(self.reason).into_report())
    }

    async fn update(&self, _: TopicId, _: TopicUpdate) -> topics_core::result::RepoResult<Topic> {
        Err(TopicRepoError::Update(self.reason).into_report())
    }

    async fn delete(&self, _: TopicId) -> topics_core::result::RepoResult<()> {
        Err(TopicRepoError::Delete(self.reason).into_report())
    }
}

/// Fails every call with the configured reason.
#[derive(Clone)]
pub struct FailingNewsRepo {
    reason: Reason,
}

impl FailingNewsRepo {
    pub fn new(reason: Reason) -> Self {
        Self { reason }
    }
}

impl Default for FailingNewsRepo {
    fn default() -> Self {
        Self::new(Reason::Persistence)
    }
}

impl NewsRepository for FailingNewsRepo {
    async fn get(&self, _: NewsId) -> news_core::result::OptRepoResult<News> {
        Err(NewsRepoError::Get(self.reason).into_report())
    }

    async fn list(&self, _: NewsListCriteria) -> news_core::result::RepoResult<Vec<News>> {
        Err(NewsRepoError::List(self.reason).into_report())
    }

    async fn create(&self, _: NewNews) -> news_core::result::RepoResult<News> {
        Err(NewsRepoError::Create(self.reason).into_report())
    }

    async fn update(&self, _: NewsId, _: NewsUpdate) -> news_core::result::RepoResult<News> {
        Err(NewsRepoError::Update(self.reason).into_report())
    }

    async fn delete(&self, _: NewsId) -> news_core::result::RepoResult<()> {
        Err(NewsRepoError::Delete(self.reason).into_report())
    }
}
