use engine::id::NewsId;
use list_filter::NewsListCriteria;
use model::{NewNews, News, NewsUpdate};
use result::{OptRepoResult, RepoResult};

pub mod list_filter;
pub mod model;
pub mod result;

pub trait NewsEngine: Clone + Send + Sync + 'static {
    type Repo: NewsRepository + Send + Sync + 'static;

    fn news(&self) -> Self::Repo;
}

pub trait NewsRepository: Clone + Send + Sync + 'static {
    /// `None` if no active news entry has this id. Topics that were soft deleted are left
    /// out of the returned summaries.
    fn get(&self, id: NewsId) -> impl Future<Output = OptRepoResult<News>> + Send;

    fn list(
        &self,
        list_criteria: NewsListCriteria,
    ) -> impl Future<Output = RepoResult<Vec<News>>> + Send;

    /// Inserts the entry and one association per topic id as a single unit of work.
    fn create(&self, new_news: NewNews) -> impl Future<Output = RepoResult<News>> + Send;

    /// Overwrites the entry and replaces its whole association set.
    /// Fails with `NotFound` if no active news entry has this id.
    fn update(
        &self,
        id: NewsId,
        update: NewsUpdate,
    ) -> impl Future<Output = RepoResult<News>> + Send;

    /// Soft deletes the entry only, its associations are left untouched.
    fn delete(&self, id: NewsId) -> impl Future<Output = RepoResult<()>> + Send;
}
