use engine::id::TopicId;
use list_filter::TopicListCriteria;
use model::{NewTopic, Topic, TopicUpdate};
use result::{OptRepoResult, RepoResult};

pub mod list_filter;
pub mod model;
pub mod result;

pub trait TopicEngine: Clone + Send + Sync + 'static {
    type Repo: TopicRepository + Send + Sync + 'static;

    fn topics(&self) -> Self::Repo;
}

pub trait TopicRepository: Clone + Send + Sync + 'static {
    /// `None` if no active topic has this id.
    fn get(&self, id: TopicId) -> impl Future<Output = OptRepoResult<Topic>> + Send;

    fn list(
        &self,
        list_criteria: TopicListCriteria,
    ) -> impl Future<Output = RepoResult<Vec<Topic>>> + Send;

    fn create(&self, new_topic: NewTopic) -> impl Future<Output = RepoResult<Topic>> + Send;

    /// Writes `update` as given. Fails with `NotFound` if no active topic has this id.
    fn update(
        &self,
        id: TopicId,
        update: TopicUpdate,
    ) -> impl Future<Output = RepoResult<Topic>> + Send;

    /// Soft deletes the topic. Fails with `NotFound` if no active topic has this id.
    fn delete(&self, id: TopicId) -> impl Future<Output = RepoResult<()>> + Send;
}
