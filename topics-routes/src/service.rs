use crate::ServiceResult;
use crate::error::TopicServiceError;
use engine::error::ReasonExt;
use engine::id::TopicId;
use engine::slugify;
use engine::telemetry::Telemetry;
use error_stack::{IntoReport, ResultExt};
use topics_core::list_filter::TopicListCriteria;
use topics_core::model::{NewTopic, Topic, TopicPatch};
use topics_core::{TopicEngine, TopicRepository};
use tracing::{debug, instrument};

const TOPICS_CREATED: &str = "topics_created";
const TOPICS_UPDATED: &str = "topics_updated";
const TOPICS_DELETED: &str = "topics_deleted";

#[derive(Debug, Clone)]
pub struct TopicService<T> {
    engine: T,
    telemetry: Telemetry,
}

impl<T> TopicService<T>
where
    T: TopicEngine,
{
    pub fn new(engine: T, telemetry: Telemetry) -> Self {
        TopicService { engine, telemetry }
    }

    #[instrument(skip_all, name = "service#get", fields(topic.id = %id))]
    pub async fn get(&self, id: TopicId) -> ServiceResult<Topic> {
        self.engine
            .topics()
            .get(id)
            .await
            .change_reason(TopicServiceError::from)?
            .ok_or_else(|| TopicServiceError::NotFound.into_report())
            .attach_with(|| format!("no active topic with id {id}"))
    }

    #[instrument(skip_all, name = "service#list")]
    pub async fn list(&self, search: Option<String>) -> ServiceResult<Vec<Topic>> {
        let topics = self
            .engine
            .topics()
            .list(TopicListCriteria::new(search))
            .await
            .change_reason(TopicServiceError::from)?;
        debug!("found {} topics", topics.len());
        Ok(topics)
    }

    #[instrument(skip_all, name = "service#create")]
    pub async fn create(&self, name: String) -> ServiceResult<Topic> {
        if name.trim().is_empty() {
            return Err(TopicServiceError::Invalid("name is required").into_report());
        }

        let slug = slugify(&name);
        let topic = self
            .engine
            .topics()
            .create(NewTopic::new(name, slug))
            .await
            .change_reason(TopicServiceError::from)?;

        self.telemetry.increment(TOPICS_CREATED);
        Ok(topic)
    }

    /// Loads the topic, merges `patch` into it, and writes the result back.
    #[instrument(skip_all, name = "service#update", fields(topic.id = %id))]
    pub async fn update(&self, id: TopicId, patch: TopicPatch) -> ServiceResult<Topic> {
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(TopicServiceError::Invalid("name cannot be blank").into_report());
        }

        let current = self.get(id).await?;
        let topic = self
            .engine
            .topics()
            .update(id, current.merge(patch))
            .await
            .change_reason(TopicServiceError::from)?;

        self.telemetry.increment(TOPICS_UPDATED);
        Ok(topic)
    }

    #[instrument(skip_all, name = "service#delete", fields(topic.id = %id))]
    pub async fn delete(&self, id: TopicId) -> ServiceResult<()> {
        self.get(id).await?;
        self.engine
            .topics()
            .delete(id)
            .await
            .change_reason(TopicServiceError::from)?;

        self.telemetry.increment(TOPICS_DELETED);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::error::{Classified, Reason};
    use repositories::memory::{FailingTopicRepo, InMemoryTopicRepo};

    #[derive(Clone)]
    struct TestEngine<R>(R);

    impl<R: TopicRepository> TopicEngine for TestEngine<R> {
        type Repo = R;

        fn topics(&self) -> Self::Repo {
            self.0.clone()
        }
    }

    fn service() -> TopicService<TestEngine<InMemoryTopicRepo>> {
        TopicService::new(
            TestEngine(InMemoryTopicRepo::default()),
            Telemetry::prometheus().unwrap(),
        )
    }

    #[tokio::test]
    async fn create_computes_slug_and_counts() {
        let service = service();

        let topic = service.create("Hello World".into()).await.unwrap();

        assert_eq!("hello-world", topic.slug);
        let rendered = service.telemetry.render().unwrap();
        assert!(rendered.contains("topics_created 1"), "{rendered}");
    }

    #[tokio::test]
    async fn create_blank_name_is_invalid() {
        let err = service().create("   ".into()).await.unwrap_err();

        assert_eq!(Reason::Validation, err.current_context().reason());
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let err = service().get(TopicId::new()).await.unwrap_err();

        assert_eq!(&TopicServiceError::NotFound, err.current_context());
    }

    #[tokio::test]
    async fn update_renames_and_reslugs() {
        let service = service();
        let topic = service.create("Old Name".into()).await.unwrap();

        let updated = service
            .update(topic.id, TopicPatch::new(Some("Brand New".into())))
            .await
            .unwrap();

        assert_eq!("Brand New", updated.name);
        assert_eq!("brand-new", updated.slug);
        assert_eq!(updated, service.get(topic.id).await.unwrap());
    }

    #[tokio::test]
    async fn update_missing_is_not_found_and_writes_nothing() {
        let service = service();

        let err = service
            .update(TopicId::new(), TopicPatch::new(Some("x".into())))
            .await
            .unwrap_err();

        assert_eq!(Reason::NotFound, err.current_context().reason());
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let service = service();
        let topic = service.create("Short Lived".into()).await.unwrap();

        service.delete(topic.id).await.unwrap();
        let err = service.delete(topic.id).await.unwrap_err();

        assert_eq!(Reason::NotFound, err.current_context().reason());
    }

    #[tokio::test]
    async fn list_with_blank_search_returns_everything() {
        let service = service();
        service.create("Alpha".into()).await.unwrap();
        service.create("Beta".into()).await.unwrap();

        assert_eq!(2, service.list(Some("  ".into())).await.unwrap().len());
        assert_eq!(1, service.list(Some("alp".into())).await.unwrap().len());
    }

    #[tokio::test]
    async fn store_failure_is_internal() {
        let service = TopicService::new(
            TestEngine(FailingTopicRepo::default()),
            Telemetry::disabled(),
        );

        let err = service.list(None).await.unwrap_err();

        assert_eq!(&TopicServiceError::Internal, err.current_context());
    }
}
