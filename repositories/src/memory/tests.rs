use super::*;
use engine::error::Classified;

fn new_topic(name: &str) -> NewTopic {
    NewTopic::new(name, engine::slugify(name))
}

fn new_news(title: &str, topic_ids: Vec<TopicId>) -> NewNews {
    NewNews {
        title: title.into(),
        slug: engine::slugify(title),
        status: "draft".into(),
        content: format!("{title} content"),
        topic_ids,
    }
}

#[tokio::test]
async fn get_without_create_returns_none() {
    let repo = InMemoryTopicRepo::default();

    assert_eq!(None, repo.get(TopicId::new()).await.unwrap());
}

#[tokio::test]
async fn list_without_create_returns_empty_list() {
    let store = InMemoryStore::default();

    assert!(store.topics().list(TopicListCriteria::default()).await.unwrap().is_empty());
    assert!(store.news().list(NewsListCriteria::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_topic_then_get_returns_it() {
    let repo = InMemoryTopicRepo::default();
    let topic = repo.create(new_topic("Rust Lang")).await.unwrap();

    assert_eq!("rust-lang", topic.slug);
    assert_eq!(topic.created_at, topic.updated_at);
    assert_eq!(Some(topic.clone()), repo.get(topic.id).await.unwrap());
}

#[tokio::test]
async fn list_topics_keeps_insertion_order_and_filters_by_search() {
    let repo = InMemoryTopicRepo::default();
    let first = repo.create(new_topic("Politics")).await.unwrap();
    let second = repo.create(new_topic("Sports")).await.unwrap();
    let third = repo.create(new_topic("Sports Betting")).await.unwrap();

    let all = repo.list(TopicListCriteria::default()).await.unwrap();
    assert_eq!(vec![first, second.clone(), third.clone()], all);

    let sports = repo
        .list(TopicListCriteria::new(Some("SPORT".into())))
        .await
        .unwrap();
    assert_eq!(vec![second, third], sports);
}

#[tokio::test]
async fn deleted_topic_is_hidden_and_cannot_be_deleted_again() {
    let repo = InMemoryTopicRepo::default();
    let topic = repo.create(new_topic("Tech")).await.unwrap();

    repo.delete(topic.id).await.unwrap();

    assert_eq!(None, repo.get(topic.id).await.unwrap());
    assert!(repo.list(TopicListCriteria::default()).await.unwrap().is_empty());

    let err = repo.delete(topic.id).await.unwrap_err();
    assert_eq!(Reason::NotFound, err.current_context().reason());
}

#[tokio::test]
async fn update_missing_topic_is_not_found() {
    let repo = InMemoryTopicRepo::default();
    let err = repo
        .update(
            TopicId::new(),
            TopicUpdate {
                name: "x".into(),
                slug: "x".into(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(TopicRepoError::Update(Reason::NotFound), *err.current_context());
}

#[tokio::test]
async fn update_topic_overwrites_columns_and_bumps_updated_at() {
    let repo = InMemoryTopicRepo::default();
    let topic = repo.create(new_topic("Old")).await.unwrap();

    let updated = repo
        .update(
            topic.id,
            TopicUpdate {
                name: "New Name".into(),
                slug: "new-name".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(topic.id, updated.id);
    assert_eq!("New Name", updated.name);
    assert_eq!("new-name", updated.slug);
    assert_eq!(topic.created_at, updated.created_at);
    assert!(updated.updated_at >= topic.updated_at);
}

#[tokio::test]
async fn create_news_links_topics_in_order() {
    let store = InMemoryStore::default();
    let politics = store.topics().create(new_topic("Politics")).await.unwrap();
    let economy = store.topics().create(new_topic("Economy")).await.unwrap();

    let news = store
        .news()
        .create(new_news("Elections", vec![economy.id, politics.id]))
        .await
        .unwrap();

    assert_eq!(vec![economy.id, politics.id], news.topic_ids());
    assert_eq!(Some(news.clone()), store.news().get(news.id).await.unwrap());
}

#[tokio::test]
async fn create_news_with_unknown_topic_is_validation_and_stores_nothing() {
    let store = InMemoryStore::default();

    let err = store
        .news()
        .create(new_news("Orphan", vec![TopicId::new()]))
        .await
        .unwrap_err();

    assert_eq!(NewsRepoError::Create(Reason::Validation), *err.current_context());
    assert!(store.news().list(NewsListCriteria::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_news_replaces_topic_set() {
    let store = InMemoryStore::default();
    let a = store.topics().create(new_topic("A")).await.unwrap();
    let b = store.topics().create(new_topic("B")).await.unwrap();
    let news = store.news().create(new_news("Story", vec![a.id])).await.unwrap();

    let updated = store
        .news()
        .update(
            news.id,
            NewsUpdate {
                title: "Story Two".into(),
                slug: "story-two".into(),
                status: "published".into(),
                content: "rewritten".into(),
                topic_ids: vec![b.id],
            },
        )
        .await
        .unwrap();

    assert_eq!(vec![b.id], updated.topic_ids());
    assert_eq!("published", updated.status);
    assert_eq!(news.created_at, updated.created_at);
}

#[tokio::test]
async fn update_news_with_unknown_topic_rolls_back() {
    let store = InMemoryStore::default();
    let a = store.topics().create(new_topic("A")).await.unwrap();
    let news = store.news().create(new_news("Story", vec![a.id])).await.unwrap();

    let err = store
        .news()
        .update(
            news.id,
            NewsUpdate {
                title: "Story Two".into(),
                slug: "story-two".into(),
                status: "published".into(),
                content: "rewritten".into(),
                topic_ids: vec![TopicId::new()],
            },
        )
        .await
        .unwrap_err();

    assert_eq!(NewsRepoError::Update(Reason::Validation), *err.current_context());
    let found = store.news().get(news.id).await.unwrap().unwrap();
    assert_eq!("Story", found.title);
    assert_eq!("draft", found.status);
    assert_eq!(vec![a.id], found.topic_ids());
}

#[tokio::test]
async fn update_deleted_news_is_not_found() {
    let store = InMemoryStore::default();
    let news = store.news().create(new_news("Gone", vec![])).await.unwrap();
    store.news().delete(news.id).await.unwrap();

    let err = store
        .news()
        .update(
            news.id,
            NewsUpdate {
                title: "Back".into(),
                slug: "back".into(),
                status: "draft".into(),
                content: "c".into(),
                topic_ids: vec![],
            },
        )
        .await
        .unwrap_err();

    assert_eq!(Reason::NotFound, err.current_context().reason());
}

#[tokio::test]
async fn deleted_topic_drops_out_of_news_summaries() {
    let store = InMemoryStore::default();
    let kept = store.topics().create(new_topic("Kept")).await.unwrap();
    let dropped = store.topics().create(new_topic("Dropped")).await.unwrap();
    let news = store
        .news()
        .create(new_news("Story", vec![kept.id, dropped.id]))
        .await
        .unwrap();

    store.topics().delete(dropped.id).await.unwrap();

    let news = store.news().get(news.id).await.unwrap().unwrap();
    assert_eq!(vec![kept.id], news.topic_ids());
}

#[tokio::test]
async fn list_news_filters_on_title_or_content() {
    let store = InMemoryStore::default();
    let election = store.news().create(new_news("Election Night", vec![])).await.unwrap();
    store.news().create(new_news("Weather", vec![])).await.unwrap();

    let found = store
        .news()
        .list(NewsListCriteria::new(Some("election".into())))
        .await
        .unwrap();

    assert_eq!(vec![election], found);
}

#[tokio::test]
async fn failing_repos_fail_with_their_reason() {
    let topics = FailingTopicRepo::new(Reason::NotFound);
    let news = FailingNewsRepo::default();

    let err = topics.get(TopicId::new()).await.unwrap_err();
    assert_eq!(TopicRepoError::Get(Reason::NotFound), *err.current_context());

    let err = news.list(NewsListCriteria::default()).await.unwrap_err();
    assert_eq!(NewsRepoError::List(Reason::Persistence), *err.current_context());
}
