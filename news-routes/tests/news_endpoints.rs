use axum::http::StatusCode;
use axum_test::TestServer;
use engine::id::{NewsId, TopicId};
use engine::telemetry::Telemetry;
use news_core::NewsEngine;
use news_routes::state::NewsAppState;
use repositories::memory::{InMemoryNewsRepo, InMemoryStore, InMemoryTopicRepo};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use topics_core::TopicEngine;
use topics_routes::state::TopicAppState;

#[derive(Clone, Default)]
struct TestEngine(InMemoryStore);

impl TopicEngine for TestEngine {
    type Repo = InMemoryTopicRepo;

    fn topics(&self) -> Self::Repo {
        self.0.topics()
    }
}

impl NewsEngine for TestEngine {
    type Repo = InMemoryNewsRepo;

    fn news(&self) -> Self::Repo {
        self.0.news()
    }
}

#[fixture]
fn server() -> TestServer {
    let engine = TestEngine::default();
    let telemetry = Telemetry::disabled();

    let (router, _) = topics_routes::routes::routes::<(), _>(TopicAppState::new(
        engine.clone(),
        telemetry.clone(),
    ))
    .merge(news_routes::routes::routes(NewsAppState::new(engine, telemetry)))
    .split_for_parts();

    TestServer::new(router).unwrap()
}

async fn topic(server: &TestServer, name: &str) -> String {
    let response = server.post("/topics").json(&json!({ "name": name })).await;
    assert_eq!(StatusCode::CREATED, response.status_code());
    response.json::<Value>()["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

fn topic_ids(news: &Value) -> Vec<String> {
    news["topics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

#[rstest]
#[tokio::test]
async fn create_news_with_topics(server: TestServer) {
    let politics = topic(&server, "Politics").await;

    let response = server
        .post("/news")
        .json(&json!({
            "title": "Election Results Are In",
            "status": "published",
            "content": "The votes have been counted.",
            "topics": [{ "topic_id": politics }],
        }))
        .await;

    assert_eq!(StatusCode::CREATED, response.status_code());
    let body = response.json::<Value>();
    assert_eq!("News successfully created", body["message"]);
    assert_eq!("election-results-are-in", body["data"]["slug"]);
    assert_eq!(vec![politics], topic_ids(&body["data"]));
    assert_eq!("Politics", body["data"]["topics"][0]["name"]);
}

#[rstest]
#[case::malformed(json!([{ "topic_id": "not-a-uuid" }]))]
#[case::unknown(json!([{ "topic_id": TopicId::new().to_string() }]))]
#[tokio::test]
async fn create_news_with_bad_topic_is_bad_request(server: TestServer, #[case] topics: Value) {
    let response = server
        .post("/news")
        .json(&json!({
            "title": "Title",
            "status": "draft",
            "content": "content",
            "topics": topics,
        }))
        .await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status_code());
    assert_eq!(
        json!([]),
        server.get("/news").await.json::<Value>()["data"]
    );
}

#[rstest]
#[tokio::test]
async fn create_news_with_blank_title_is_bad_request(server: TestServer) {
    let response = server
        .post("/news")
        .json(&json!({ "title": "  ", "status": "draft", "content": "c" }))
        .await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status_code());
}

#[rstest]
#[tokio::test]
async fn list_news_searches_title_and_content(server: TestServer) {
    for (title, content) in [("Rust 2024", "editions"), ("Weather", "rust on cars"), ("Other", "nothing")] {
        server
            .post("/news")
            .json(&json!({ "title": title, "status": "draft", "content": content }))
            .await;
    }

    let response = server.get("/news").add_query_param("search", "RUST").await;

    assert_eq!(StatusCode::OK, response.status_code());
    let data = response.json::<Value>()["data"].clone();
    assert_eq!(2, data.as_array().unwrap().len());
    assert_eq!("Rust 2024", data[0]["title"]);
}

#[rstest]
#[tokio::test]
async fn get_news_with_malformed_id_is_bad_request(server: TestServer) {
    let response = server.get("/news/123").await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status_code());
    assert_eq!("Invalid news ID format", response.json::<Value>()["message"]);
}

#[rstest]
#[tokio::test]
async fn update_unknown_news_is_not_found(server: TestServer) {
    let response = server
        .put(&format!("/news/{}", NewsId::new()))
        .json(&json!({ "status": "published" }))
        .await;

    assert_eq!(StatusCode::NOT_FOUND, response.status_code());
    assert_eq!("News not found", response.json::<Value>()["message"]);
}

#[rstest]
#[tokio::test]
async fn deleted_topic_disappears_from_news(server: TestServer) {
    let kept = topic(&server, "Kept").await;
    let dropped = topic(&server, "Dropped").await;
    let news = server
        .post("/news")
        .json(&json!({
            "title": "Story",
            "status": "draft",
            "content": "content",
            "topics": [{ "topic_id": kept }, { "topic_id": dropped }],
        }))
        .await
        .json::<Value>()["data"]
        .clone();

    server.delete(&format!("/topics/{dropped}")).await;

    let news = server
        .get(&format!("/news/{}", news["id"].as_str().unwrap()))
        .await
        .json::<Value>()["data"]
        .clone();
    assert_eq!(vec![kept], topic_ids(&news));
}

#[rstest]
#[tokio::test]
async fn topic_and_news_lifecycle(server: TestServer) {
    let t1 = topic(&server, "Test Topic").await;

    let created = server
        .post("/news")
        .json(&json!({
            "title": "Breaking News",
            "status": "draft",
            "content": "Something happened.",
            "topics": [{ "topic_id": t1 }],
        }))
        .await;
    assert_eq!(StatusCode::CREATED, created.status_code());
    let n1 = created.json::<Value>()["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let path = format!("/news/{n1}");

    let fetched = server.get(&path).await.json::<Value>()["data"].clone();
    assert_eq!(vec![t1.clone()], topic_ids(&fetched));
    assert_eq!("Test Topic", fetched["topics"][0]["name"]);
    assert_eq!("test-topic", fetched["topics"][0]["slug"]);

    let updated = server.put(&path).json(&json!({ "topics": [] })).await;
    assert_eq!(StatusCode::OK, updated.status_code());
    let updated = updated.json::<Value>()["data"].clone();
    assert!(topic_ids(&updated).is_empty());
    assert_eq!("Breaking News", updated["title"]);
    assert_eq!("draft", updated["status"]);

    let refetched = server.get(&path).await.json::<Value>()["data"].clone();
    assert!(topic_ids(&refetched).is_empty());

    let deleted = server.delete(&path).await;
    assert_eq!(StatusCode::NO_CONTENT, deleted.status_code());

    assert_eq!(StatusCode::NOT_FOUND, server.get(&path).await.status_code());
    assert_eq!(StatusCode::NOT_FOUND, server.delete(&path).await.status_code());
}
