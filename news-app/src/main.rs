use config::AppConfig;
use dotenv::dotenv;
use engine::app::{AppError, AppProperties, AppResult};
use engine::telemetry::Telemetry;
use error_stack::ResultExt;
use error_stack::fmt::ColorMode;
use news_core::NewsRepository;
use repositories::postgres::ConnectionDetails;
use repositories::postgres::initializer::RepoCreator;
use repositories::postgres::news::NewsRepo;
use repositories::postgres::topics::TopicRepo;
use topics_core::TopicRepository;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod config;
mod router;

#[tokio::main]
async fn main() {
    match try_main().await {
        Ok(_) => info!("news service shutting down"),
        Err(e) => {
            error!("news service exited with error: {e:?}");
        }
    }
}

fn init_logging() {
    error_stack::Report::set_color_mode(ColorMode::None);

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("NEWS_LOG"))
        .init();
}

async fn try_main() -> AppResult<()> {
    // loaded before logging so NEWS_LOG can come from the file
    let env_file = dotenv();
    init_logging();
    if let Err(e) = env_file {
        warn!("failed to load .env file: {e}");
    }

    let config = AppConfig::from_env().change_context(AppError)?;
    let telemetry = build_telemetry(config.metrics_enabled)?;
    let (topics, news) = build_repos(&config).await?;

    let routes = router::build(AppEngine::new(topics, news), telemetry);

    engine::app::run(
        routes,
        AppProperties {
            host: config.host,
            port: config.port,
            request_timeout: config.request_timeout,
        },
    )
    .await
}

fn build_telemetry(enabled: bool) -> AppResult<Telemetry> {
    if enabled {
        Telemetry::prometheus().change_context(AppError)
    } else {
        Ok(Telemetry::disabled())
    }
}

#[instrument(skip_all)]
async fn build_repos(config: &AppConfig) -> AppResult<(TopicRepo, NewsRepo)> {
    debug!("initializing repositories");
    RepoCreator::default()
        .with_news()
        .create(
            ConnectionDetails::Url(config.database_url.clone()),
            config.pool_size,
        )
        .await
        .change_context(AppError)
}

#[derive(Debug, Clone)]
struct AppEngine<T, N> {
    topics: T,
    news: N,
}

impl<T, N> AppEngine<T, N> {
    fn new(topics: T, news: N) -> Self {
        Self { topics, news }
    }
}

impl<T, N> topics_core::TopicEngine for AppEngine<T, N>
where
    T: TopicRepository,
    N: Clone + Send + Sync + 'static,
{
    type Repo = T;

    fn topics(&self) -> Self::Repo {
        self.topics.clone()
    }
}

impl<T, N> news_core::NewsEngine for AppEngine<T, N>
where
    T: Clone + Send + Sync + 'static,
    N: NewsRepository,
{
    type Repo = N;

    fn news(&self) -> Self::Repo {
        self.news.clone()
    }
}
