use engine::error::Reason;
use error_stack::Report;
use std::error::Error;
use tokio_postgres::error::SqlState;

pub mod initializer;
mod insert_many;
pub mod migration;
pub mod news;
mod statements;
pub mod topics;

pub enum ConnectionDetails {
    Url(String),
}

#[derive(Debug, thiserror::Error)]
#[error("failed to initialize postgres {0} repo")]
pub struct RepoInitErr(&'static str);

impl RepoInitErr {
    fn topics() -> Self {
        Self("topics")
    }

    fn news() -> Self {
        Self("news")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to run migrations")]
pub struct RepoMigrationErr;

/// A foreign key violation means the caller referenced a row that doesn't exist,
/// anything else is on us.
fn classify(e: &tokio_postgres::Error) -> Reason {
    match e.code() {
        Some(c) if *c == SqlState::FOREIGN_KEY_VIOLATION => Reason::Validation,
        _ => Reason::Persistence,
    }
}

trait ClassifyExt<T> {
    /// Wraps a driver error into `C`, built from the [`Reason`] the error maps to.
    fn classify<C, F>(self, context: F) -> Result<T, Report<C>>
    where
        C: Error + Send + Sync + 'static,
        F: FnOnce(Reason) -> C;
}

impl<T> ClassifyExt<T> for Result<T, tokio_postgres::Error> {
    fn classify<C, F>(self, context: F) -> Result<T, Report<C>>
    where
        C: Error + Send + Sync + 'static,
        F: FnOnce(Reason) -> C,
    {
        self.map_err(|e| {
            let reason = classify(&e);
            Report::new(e).change_context(context(reason))
        })
    }
}
