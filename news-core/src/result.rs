use engine::error::{Classified, Reason};
use error_stack::Report;

pub type RepoResult<T> = Result<T, Report<NewsRepoError>>;
pub type OptRepoResult<T> = Result<Option<T>, Report<NewsRepoError>>;

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum NewsRepoError {
    #[error("failed to get news: {0}")]
    Get(Reason),
    #[error("failed to list news: {0}")]
    List(Reason),
    #[error("failed to create news: {0}")]
    Create(Reason),
    #[error("failed to update news: {0}")]
    Update(Reason),
    #[error("failed to delete news: {0}")]
    Delete(Reason),
}

impl Classified for NewsRepoError {
    fn reason(&self) -> Reason {
        match self {
            NewsRepoError::Get(r)
            | NewsRepoError::List(r)
            | NewsRepoError::Create(r)
            | NewsRepoError::Update(r)
            | NewsRepoError::Delete(r) => *r,
        }
    }
}
