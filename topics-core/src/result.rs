use engine::error::{Classified, Reason};
use error_stack::Report;

pub type RepoResult<T> = Result<T, Report<TopicRepoError>>;
pub type OptRepoResult<T> = Result<Option<T>, Report<TopicRepoError>>;

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum TopicRepoError {
    #[error("failed to get topic: {0}")]
    Get(Reason),
    #[error("failed to list topics: {0}")]
    List(Reason),
    #[error("failed to create topic: {0}")]
    Create(Reason),
    #[error("failed to update topic: {0}")]
    Update(Reason),
    #[error("failed to delete topic: {0}")]
    Delete(Reason),
}

impl Classified for TopicRepoError {
    fn reason(&self) -> Reason {
        match self {
            TopicRepoError::Get(r)
            | TopicRepoError::List(r)
            | TopicRepoError::Create(r)
            | TopicRepoError::Update(r)
            | TopicRepoError::Delete(r) => *r,
        }
    }
}
