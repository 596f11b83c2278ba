use engine::error::{Classified, Reason};

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum NewsServiceError {
    #[error("News not found")]
    NotFound,
    #[error("{0}")]
    Invalid(&'static str),
    #[error("the news service failed")]
    Internal,
}

impl From<Reason> for NewsServiceError {
    fn from(reason: Reason) -> Self {
        match reason {
            Reason::NotFound => Self::NotFound,
            // the store only rejects input that names a topic which doesn't exist
            Reason::Validation => Self::Invalid("One or more topics do not exist"),
            Reason::Persistence => Self::Internal,
        }
    }
}

impl Classified for NewsServiceError {
    fn reason(&self) -> Reason {
        match self {
            Self::NotFound => Reason::NotFound,
            Self::Invalid(_) => Reason::Validation,
            Self::Internal => Reason::Persistence,
        }
    }
}
