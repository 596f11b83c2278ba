use engine::error::{Classified, Reason};

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum TopicServiceError {
    #[error("Topic not found")]
    NotFound,
    #[error("{0}")]
    Invalid(&'static str),
    #[error("the topic service failed")]
    Internal,
}

impl From<Reason> for TopicServiceError {
    fn from(reason: Reason) -> Self {
        match reason {
            Reason::NotFound => Self::NotFound,
            Reason::Validation => Self::Invalid("Invalid request payload"),
            Reason::Persistence => Self::Internal,
        }
    }
}

impl Classified for TopicServiceError {
    fn reason(&self) -> Reason {
        match self {
            Self::NotFound => Reason::NotFound,
            Self::Invalid(_) => Reason::Validation,
            Self::Internal => Reason::Persistence,
        }
    }
}
