use crate::error::TopicServiceError;
use error_stack::Report;

pub type ServiceResult<T> = Result<T, Report<TopicServiceError>>;

pub mod error;
pub mod routes;
pub mod service;
pub mod state;
