use crate::error::NewsServiceError;
use error_stack::Report;

pub type ServiceResult<T> = Result<T, Report<NewsServiceError>>;

pub mod error;
pub mod routes;
pub mod service;
pub mod state;
