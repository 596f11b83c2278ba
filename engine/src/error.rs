use crate::response::ApiResponse;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use error_stack::Report;
use std::error::Error;
use tracing::error;

/// Why an operation failed, as far as a caller needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Reason {
    #[error("the requested entity does not exist")]
    NotFound,
    #[error("the request was invalid")]
    Validation,
    #[error("the data layer failed")]
    Persistence,
}

impl Reason {
    pub fn status_code(self) -> StatusCode {
        match self {
            Reason::NotFound => StatusCode::NOT_FOUND,
            Reason::Validation => StatusCode::BAD_REQUEST,
            Reason::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error contexts that carry a [`Reason`].
pub trait Classified {
    fn reason(&self) -> Reason;
}

impl Classified for Reason {
    fn reason(&self) -> Reason {
        *self
    }
}

pub trait ReasonExt<T> {
    /// Like `change_context`, but the new context is built from the reason of the current one,
    /// so a `NotFound` coming out of a repository stays a `NotFound` at the service layer.
    fn change_reason<C, F>(self, context: F) -> Result<T, Report<C>>
    where
        C: Error + Send + Sync + 'static,
        F: FnOnce(Reason) -> C;
}

impl<T, E> ReasonExt<T> for Result<T, Report<E>>
where
    E: Classified + Error + Send + Sync + 'static,
{
    fn change_reason<C, F>(self, context: F) -> Result<T, Report<C>>
    where
        C: Error + Send + Sync + 'static,
        F: FnOnce(Reason) -> C,
    {
        self.map_err(|report| {
            let reason = report.current_context().reason();
            report.change_context(context(reason))
        })
    }
}

#[derive(thiserror::Error)]
#[error("there was an error running the endpoint")]
pub struct EndpointError<T: Error>(Report<T>);

impl<T: Error> EndpointError<T> {
    pub fn report(&self) -> &Report<T> {
        &self.0
    }
}

impl<T: Error> std::fmt::Debug for EndpointError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> From<Report<T>> for EndpointError<T>
where
    T: Error,
{
    fn from(value: Report<T>) -> Self {
        Self(value)
    }
}

impl<T> IntoResponse for EndpointError<T>
where
    T: Error + Classified + Send + Sync + 'static,
{
    fn into_response(self) -> axum::response::Response {
        let context = self.0.current_context();
        let reason = context.reason();
        // the context's own message is meant for callers, except when the data layer broke
        let message = match reason {
            Reason::Persistence => {
                error!("endpoint failed: {:?}", self.0);
                reason.to_string()
            }
            Reason::NotFound | Reason::Validation => context.to_string(),
        };
        ApiResponse::<()>::error(reason.status_code(), message).into_response()
    }
}
