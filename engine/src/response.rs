use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;

pub type MessageType = Cow<'static, str>;

const SUCCESS: &str = "success";
const ERROR: &str = "error";

/// The envelope every JSON endpoint answers with.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    #[serde(skip)]
    status_code: StatusCode,
    pub code: u16,
    #[schema(value_type = String)]
    pub status: Cow<'static, str>,
    #[schema(value_type = String)]
    pub message: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(
        status_code: StatusCode,
        status: &'static str,
        message: impl Into<MessageType>,
        data: Option<T>,
    ) -> Self {
        Self {
            status_code,
            code: status_code.as_u16(),
            status: Cow::Borrowed(status),
            message: message.into(),
            data,
        }
    }

    pub fn ok(message: impl Into<MessageType>, data: T) -> Self {
        Self::new(StatusCode::OK, SUCCESS, message, Some(data))
    }

    pub fn created(message: impl Into<MessageType>, data: T) -> Self {
        Self::new(StatusCode::CREATED, SUCCESS, message, Some(data))
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }
}

impl ApiResponse<()> {
    pub fn message(status_code: StatusCode, message: impl Into<MessageType>) -> Self {
        Self::new(status_code, SUCCESS, message, None)
    }

    pub fn error(status_code: StatusCode, message: impl Into<MessageType>) -> Self {
        Self::new(status_code, ERROR, message, None)
    }

    pub fn bad_request(message: impl Into<MessageType>) -> Self {
        Self::error(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<MessageType>) -> Self {
        Self::error(StatusCode::NOT_FOUND, message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}
