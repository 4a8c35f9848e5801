use axum::extract::rejection::FormRejection;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use micropost_auth::{CoordinationError, SessionError};

use crate::access::AccessRejection;

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Map coordination failures to status codes
impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| (coordination_status(&e), e.to_string()))
    }
}

fn coordination_status(error: &CoordinationError) -> StatusCode {
    match error {
        CoordinationError::Unauthorized => StatusCode::FORBIDDEN,
        CoordinationError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        CoordinationError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CoordinationError::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl<T> IntoResponseError<T> for Result<T, SessionError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
    }
}

impl<T> IntoResponseError<T> for Result<T, askama::Error> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
    }
}

/// Error type of every page handler.
#[derive(Debug)]
pub(crate) enum PageError {
    Rejected(AccessRejection),
    Status(StatusCode, String),
}

impl PageError {
    pub(crate) fn forbidden(message: &str) -> Self {
        PageError::Status(StatusCode::FORBIDDEN, message.to_string())
    }
}

impl From<AccessRejection> for PageError {
    fn from(rejection: AccessRejection) -> Self {
        PageError::Rejected(rejection)
    }
}

impl From<(StatusCode, String)> for PageError {
    fn from((status, message): (StatusCode, String)) -> Self {
        PageError::Status(status, message)
    }
}

impl From<CoordinationError> for PageError {
    fn from(error: CoordinationError) -> Self {
        PageError::Status(coordination_status(&error), error.to_string())
    }
}

impl From<FormRejection> for PageError {
    fn from(rejection: FormRejection) -> Self {
        PageError::Status(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::Rejected(rejection) => rejection.into_response(),
            PageError::Status(status, message) if status.is_server_error() => {
                // details stay in the log
                tracing::error!(%status, detail = %message, "Request failed");
                (status, "We're sorry, but something went wrong.").into_response()
            }
            PageError::Status(StatusCode::NOT_FOUND, message) => {
                tracing::debug!(detail = %message, "Not found");
                (
                    StatusCode::NOT_FOUND,
                    "The page you were looking for doesn't exist.",
                )
                    .into_response()
            }
            PageError::Status(status, message) => (status, message).into_response(),
        }
    }
}
