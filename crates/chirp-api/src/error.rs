use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Failures raised by the managers. Every variant except `Storage` is caused by
/// client input and is never retried.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(
        "Username or password is invalid. Username must not be empty and password must be at least 4 characters."
    )]
    InvalidCredentials,

    #[error("{0} is already taken. Please choose a different username.")]
    DuplicateUsername(String),

    #[error("Credentials could not be authenticated. Check username and password and try again.")]
    AuthenticationFailed,

    #[error("Message text must not be blank and cannot have more than 255 characters.")]
    InvalidMessageText,

    /// An account or message id that the request depends on does not exist.
    #[error("{0}")]
    ReferenceNotFound(String),

    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::InvalidMessageText | Self::ReferenceNotFound(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::DuplicateUsername(_) => StatusCode::CONFLICT,
            Self::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Anything a handler can fail with. Rendered as a plain-text body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The request body could not be read as the expected JSON.
    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Service(err) => err.status(),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Service(ServiceError::Storage(err)) => {
                error!("Storage failure: {:#}", err);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}
