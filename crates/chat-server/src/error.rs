use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chat_core::wire::ErrorBody;
use thiserror::Error;

pub const MISSING_KEY_MESSAGE: &str = "OpenAI API key not found in environment variables";
pub const QUOTA_MESSAGE: &str = "OpenAI API quota exceeded. Please check your billing status.";

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx from the model API, with its raw body.
    #[error("Error code: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("model returned no choices")]
    EmptyChoices,
}

#[derive(Error, Debug)]
pub enum ServerConfigError {
    #[error("invalid bind address {0:?}")]
    InvalidBind(String),
}

/// Error reply: a status code plus `{ "error": message }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn missing_key() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, MISSING_KEY_MESSAGE)
    }
}

impl From<CompletionError> for ApiError {
    fn from(err: CompletionError) -> Self {
        let message = err.to_string();
        if message.contains("insufficient_quota") {
            return Self::new(StatusCode::TOO_MANY_REQUESTS, QUOTA_MESSAGE);
        }
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_errors_become_429() {
        let err = CompletionError::Api {
            status: 429,
            body: r#"{"error":{"code":"insufficient_quota"}}"#.into(),
        };
        assert_eq!(
            ApiError::from(err),
            ApiError::new(StatusCode::TOO_MANY_REQUESTS, QUOTA_MESSAGE)
        );
    }

    #[test]
    fn other_errors_keep_their_text() {
        let api = ApiError::from(CompletionError::Api {
            status: 401,
            body: "bad key".into(),
        });
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "Error code: 401 - bad key");

        let empty = ApiError::from(CompletionError::EmptyChoices);
        assert_eq!(empty.message, "model returned no choices");
    }
}
