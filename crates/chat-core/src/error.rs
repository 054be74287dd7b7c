use reqwest::StatusCode;
use thiserror::Error;

use crate::model::ChatError;

/// Raw transport failure, before it is flattened into a [`ChatError`].
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}")]
    Status {
        status: StatusCode,
        server_message: Option<String>,
    },

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<TransportError> for ChatError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Status {
                server_message: Some(message),
                ..
            } => ChatError::new(message),
            _ => ChatError::fallback(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid endpoint {0:?}: expected an absolute http(s) URL")]
    InvalidEndpoint(String),

    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
