use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ConfigError, TransportError};
use crate::model::{ChatError, ChatReply};
use crate::wire::{ChatRequest, ErrorBody};

/// Network boundary to the chat service.
///
/// Implementations perform exactly one call per `send`, with no retries and no
/// validation of `message`. Every failure is already normalized into a
/// [`ChatError`] when it leaves this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, message: &str) -> Result<ChatReply, ChatError>;
}

/// POSTs `{ "message": ... }` as JSON to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ConfigError::Client)?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, message: &str) -> Result<ChatReply, TransportError> {
        let body = ChatRequest {
            message: message.to_string(),
        };
        let response = self.http.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&bytes)?);
        }

        // Non-2xx bodies are best effort: HTML error pages and empty bodies are common.
        let server_message = serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.is_empty());

        Err(TransportError::Status {
            status,
            server_message,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, message: &str) -> Result<ChatReply, ChatError> {
        debug!(endpoint = %self.endpoint, len = message.len(), "posting chat message");

        self.post(message).await.map_err(|err| {
            warn!(endpoint = %self.endpoint, error = %err, "chat request failed");
            ChatError::from(err)
        })
    }
}
