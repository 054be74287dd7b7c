use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shown whenever a failure carries no server-supplied message.
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

/// Successful reply from the chat service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Assistant text. Travels as `response` on the wire.
    #[serde(rename = "response")]
    pub response_text: String,
}

impl ChatReply {
    pub fn new(response_text: impl Into<String>) -> Self {
        Self {
            response_text: response_text.into(),
        }
    }
}

/// The only failure kind the controller ever sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error_message}")]
pub struct ChatError {
    pub error_message: String,
}

impl ChatError {
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
        }
    }

    pub fn fallback() -> Self {
        Self::new(FALLBACK_ERROR_MESSAGE)
    }
}

/// Lifecycle of the single outstanding chat exchange.
///
/// Exactly one variant is active at a time. A new submission replaces
/// whatever result was shown before.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Succeeded(String),
    Failed(String),
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    pub fn response_text(&self) -> Option<&str> {
        match self {
            RequestState::Succeeded(text) => Some(text),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl From<Result<ChatReply, ChatError>> for RequestState {
    fn from(outcome: Result<ChatReply, ChatError>) -> Self {
        match outcome {
            Ok(reply) => RequestState::Succeeded(reply.response_text),
            Err(err) => RequestState::Failed(err.error_message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_reads_response_field() {
        let reply: ChatReply = serde_json::from_str(r#"{"response":"hi there"}"#).unwrap();
        assert_eq!(reply.response_text, "hi there");
    }

    #[test]
    fn outcome_maps_to_terminal_state() {
        let ok: RequestState = Ok(ChatReply::new("hi")).into();
        assert_eq!(ok.response_text(), Some("hi"));
        assert_eq!(ok.error_message(), None);

        let err: RequestState = Err(ChatError::fallback()).into();
        assert_eq!(err.error_message(), Some(FALLBACK_ERROR_MESSAGE));
        assert!(!err.is_pending());
    }
}
