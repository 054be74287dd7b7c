use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ServerConfig;
use crate::error::CompletionError;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Produces the assistant's answer for one user message.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, message: &str) -> Result<String, CompletionError>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [PromptMessage<'a>; 2],
}

#[derive(Serialize)]
struct PromptMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `chat/completions` API.
#[derive(Debug, Clone)]
pub struct OpenAiCompleter {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiCompleter {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &ServerConfig) -> Option<Self> {
        let api_key = config.api_key.as_ref()?;
        Some(Self::new(api_key.clone(), config.base_url.clone(), config.model.clone()))
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Completer for OpenAiCompleter {
    async fn complete(&self, message: &str) -> Result<String, CompletionError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: [
                PromptMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                PromptMessage {
                    role: "user",
                    content: message,
                },
            ],
        };

        debug!(model = %self.model, len = message.len(), "requesting completion");
        let response = self
            .http
            .post(self.url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(CompletionError::EmptyChoices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completer(server: &MockServer) -> OpenAiCompleter {
        OpenAiCompleter::new("test-key", format!("{}/v1/", server.uri()), "gpt-3.5-turbo")
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": "hello" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "hi there" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(completer(&server).complete("hello").await.unwrap(), "hi there");
    }

    #[tokio::test]
    async fn upstream_error_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "code": "insufficient_quota", "message": "You exceeded your quota" }
            })))
            .mount(&server)
            .await;

        let err = completer(&server).complete("hello").await.unwrap_err();
        match err {
            CompletionError::Api { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("insufficient_quota"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
            .mount(&server)
            .await;

        let err = completer(&server).complete("hello").await.unwrap_err();
        assert!(matches!(err, CompletionError::EmptyChoices));
    }

    #[test]
    fn missing_key_means_no_completer() {
        let config = ServerConfig {
            api_key: None,
            base_url: "http://localhost".into(),
            model: "m".into(),
            bind: "127.0.0.1:0".parse().unwrap(),
        };
        assert!(OpenAiCompleter::from_config(&config).is_none());
    }
}
