use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use chat_core::wire::ChatRequest;
use chat_core::ChatReply;
use tracing::{info, warn};

use crate::completion::{Completer, OpenAiCompleter};
use crate::config::ServerConfig;
use crate::error::ApiError;

pub const CHAT_PATH: &str = "/api/chat/";

#[derive(Clone)]
pub struct AppState {
    completer: Option<Arc<dyn Completer>>,
}

impl AppState {
    pub fn new(completer: Option<Arc<dyn Completer>>) -> Self {
        Self { completer }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        let completer = OpenAiCompleter::from_config(config)
            .map(|completer| Arc::new(completer) as Arc<dyn Completer>);
        Self::new(completer)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(CHAT_PATH, post(chat_handler))
        .with_state(state)
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let Some(completer) = state.completer.as_ref() else {
        warn!("chat request rejected, no API key configured");
        return Err(ApiError::missing_key());
    };

    match completer.complete(&req.message).await {
        Ok(text) => {
            info!(len = req.message.len(), "chat request answered");
            Ok(Json(ChatReply::new(text)))
        }
        Err(err) => {
            warn!(error = %err, "completion failed");
            Err(ApiError::from(err))
        }
    }
}
