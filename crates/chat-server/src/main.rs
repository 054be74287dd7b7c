use anyhow::Context;
use chat_server::{router, AppState, ServerConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    if config.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set, chat requests will be answered with an error");
    }

    let app = router(AppState::from_config(&config));

    info!(addr = %config.bind, model = %config.model, "chat server listening");
    axum::Server::bind(&config.bind)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
