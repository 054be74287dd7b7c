use std::net::SocketAddr;

use crate::error::ServerConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `None` is allowed at startup; each chat request then fails with a 500.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub bind: SocketAddr,
}

impl ServerConfig {
    /// Reads `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `CHAT_MODEL` and `CHAT_BIND`.
    pub fn from_env() -> Result<Self, ServerConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ServerConfigError> {
        let read = |name: &str| {
            var(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_raw = read("CHAT_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse()
            .map_err(|_| ServerConfigError::InvalidBind(bind_raw.clone()))?;

        Ok(Self {
            api_key: read("OPENAI_API_KEY"),
            base_url: read("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: read("CHAT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            bind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_environment_uses_defaults() {
        let config = ServerConfig::from_vars(|_| None).unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.bind.port(), 8000);
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config =
            ServerConfig::from_vars(|name| (name == "OPENAI_API_KEY").then(|| "  ".into())).unwrap();
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn bad_bind_is_rejected() {
        let err = ServerConfig::from_vars(|name| (name == "CHAT_BIND").then(|| "nowhere".into()))
            .unwrap_err();
        assert!(matches!(err, ServerConfigError::InvalidBind(addr) if addr == "nowhere"));
    }
}
