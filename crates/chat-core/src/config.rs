use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/chat/";
pub const ENV_ENDPOINT: &str = "CHAT_ENDPOINT";
pub const ENV_TIMEOUT_SECS: &str = "CHAT_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Full URL of the chat endpoint that receives the POST.
    pub endpoint: String,
    /// Whole-request timeout. `None` waits for as long as the server takes.
    pub timeout_secs: Option<u64>,
    /// Empty the draft once a submission is dispatched.
    pub clear_draft_on_submit: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
            clear_draft_on_submit: false,
        }
    }
}

impl ClientConfig {
    /// Load a JSON config file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Overlay `CHAT_ENDPOINT` and `CHAT_TIMEOUT_SECS` from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let read = |name: &str| {
            var(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(endpoint) = read(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(raw) = read(ENV_TIMEOUT_SECS) {
            let secs = raw.parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
            self.timeout_secs = Some(secs);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match reqwest::Url::parse(&self.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
            _ => Err(ConfigError::InvalidEndpoint(self.endpoint.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_point_at_local_server() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, "http://localhost:8000/api/chat/");
        assert_eq!(config.timeout(), None);
        assert!(!config.clear_draft_on_submit);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"timeout_secs": 30}}"#).unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn env_overrides_file_values() {
        let vars: HashMap<&str, &str> = [
            (ENV_ENDPOINT, " https://chat.example.com/api/chat/ "),
            (ENV_TIMEOUT_SECS, "12"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config
            .apply_vars(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.endpoint, "https://chat.example.com/api/chat/");
        assert_eq!(config.timeout_secs, Some(12));
    }

    #[test]
    fn blank_env_is_ignored_and_bad_timeout_rejected() {
        let mut config = ClientConfig::default();
        config
            .apply_vars(|name| (name == ENV_ENDPOINT).then(|| "   ".to_string()))
            .unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);

        let err = config
            .apply_vars(|name| (name == ENV_TIMEOUT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: ENV_TIMEOUT_SECS, .. }));
    }

    #[test]
    fn validate_rejects_non_http_endpoints() {
        for endpoint in ["localhost:8000", "ftp://example.com/chat", "not a url"] {
            let config = ClientConfig {
                endpoint: endpoint.to_string(),
                ..ClientConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidEndpoint(_))),
                "{endpoint} should be rejected"
            );
        }
    }
}
