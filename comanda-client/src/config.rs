//! Client configuration

use std::time::Duration;

use crate::notify::ReconnectPolicy;
use crate::{ClientError, ClientResult};

/// Client configuration for the restaurant backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST base URL (e.g., "https://api.comanda.app")
    pub base_url: String,

    /// WebSocket base URL; derived from `base_url` when unset
    pub ws_url: Option<String>,

    /// Session token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Notification channel reconnect policy
    pub reconnect: ReconnectPolicy,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ws_url: None,
            token: None,
            timeout: 30,
            reconnect: ReconnectPolicy::default(),
        }
    }

    /// Load from environment variables, falling back to defaults
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | COMANDA_API_URL | http://localhost:8000 |
    /// | COMANDA_WS_URL | derived from the API URL |
    /// | COMANDA_TIMEOUT_SECS | 30 |
    /// | COMANDA_RECONNECT_DELAY_MS | 5000 |
    /// | COMANDA_RECONNECT_MAX_DELAY_MS | 60000 |
    /// | COMANDA_RECONNECT_MAX_ATTEMPTS | 20 (0 = unlimited) |
    pub fn from_env() -> ClientResult<Self> {
        let base_url =
            std::env::var("COMANDA_API_URL").unwrap_or_else(|_| "http://localhost:8000".into());
        let mut config = Self::new(base_url);
        config.ws_url = std::env::var("COMANDA_WS_URL").ok();
        if let Some(timeout) = env_parse::<u64>("COMANDA_TIMEOUT_SECS")? {
            config.timeout = timeout;
        }

        let mut policy = ReconnectPolicy::default();
        if let Some(ms) = env_parse::<u64>("COMANDA_RECONNECT_DELAY_MS")? {
            policy = policy.with_base_delay(Duration::from_millis(ms));
        }
        if let Some(ms) = env_parse::<u64>("COMANDA_RECONNECT_MAX_DELAY_MS")? {
            policy = policy.with_max_delay(Duration::from_millis(ms));
        }
        if let Some(n) = env_parse::<u32>("COMANDA_RECONNECT_MAX_ATTEMPTS")? {
            policy = policy.with_max_attempts(n);
        }
        config.reconnect = policy;
        Ok(config)
    }

    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = Some(url.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    /// WebSocket base: explicit `ws_url`, else `base_url` with the scheme
    /// swapped (`http` -> `ws`, `https` -> `wss`)
    pub fn ws_base(&self) -> ClientResult<String> {
        let raw = self.ws_url.as_deref().unwrap_or(&self.base_url);
        let trimmed = raw.trim_end_matches('/');
        if trimmed.starts_with("ws://") || trimmed.starts_with("wss://") {
            return Ok(trimmed.to_string());
        }
        if let Some(rest) = trimmed.strip_prefix("https://") {
            return Ok(format!("wss://{rest}"));
        }
        if let Some(rest) = trimmed.strip_prefix("http://") {
            return Ok(format!("ws://{rest}"));
        }
        Err(ClientError::Config(format!(
            "Unsupported URL scheme for notifications: {raw}"
        )))
    }

    /// Create a REST client from this configuration
    pub fn build_rest_client(&self) -> ClientResult<crate::RestClient> {
        crate::RestClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> ClientResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ClientError::Config(format!("{key}={raw}: {e}"))),
        Err(_) => Ok(None),
    }
}
