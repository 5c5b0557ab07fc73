//! Monitor configuration
//!
//! # Environment
//!
//! | Variable | Default |
//! |----------|---------|
//! | COMANDA_STATE_FILE | ./comanda-session.json |
//! | LOG_LEVEL | info |
//! | LOG_DIR | unset (console only) |
//!
//! plus the `COMANDA_*` client variables read by
//! [`ClientConfig::from_env`].

use std::path::PathBuf;

use comanda_client::ClientConfig;

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub client: ClientConfig,
    /// Session file
    pub state_file: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl MonitorConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            client: ClientConfig::from_env()?,
            state_file: std::env::var("COMANDA_STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("comanda-session.json")),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().map(PathBuf::from),
        })
    }

    /// Apply command line overrides
    pub fn with_overrides(
        mut self,
        api_url: Option<String>,
        state_file: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Self {
        if let Some(url) = api_url {
            self.client.base_url = url;
        }
        if let Some(path) = state_file {
            self.state_file = path;
        }
        if let Some(level) = log_level {
            self.log_level = level;
        }
        self
    }
}
