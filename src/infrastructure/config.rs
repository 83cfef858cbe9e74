//! Application configuration
//!
//! Serde-described settings with sensible defaults, layered with an optional
//! `shelfwatch.toml` file and `SHELFWATCH_*` environment overrides.

use serde::{Deserialize, Serialize};

use crate::domain::constants::cadence;

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_refresh_interval_secs() -> u64 {
    cadence::REFRESH_INTERVAL_SECS
}

fn default_user_agent() -> String {
    format!("shelfwatch/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the remote product API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Transport timeout for a single round trip; the engine imposes no
    /// deadline of its own on top of this
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Cadence of the periodic auto-refresh task
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, overridden by `shelfwatch.toml` if
    /// present, overridden by `SHELFWATCH_*` environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("shelfwatch").required(false))
            .add_source(config::Environment::with_prefix("SHELFWATCH"))
            .build()?;
        settings.try_deserialize()
    }
}
