//! Endpoint configuration for the todo API.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

const ENV_BASE_URL: &str = "TODO_API_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "TODO_API_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8787";

/// Base URL and per-operation paths of the todo service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub list_path: String,
    pub create_path: String,
    pub update_path: String,
    pub delete_path: String,
    /// Whole-request timeout. `None` leaves the transport's default in place.
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            list_path: "/todos".to_string(),
            create_path: "/add-todo".to_string(),
            update_path: "/update-todo".to_string(),
            delete_path: "/delete-todo".to_string(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Default paths against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Build a config from environment variables.
    ///
    /// Reads:
    /// - `TODO_API_BASE_URL` - service root, defaults to `http://localhost:8787`
    /// - `TODO_API_TIMEOUT_SECS` - optional request timeout
    ///
    /// # Errors
    /// Returns error if either variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = get(ENV_BASE_URL) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidBaseUrl {
                    var: ENV_BASE_URL,
                    value: url,
                });
            }
            config.base_url = url;
        }

        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidTimeout {
                var: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
            config.timeout_secs = Some(secs);
        }

        debug!(base_url = %config.base_url, timeout_secs = ?config.timeout_secs, "loaded todo API config");
        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
