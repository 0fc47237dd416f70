//! Client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Base URL the console talks to when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Configuration for the catalog client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the catalog API, including the `/api` path.
    pub base_url: String,
    /// Per-request timeout (in seconds).
    pub request_timeout_secs: u64,
    /// How long success/info notices stay visible (in milliseconds).
    pub notice_ttl_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
            notice_ttl_ms: 2_000,
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at a different API base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    /// Base URL without a trailing slash.
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
