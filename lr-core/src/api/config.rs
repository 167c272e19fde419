use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_ALLOW_ORIGIN: &str = "http://localhost:8081";

/// Connection settings for the readings backend.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL the endpoint paths are appended to
    pub base_url: String,
    /// Origin announced in the CORS allowance header of authenticated requests
    pub allow_origin: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Attempts per request before giving up (at least one is always made)
    pub max_tries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            allow_origin: DEFAULT_ALLOW_ORIGIN.to_string(),
            timeout_secs: 30,
            max_tries: 3,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
