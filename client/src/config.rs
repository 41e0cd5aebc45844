//! Client configuration.
//!
//! Loaded from environment variables with sensible defaults, matching a
//! local backend on the default Spring port.

use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend API, including the `/api` prefix.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// - `TAROUDANT_API_URL` (default `http://localhost:8080/api`)
    /// - `TAROUDANT_API_TIMEOUT` (default 30 seconds)
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("TAROUDANT_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080/api".to_string()),
            timeout_secs: env::var("TAROUDANT_API_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
