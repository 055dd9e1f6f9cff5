//! Settings Models
//!
//! Application configuration and settings data structures.

use serde::{Deserialize, Serialize};
use teger_llm::{EngineConfig, RetryPolicy, DEFAULT_ENDPOINT, DEFAULT_MODEL};

/// Upper bound on `max_retries`; keeps worst-case waits finite and short-ish.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Application configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Reasoning engine base endpoint (model collection URL)
    pub endpoint: String,
    /// Generation model name
    pub model: String,
    /// Extra attempts after the first try for retryable failures
    pub max_retries: u32,
    /// First backoff delay; doubles per retry
    pub initial_backoff_ms: u64,
    /// Optional backoff ceiling. Unset means uncapped doubling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_backoff_ms: Option<u64>,
    /// Per-request HTTP timeout (0 disables)
    pub request_timeout_secs: u64,
    /// Proxy for engine traffic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_retries: retry.max_retries,
            initial_backoff_ms: retry.initial_backoff_ms,
            max_backoff_ms: retry.max_backoff_ms,
            request_timeout_secs: 60,
            proxy_url: None,
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub max_retries: Option<u32>,
    pub initial_backoff_ms: Option<u64>,
    /// `Some(0)` clears the ceiling
    pub max_backoff_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    /// Empty string clears the proxy
    pub proxy_url: Option<String>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.endpoint.is_none()
            && self.model.is_none()
            && self.max_retries.is_none()
            && self.initial_backoff_ms.is_none()
            && self.max_backoff_ms.is_none()
            && self.request_timeout_secs.is_none()
            && self.proxy_url.is_none()
    }
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(endpoint) = update.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(model) = update.model {
            self.model = model;
        }
        if let Some(retries) = update.max_retries {
            self.max_retries = retries;
        }
        if let Some(backoff) = update.initial_backoff_ms {
            self.initial_backoff_ms = backoff;
        }
        if let Some(cap) = update.max_backoff_ms {
            self.max_backoff_ms = if cap == 0 { None } else { Some(cap) };
        }
        if let Some(timeout) = update.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(proxy) = update.proxy_url {
            self.proxy_url = if proxy.trim().is_empty() {
                None
            } else {
                Some(proxy)
            };
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err("endpoint cannot be empty".to_string());
        }
        if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
            return Err(format!(
                "Invalid endpoint: {}. Must start with http:// or https://",
                self.endpoint
            ));
        }

        if self.model.trim().is_empty() {
            return Err("model cannot be empty".to_string());
        }

        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(format!(
                "max_retries cannot exceed {}",
                MAX_RETRIES_LIMIT
            ));
        }

        if self.initial_backoff_ms == 0 {
            return Err("initial_backoff_ms must be at least 1".to_string());
        }

        if let Some(cap) = self.max_backoff_ms {
            if cap < self.initial_backoff_ms {
                return Err(format!(
                    "max_backoff_ms ({}) cannot be below initial_backoff_ms ({})",
                    cap, self.initial_backoff_ms
                ));
            }
        }

        Ok(())
    }

    /// Retry policy for the transport
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_backoff_ms: self.initial_backoff_ms,
            max_backoff_ms: self.max_backoff_ms,
        }
    }

    /// Engine configuration with a runtime-supplied key
    pub fn engine_config(&self, api_key: Option<String>) -> EngineConfig {
        EngineConfig {
            endpoint: self.endpoint.trim().to_string(),
            model: self.model.trim().to_string(),
            api_key,
            request_timeout_secs: self.request_timeout_secs,
            proxy_url: self.proxy_url.clone(),
        }
    }
}
