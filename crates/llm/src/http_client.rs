//! HTTP Client Factory
//!
//! Provides a factory function for building reqwest clients from engine config.

use std::time::Duration;

use crate::types::{EngineConfig, EngineError, EngineResult};

/// Build a `reqwest::Client` for the configured engine.
///
/// - `proxy_url: Some(url)` -> route every request through that proxy
/// - `proxy_url: None` -> explicitly disable proxy (`no_proxy`), ignoring env vars
/// - `request_timeout_secs: 0` -> no per-request timeout
pub fn build_http_client(config: &EngineConfig) -> EngineResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    match config.proxy_url.as_deref() {
        Some(url) => {
            let proxy = reqwest::Proxy::all(url).map_err(|e| EngineError::Transport {
                message: format!("invalid proxy URL {}: {}", url, e),
            })?;
            builder = builder.proxy(proxy);
        }
        None => {
            builder = builder.no_proxy();
        }
    }
    if config.request_timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
    }
    builder.build().map_err(|e| EngineError::Transport {
        message: format!("failed to build HTTP client: {}", e),
    })
}
