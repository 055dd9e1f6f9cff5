//! Reasoning Engine Trait
//!
//! Defines the common interface for remote reasoning engines.

use async_trait::async_trait;

use super::types::{EngineError, EngineResult};

/// Trait that all reasoning engines must implement.
///
/// `generate` is exactly one network try. Retry and cancellation live in
/// [`crate::transport::ReasoningTransport`], so implementations stay stateless
/// and reentrant.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    /// Returns the engine name for identification.
    fn name(&self) -> &'static str;

    /// Returns the current model being used.
    fn model(&self) -> &str;

    /// Send one request and return the generated text.
    ///
    /// # Arguments
    /// * `system_instruction` - Fixed analyst instruction
    /// * `user_instruction` - Per-request instruction carrying the evidence
    async fn generate(
        &self,
        system_instruction: &str,
        user_instruction: &str,
    ) -> EngineResult<String>;

    /// Check that the engine is reachable and the key is accepted.
    async fn health_check(&self) -> EngineResult<()>;
}

/// Map a non-success HTTP status to an engine error.
///
/// 429 is the only retryable status; everything else is fatal and carries the
/// status text.
pub fn classify_http_status(status: u16, status_text: &str) -> EngineError {
    match status {
        429 => EngineError::RateLimited {
            message: status_text.to_string(),
        },
        _ => EngineError::Engine {
            status,
            message: status_text.to_string(),
        },
    }
}
