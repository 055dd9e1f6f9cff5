//! Reasoning Transport
//!
//! Wraps a [`ReasoningEngine`] in a bounded retry loop with exponential backoff.
//!
//! - Transport failures and HTTP 429 are retried, up to `max_retries` extra tries.
//! - Every other error is returned immediately.
//! - When the budget is spent, the last retryable error is returned as-is.
//! - The cancellation token is checked before each network call and before each
//!   backoff sleep, and both awaits race against it.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::provider::ReasoningEngine;
use super::types::{
    AttemptOutcome, EngineError, EngineReply, EngineResult, RequestAttempt, RetryPolicy,
};

/// Stateless retrying sender. Cheap to clone.
#[derive(Clone)]
pub struct ReasoningTransport {
    engine: Arc<dyn ReasoningEngine>,
    policy: RetryPolicy,
}

impl ReasoningTransport {
    pub fn new(engine: Arc<dyn ReasoningEngine>, policy: RetryPolicy) -> Self {
        Self { engine, policy }
    }

    /// Send both instructions and return the raw generated text.
    pub async fn send(
        &self,
        system_instruction: &str,
        user_instruction: &str,
        cancel: &CancellationToken,
    ) -> EngineResult<EngineReply> {
        let mut attempts: Vec<RequestAttempt> = Vec::new();
        let mut retries_used: u32 = 0;
        let mut backoff_before = Duration::ZERO;
        let mut elapsed_backoff = Duration::ZERO;

        loop {
            if cancel.is_cancelled() {
                return Err(EngineError::Cancelled);
            }

            let attempt = retries_used + 1;
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(EngineError::Cancelled),
                r = self.engine.generate(system_instruction, user_instruction) => r,
            };

            let mut record = RequestAttempt {
                attempt,
                backoff_before_ms: backoff_before.as_millis() as u64,
                elapsed_backoff_ms: elapsed_backoff.as_millis() as u64,
                outcome: AttemptOutcome::Success,
            };

            let err = match result {
                Ok(text) => {
                    attempts.push(record);
                    tracing::debug!(
                        engine = self.engine.name(),
                        attempt,
                        "transport: engine replied"
                    );
                    return Ok(EngineReply { text, attempts });
                }
                Err(err) => err,
            };

            if !err.is_retryable() || retries_used >= self.policy.max_retries {
                record.outcome = AttemptOutcome::FatalFailure(err.kind());
                attempts.push(record);
                tracing::warn!(
                    engine = self.engine.name(),
                    attempt,
                    max_attempts = self.policy.max_attempts(),
                    error = %err,
                    "transport: giving up"
                );
                return Err(err);
            }

            record.outcome = AttemptOutcome::RetryableFailure(err.kind());
            attempts.push(record);

            let wait = self.policy.delay_for(retries_used);
            tracing::warn!(
                engine = self.engine.name(),
                attempt,
                max_attempts = self.policy.max_attempts(),
                wait_ms = wait.as_millis() as u64,
                error = %err,
                "transport: retryable error, backing off"
            );

            if cancel.is_cancelled() {
                return Err(EngineError::Cancelled);
            }
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(EngineError::Cancelled),
                _ = tokio::time::sleep(wait) => {}
            }

            retries_used += 1;
            backoff_before = wait;
            elapsed_backoff += wait;
        }
    }
}
