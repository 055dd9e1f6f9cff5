//! Engine Types
//!
//! Configuration, retry policy, error taxonomy, and per-attempt records shared by
//! every reasoning engine implementation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default Gemini model collection endpoint. The model name and the
/// `:generateContent` method are appended per request.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default generation model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Configuration for a reasoning engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base endpoint (model collection URL)
    pub endpoint: String,
    /// Model name appended to the endpoint
    pub model: String,
    /// API key, supplied at runtime and never persisted
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds (0 disables the timeout)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Optional proxy URL (http, https, or socks5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
            proxy_url: None,
        }
    }
}

/// Bounded exponential backoff.
///
/// Retry `n` (0-based) waits `initial_backoff_ms * 2^n`. With the defaults that is
/// 1s, 2s, 4s, 8s, 16s across at most 6 tries. No jitter. The ceiling is only
/// applied when `max_backoff_ms` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Additional attempts after the first try
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_backoff_ms: Option<u64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_backoff_ms: 1000,
            max_backoff_ms: None,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
        let ms = self.initial_backoff_ms.saturating_mul(factor);
        let ms = match self.max_backoff_ms {
            Some(cap) => ms.min(cap),
            None => ms,
        };
        Duration::from_millis(ms)
    }

    /// Total number of tries, first attempt included.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Discriminant of [`EngineError`], suitable for UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    RateLimited,
    Engine,
    EmptyResponse,
    MalformedResponse,
    Cancelled,
}

/// Error types for reasoning engine operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineError {
    /// Network/connection error (retryable)
    Transport { message: String },
    /// HTTP 429 (retryable)
    RateLimited { message: String },
    /// Any other non-success HTTP status
    Engine { status: u16, message: String },
    /// Success status but no generated text
    EmptyResponse { message: String },
    /// Text present but not a valid assessment
    MalformedResponse { message: String },
    /// The request was abandoned before completion
    Cancelled,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Transport { .. } => ErrorKind::Transport,
            EngineError::RateLimited { .. } => ErrorKind::RateLimited,
            EngineError::Engine { .. } => ErrorKind::Engine,
            EngineError::EmptyResponse { .. } => ErrorKind::EmptyResponse,
            EngineError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            EngineError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Whether the transport may try again after a backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::Transport { .. } | EngineError::RateLimited { .. }
        )
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        EngineError::MalformedResponse {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Transport { message } => {
                write!(f, "Reasoning engine unreachable: {}", message)
            }
            EngineError::RateLimited { message } => {
                write!(f, "Reasoning engine rate limited: {}", message)
            }
            EngineError::Engine { status, message } => {
                write!(f, "Engine Error ({}): {}", status, message)
            }
            EngineError::EmptyResponse { message } => {
                write!(f, "Reasoning engine returned an empty assessment: {}", message)
            }
            EngineError::MalformedResponse { message } => {
                write!(f, "Malformed assessment: {}", message)
            }
            EngineError::Cancelled => write!(f, "Analysis cancelled"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// How a single HTTP try ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    RetryableFailure(ErrorKind),
    FatalFailure(ErrorKind),
}

/// Record of one try inside a retry loop. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestAttempt {
    /// 1-based attempt number
    pub attempt: u32,
    /// Backoff slept before this attempt
    pub backoff_before_ms: u64,
    /// Sum of all backoff slept up to and including this attempt
    pub elapsed_backoff_ms: u64,
    pub outcome: AttemptOutcome,
}

/// Successful transport result
#[derive(Debug, Clone)]
pub struct EngineReply {
    /// Generated text exactly as returned
    pub text: String,
    pub attempts: Vec<RequestAttempt>,
}

impl EngineReply {
    /// Backoff delays that were slept, in order.
    pub fn delays(&self) -> Vec<Duration> {
        self.attempts
            .iter()
            .filter(|a| a.backoff_before_ms > 0)
            .map(|a| Duration::from_millis(a.backoff_before_ms))
            .collect()
    }
}
