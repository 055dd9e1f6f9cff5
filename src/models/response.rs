//! Response Types
//!
//! Standard response envelope for every CLI command's `--json` output.
//! A response carries either data or a single error message, never both.

use serde::{Deserialize, Serialize};

use crate::services::session::SessionState;

/// Generic command response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response with message
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T> From<Result<T, crate::utils::error::AppError>> for CommandResponse<T> {
    fn from(result: Result<T, crate::utils::error::AppError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Engine health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
    pub engine: String,
    pub model: String,
}

impl HealthResponse {
    pub fn online(engine: &str, model: &str) -> Self {
        Self {
            status: "online".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            service: "teger".to_string(),
            engine: engine.to_string(),
            model: model.to_string(),
        }
    }
}

/// Terminal state of a scan, flattened for output.
impl From<SessionState> for CommandResponse<SessionState> {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Failed { message, .. } => Self::err(message),
            other => Self::ok(other),
        }
    }
}
