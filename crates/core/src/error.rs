//! Core Error Types
//!
//! Defines the foundational error types used across the Teger workspace.
//! These error types are dependency-free (only thiserror + std) to keep the core
//! crate lightweight.
//!
//! The engine crate and the application crate extend these with their own
//! error enums (transport failures, config files, etc.).

use thiserror::Error;

/// Core error type for the Teger workspace.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A label could not be parsed into a known value
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
