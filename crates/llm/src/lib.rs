//! Teger LLM
//!
//! Client side of the reasoning-request pipeline:
//! - `ReasoningEngine` trait and the Gemini implementation
//! - `ReasoningTransport`, the bounded exponential-backoff retry loop
//! - `ResponseValidator`, which turns raw engine text into an `AnalysisResult`
//!
//! Also includes the HTTP client factory.

pub mod gemini;
pub mod http_client;
pub mod provider;
pub mod response;
pub mod transport;
pub mod types;

// Re-export main types
pub use gemini::GeminiEngine;
pub use http_client::build_http_client;
pub use provider::{classify_http_status, ReasoningEngine};
pub use response::ResponseValidator;
pub use transport::ReasoningTransport;
pub use types::*;

// Re-export cancellation so consumers don't need tokio-util directly
pub use tokio_util::sync::CancellationToken;
