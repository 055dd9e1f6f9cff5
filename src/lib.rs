//! Teger - Forensic Assistant Library
//!
//! Client-side pipeline for detecting social-engineering manipulation in
//! workplace messages. It includes:
//! - CLI definition and command handlers
//! - The analysis session (prompt, transport, validation, classification)
//! - Storage layer (JSON config, captured-evidence hand-off)
//! - Data models and utilities

pub mod cli;
pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use models::response::*;
pub use models::settings::{AppConfig, SettingsUpdate};
pub use services::{AnalysisSession, SessionState, Verdict};
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
