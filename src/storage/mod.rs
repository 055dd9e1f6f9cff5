//! Storage Layer
//!
//! Handles all data persistence: JSON config and the captured-evidence hand-off file.

pub mod config;
pub mod evidence_store;

pub use config::*;
pub use evidence_store::*;
