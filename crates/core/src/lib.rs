//! Teger Core
//!
//! Foundational types for the Teger forensic assistant. This crate has zero
//! dependencies on transport or application-level code (HTTP, config files,
//! CLI, etc.).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `evidence` - Captured communication handed to the pipeline (`Evidence`, `Platform`)
//! - `analysis` - Normalized engine verdict (`AnalysisResult`, `ThreatLevel`) and surface views
//! - `classifier` - Score-derived risk tiers (`RiskClassifier`, `RiskTier`)
//!
//! ## Design Principles
//!
//! 1. **Only serde/thiserror** - keeps the leaf crate cheap to build and test
//! 2. **Pure functions** - classification and projections have no I/O
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod analysis;
pub mod classifier;
pub mod error;
pub mod evidence;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Evidence ───────────────────────────────────────────────────────────
pub use evidence::{Evidence, Platform, UNKNOWN_SENDER};

// ── Analysis Record ────────────────────────────────────────────────────
pub use analysis::{AnalysisResult, DashboardView, PopupView, ThreatLevel};

// ── Classification ─────────────────────────────────────────────────────
pub use classifier::{RiskClassification, RiskClassifier, RiskTier, SeverityBand};
