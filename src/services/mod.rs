//! Services Layer
//!
//! Prompt construction and the analysis session that drives the
//! reasoning pipeline.

pub mod prompts;
pub mod session;

pub use prompts::{build_prompts, PromptPair};
pub use session::{AnalysisSession, SessionState, Verdict};
