//! Capture Commands
//!
//! Leave evidence in the hand-off store for a later `scan --pending`.

use teger_core::Evidence;

use crate::models::response::CommandResponse;
use crate::state::AppState;
use crate::storage::PendingCapture;
use crate::utils::error::AppError;

/// Store evidence as the pending capture
pub fn capture(state: &AppState, evidence: Evidence) -> CommandResponse<PendingCapture> {
    if !evidence.has_text() {
        return CommandResponse::err(AppError::validation("evidence text cannot be empty").to_string());
    }
    state.evidence_store().save_pending_evidence(&evidence).into()
}

/// Show the pending capture without consuming it
pub fn show_pending(state: &AppState) -> CommandResponse<Option<PendingCapture>> {
    state.evidence_store().peek_pending().into()
}
