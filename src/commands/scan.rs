//! Scan Commands
//!
//! Submit evidence to the analysis session and report the terminal state.

use std::io::Read;
use std::path::Path;

use teger_core::Evidence;

use crate::models::response::CommandResponse;
use crate::services::session::{AnalysisSession, SessionState};
use crate::state::AppState;
use crate::storage::EvidenceStore;
use crate::utils::error::{AppError, AppResult};

/// Where scan evidence comes from
#[derive(Debug, Clone)]
pub enum EvidenceSource {
    Direct(Evidence),
    /// The capture left in the hand-off store
    Pending,
}

/// Read evidence text from a file, or stdin when the path is `-`
pub fn read_evidence_text(path: &Path) -> AppResult<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Run one scan with the configured engine
pub async fn scan(state: &AppState, source: EvidenceSource) -> CommandResponse<SessionState> {
    let session = match state.analysis_session().await {
        Ok(session) => session,
        Err(e) => return CommandResponse::err(e.to_string()),
    };
    let result = scan_with_session(&session, state.evidence_store(), source).await;
    session.shutdown();
    match result {
        Ok(terminal) => terminal.into(),
        Err(e) => CommandResponse::err(e.to_string()),
    }
}

/// Run one scan against an existing session
pub async fn scan_with_session(
    session: &AnalysisSession,
    store: &EvidenceStore,
    source: EvidenceSource,
) -> AppResult<SessionState> {
    match source {
        EvidenceSource::Direct(evidence) if !evidence.has_text() => {
            Err(AppError::validation("evidence text cannot be empty"))
        }
        EvidenceSource::Direct(evidence) => Ok(session.submit(evidence).await),
        EvidenceSource::Pending => session
            .submit_pending(store)
            .await?
            .ok_or_else(|| AppError::not_found("no pending capture to scan")),
    }
}
