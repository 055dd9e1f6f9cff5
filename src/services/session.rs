//! Analysis Session
//!
//! Orchestrates one "submit evidence -> receive verdict" cycle and owns the
//! observable [`SessionState`].
//!
//! ## Lifecycle
//!
//! `Idle -> Pending -> (Succeeded | Failed)`. Every accepted submission starts
//! a fresh `Pending` cycle and drops whatever terminal state came before.
//!
//! ## Concurrency
//!
//! Submissions supersede each other: starting a new one cancels the in-flight
//! pipeline, and a result that arrives for a superseded submission is discarded.
//! Observers only ever see the outcome of the most recent submission.
//! The state lives in a `tokio::sync::watch` channel; consumers subscribe and
//! never write to it.

use serde::{Deserialize, Serialize};
use teger_core::{AnalysisResult, Evidence, RiskClassification, RiskClassifier};
use teger_llm::{
    CancellationToken, EngineError, EngineResult, ErrorKind, ReasoningTransport,
    ResponseValidator,
};
use tokio::sync::{watch, Mutex};

use super::prompts::build_prompts;
use crate::storage::EvidenceStore;
use crate::utils::error::AppResult;

/// A validated, classified assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub analysis: AnalysisResult,
    pub classification: RiskClassification,
    /// Network tries it took, first included
    pub attempts: u32,
}

/// Observable session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Pending,
    Succeeded(Verdict),
    Failed { kind: ErrorKind, message: String },
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Succeeded(_) | SessionState::Failed { .. })
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            SessionState::Succeeded(verdict) => Some(verdict),
            _ => None,
        }
    }

    fn from_outcome(outcome: EngineResult<Verdict>) -> Self {
        match outcome {
            Ok(verdict) => SessionState::Succeeded(verdict),
            Err(err) => SessionState::Failed {
                kind: err.kind(),
                message: err.to_string(),
            },
        }
    }
}

struct Inflight {
    generation: u64,
    cancel: Option<CancellationToken>,
}

/// Runs the prompt -> transport -> validate -> classify pipeline.
pub struct AnalysisSession {
    transport: ReasoningTransport,
    state_tx: watch::Sender<SessionState>,
    inflight: Mutex<Inflight>,
    shutdown: CancellationToken,
}

impl AnalysisSession {
    pub fn new(transport: ReasoningTransport) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Idle);
        Self {
            transport,
            state_tx,
            inflight: Mutex::new(Inflight {
                generation: 0,
                cancel: None,
            }),
            shutdown: CancellationToken::new(),
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Receive every state transition
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Submit evidence and wait for its terminal state.
    ///
    /// Evidence without text is ignored and the current state is returned.
    /// If this submission is superseded before it finishes, its outcome is
    /// discarded and the state at that moment is returned instead.
    pub async fn submit(&self, evidence: Evidence) -> SessionState {
        if !evidence.has_text() {
            tracing::debug!("session: ignoring evidence without text");
            return self.state();
        }
        if self.shutdown.is_cancelled() {
            tracing::debug!("session: shut down, ignoring submission");
            return self.state();
        }

        let (generation, cancel) = {
            let mut inflight = self.inflight.lock().await;
            if let Some(previous) = inflight.cancel.take() {
                tracing::debug!(
                    generation = inflight.generation,
                    "session: superseding in-flight submission"
                );
                previous.cancel();
            }
            inflight.generation += 1;
            let token = self.shutdown.child_token();
            inflight.cancel = Some(token.clone());
            self.state_tx.send_replace(SessionState::Pending);
            (inflight.generation, token)
        };

        tracing::info!(
            generation,
            platform = %evidence.platform,
            text_len = evidence.text.len(),
            "session: submission started"
        );

        let outcome = self.run_pipeline(&evidence, &cancel).await;

        let mut inflight = self.inflight.lock().await;
        if inflight.generation != generation {
            tracing::debug!(generation, "session: discarding stale outcome");
            return self.state();
        }
        inflight.cancel = None;
        if cancel.is_cancelled() {
            // Still the latest submission, so only shutdown can have fired.
            tracing::debug!(generation, "session: shut down mid-flight");
            self.state_tx.send_replace(SessionState::Idle);
            return SessionState::Idle;
        }

        let next = SessionState::from_outcome(outcome);
        match &next {
            SessionState::Succeeded(verdict) => tracing::info!(
                generation,
                risk_score = verdict.analysis.risk_score,
                tier = ?verdict.classification.tier,
                attempts = verdict.attempts,
                "session: succeeded"
            ),
            SessionState::Failed { kind, .. } => {
                tracing::warn!(generation, kind = ?kind, "session: failed")
            }
            _ => {}
        }
        self.state_tx.send_replace(next.clone());
        next
    }

    /// Consume the pending hand-off capture, if any, and submit it.
    ///
    /// Returns `Ok(None)` when nothing was waiting in the store.
    pub async fn submit_pending(&self, store: &EvidenceStore) -> AppResult<Option<SessionState>> {
        match store.load_pending_evidence()? {
            Some(evidence) => Ok(Some(self.submit(evidence).await)),
            None => Ok(None),
        }
    }

    /// Abandon the in-flight submission, if any, and return to `Idle`.
    pub async fn cancel(&self) {
        let mut inflight = self.inflight.lock().await;
        if let Some(token) = inflight.cancel.take() {
            token.cancel();
            // Bump so the abandoned pipeline can't publish.
            inflight.generation += 1;
            self.state_tx.send_replace(SessionState::Idle);
        }
    }

    /// Tear the session down. In-flight work is cancelled, its submission
    /// settles on `Idle`, and later submissions are ignored.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    async fn run_pipeline(
        &self,
        evidence: &Evidence,
        cancel: &CancellationToken,
    ) -> EngineResult<Verdict> {
        let prompts = build_prompts(evidence);
        let reply = self
            .transport
            .send(&prompts.system_instruction, &prompts.user_instruction, cancel)
            .await?;
        if cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        let analysis = ResponseValidator::parse(&reply.text)?;
        let classification = RiskClassifier::classify(analysis.risk_score);
        Ok(Verdict {
            analysis,
            classification,
            attempts: reply.attempts.len() as u32,
        })
    }
}

impl Drop for AnalysisSession {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
