//! Analysis Flow Integration Tests
//!
//! Drives `AnalysisSession` end to end over a scripted engine:
//! - The CEO wire-transfer scenario
//! - Retry behavior as seen through the session
//! - Failure states and the single error message
//! - Hand-off store consumption through the scan command

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use teger::commands::{render_state, scan_with_session, EvidenceSource, ReportOptions};
use teger::services::prompts::{EVIDENCE_BEGIN, EVIDENCE_END};
use teger::storage::EvidenceStore;
use teger::{AnalysisSession, AppError, CommandResponse, SessionState};
use teger_core::{Evidence, Platform, RiskTier, SeverityBand, ThreatLevel};
use teger_llm::{
    EngineError, EngineResult, ErrorKind, ReasoningEngine, ReasoningTransport, RetryPolicy,
};

const CEO_PAYLOAD: &str = r#"{
    "risk_score": 91,
    "threat_level": "Critical",
    "tactics": ["Authority Drift", "Artificial Urgency"],
    "dissonance_report": "Executive persona, informal panicked register.",
    "psychological_triggers": ["wire $5000", "immediately"],
    "mitigation_steps": "Verify via phone."
}"#;

// ============================================================================
// Scripted engine
// ============================================================================

/// Replays queued results and records every prompt pair it receives.
#[derive(Default)]
struct ScriptedEngine {
    script: Mutex<VecDeque<EngineResult<String>>>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedEngine {
    fn with(results: Vec<EngineResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(results.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last_user_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().unwrap().1.clone()
    }
}

#[async_trait]
impl ReasoningEngine for ScriptedEngine {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn generate(&self, system: &str, user: &str) -> EngineResult<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(EngineError::malformed("script exhausted")))
    }

    async fn health_check(&self) -> EngineResult<()> {
        Ok(())
    }
}

fn rate_limited() -> EngineError {
    EngineError::RateLimited {
        message: "Too Many Requests".to_string(),
    }
}

fn session(engine: Arc<ScriptedEngine>) -> AnalysisSession {
    AnalysisSession::new(ReasoningTransport::new(engine, RetryPolicy::default()))
}

fn ceo_evidence() -> Evidence {
    Evidence::new(
        "Please wire $5000 immediately, this is the CEO",
        "CEO",
        Platform::Email,
    )
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_ceo_wire_transfer_is_critical() {
    let engine = ScriptedEngine::with(vec![Ok(CEO_PAYLOAD.to_string())]);
    let session = session(engine.clone());

    let state = session.submit(ceo_evidence()).await;

    let verdict = state.verdict().expect("expected a verdict");
    assert_eq!(verdict.analysis.risk_score, 91);
    assert_eq!(verdict.analysis.threat_level, ThreatLevel::Critical);
    assert_eq!(verdict.classification.tier, RiskTier::Critical);
    assert_eq!(verdict.classification.band, SeverityBand::High);
    assert_eq!(
        verdict.analysis.tactics,
        vec!["Authority Drift".to_string(), "Artificial Urgency".to_string()]
    );
    assert_eq!(verdict.analysis.raw.as_deref(), Some(CEO_PAYLOAD));

    let prompt = engine.last_user_prompt();
    assert!(prompt.starts_with("PLATFORM: Email\nCLAIMED_SENDER: CEO\n"));
    assert!(prompt.contains(EVIDENCE_BEGIN));
    assert!(prompt.ends_with(EVIDENCE_END));
}

#[tokio::test]
async fn test_score_drives_tier_not_label() {
    // Label says Low, score says critical: the tier follows the score.
    let engine = ScriptedEngine::with(vec![Ok(
        r#"{"risk_score": 80, "threat_level": "low", "dissonance_report": "mismatch"}"#
            .to_string(),
    )]);
    let state = session(engine).submit(ceo_evidence()).await;

    let verdict = state.verdict().unwrap();
    assert_eq!(verdict.analysis.threat_level, ThreatLevel::Low);
    assert_eq!(verdict.classification.tier, RiskTier::Critical);
}

#[tokio::test]
async fn test_boundary_score_is_elevated() {
    let engine = ScriptedEngine::with(vec![Ok(
        r#"{"risk_score": 75, "threat_level": "High", "dissonance_report": "borderline"}"#
            .to_string(),
    )]);
    let state = session(engine).submit(ceo_evidence()).await;
    assert_eq!(state.verdict().unwrap().classification.tier, RiskTier::Elevated);
}

#[tokio::test]
async fn test_empty_evidence_never_reaches_engine() {
    let engine = ScriptedEngine::with(vec![Ok(CEO_PAYLOAD.to_string())]);
    let session = session(engine.clone());

    let state = session
        .submit(Evidence::new("", "CEO", Platform::Email))
        .await;
    assert_eq!(state, SessionState::Idle);
    assert_eq!(engine.calls(), 0);
}

// ============================================================================
// Retry and failure paths
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_rate_limits_are_absorbed() {
    let engine = ScriptedEngine::with(vec![
        Err(rate_limited()),
        Err(rate_limited()),
        Ok(CEO_PAYLOAD.to_string()),
    ]);
    let session = session(engine.clone());

    let started = tokio::time::Instant::now();
    let state = session.submit(ceo_evidence()).await;

    assert_eq!(state.verdict().unwrap().attempts, 3);
    assert_eq!(engine.calls(), 3);
    assert_eq!(started.elapsed().as_millis(), 3000);
}

#[tokio::test(start_paused = true)]
async fn test_persistent_rate_limit_fails_after_budget() {
    let engine = ScriptedEngine::with((0..6).map(|_| Err(rate_limited())).collect());
    let session = session(engine.clone());

    let state = session.submit(ceo_evidence()).await;

    assert_eq!(engine.calls(), 6);
    assert_eq!(
        state,
        SessionState::Failed {
            kind: ErrorKind::RateLimited,
            message: rate_limited().to_string(),
        }
    );
}

#[tokio::test]
async fn test_server_error_fails_without_retry() {
    let engine = ScriptedEngine::with(vec![
        Err(EngineError::Engine {
            status: 500,
            message: "Internal Server Error".to_string(),
        }),
        Ok(CEO_PAYLOAD.to_string()),
    ]);
    let session = session(engine.clone());

    let state = session.submit(ceo_evidence()).await;

    assert_eq!(engine.calls(), 1);
    let response: CommandResponse<SessionState> = state.clone().into();
    assert!(!response.success);
    assert_eq!(
        response.error.as_deref(),
        Some("Engine Error (500): Internal Server Error")
    );
    assert_eq!(
        render_state(&state, &ReportOptions::default()),
        "Error: Engine Error (500): Internal Server Error"
    );
}

#[tokio::test]
async fn test_non_json_reply_is_malformed() {
    let engine = ScriptedEngine::with(vec![Ok(
        "Here is my analysis: {\"risk_score\": 10}".to_string(),
    )]);
    let state = session(engine).submit(ceo_evidence()).await;
    assert!(matches!(
        state,
        SessionState::Failed {
            kind: ErrorKind::MalformedResponse,
            ..
        }
    ));
}

#[tokio::test]
async fn test_failure_then_success_replaces_state() {
    let engine = ScriptedEngine::with(vec![
        Err(EngineError::EmptyResponse {
            message: "no candidate text in response".to_string(),
        }),
        Ok(CEO_PAYLOAD.to_string()),
    ]);
    let session = session(engine);

    let first = session.submit(ceo_evidence()).await;
    assert!(matches!(
        first,
        SessionState::Failed {
            kind: ErrorKind::EmptyResponse,
            ..
        }
    ));

    let second = session.submit(ceo_evidence()).await;
    assert!(second.verdict().is_some());
    assert_eq!(session.state(), second);
}

// ============================================================================
// Hand-off store
// ============================================================================

#[tokio::test]
async fn test_pending_capture_scanned_once() {
    let dir = tempfile::tempdir().unwrap();
    let store = EvidenceStore::open(dir.path().join("capture.json"));
    store
        .save_pending_evidence(
            &Evidence::new("Reset your password within 10 minutes", "IT Desk", Platform::Gmail)
                .with_metadata("subject", "Account locked"),
        )
        .unwrap();

    let engine = ScriptedEngine::with(vec![Ok(
        r#"{"risk_score": 55, "threat_level": "Medium", "explanation": "urgency"}"#.to_string(),
    )]);
    let session = session(engine.clone());

    let state = scan_with_session(&session, &store, EvidenceSource::Pending)
        .await
        .unwrap();
    assert_eq!(state.verdict().unwrap().classification.tier, RiskTier::Elevated);
    assert!(engine
        .last_user_prompt()
        .contains("PLATFORM: Gmail\nCLAIMED_SENDER: IT Desk\nCONTEXT:\n- subject: Account locked\n"));

    let err = scan_with_session(&session, &store, EvidenceSource::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_direct_scan_rejects_empty_text() {
    let dir = tempfile::tempdir().unwrap();
    let store = EvidenceStore::open(dir.path().join("capture.json"));
    let engine = ScriptedEngine::with(vec![Ok(CEO_PAYLOAD.to_string())]);
    let session = session(engine.clone());

    let err = scan_with_session(
        &session,
        &store,
        EvidenceSource::Direct(Evidence::new(" \n ", "CEO", Platform::Email)),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(engine.calls(), 0);
    assert_eq!(session.state(), SessionState::Idle);
}
