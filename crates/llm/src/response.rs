//! Response Validation
//!
//! Turns the engine's raw text into an [`AnalysisResult`]. The engine is told to
//! emit bare JSON, so anything that does not parse is a contract violation and
//! is reported as `MalformedResponse`; there is no text scraping fallback.
//!
//! Accepted shape (superset of the dashboard and popup schemas):
//!
//! - `risk_score` number, required; clamped into 0..=100, fractions rounded
//! - `threat_level` one of Low/Medium/High/Critical (any case), required
//! - `dissonance_report` or `explanation` non-empty string, required
//! - `tactics` string array, optional
//! - `psychological_triggers` or `triggers` string array, optional
//! - `mitigation_steps` string, optional
//!
//! Unknown fields are ignored.

use serde::Deserialize;
use teger_core::{AnalysisResult, ThreatLevel};

use super::types::{EngineError, EngineResult};

#[derive(Debug, Deserialize)]
struct RawAssessment {
    risk_score: serde_json::Number,
    threat_level: String,
    #[serde(default)]
    dissonance_report: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    tactics: Option<Vec<String>>,
    #[serde(default)]
    psychological_triggers: Option<Vec<String>>,
    #[serde(default)]
    triggers: Option<Vec<String>>,
    #[serde(default)]
    mitigation_steps: Option<String>,
}

/// Validator for raw engine payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseValidator;

impl ResponseValidator {
    /// Parse and validate one engine payload.
    pub fn parse(raw_text: &str) -> EngineResult<AnalysisResult> {
        let raw: RawAssessment = serde_json::from_str(raw_text.trim())
            .map_err(|e| EngineError::malformed(format!("invalid assessment JSON: {}", e)))?;

        let risk_score = clamp_score(&raw.risk_score)?;

        let threat_level: ThreatLevel = raw
            .threat_level
            .parse()
            .map_err(|e: teger_core::CoreError| EngineError::malformed(e.to_string()))?;

        let dissonance_report = raw
            .dissonance_report
            .filter(|s| !s.trim().is_empty())
            .or_else(|| raw.explanation.filter(|s| !s.trim().is_empty()))
            .ok_or_else(|| {
                EngineError::malformed("missing narrative (dissonance_report or explanation)")
            })?;

        let mitigation_steps = raw.mitigation_steps.filter(|s| !s.trim().is_empty());

        Ok(AnalysisResult {
            risk_score,
            threat_level,
            tactics: raw.tactics.unwrap_or_default(),
            dissonance_report,
            psychological_triggers: raw
                .psychological_triggers
                .or(raw.triggers)
                .unwrap_or_default(),
            mitigation_steps,
            raw: Some(raw_text.to_string()),
        })
    }
}

fn clamp_score(number: &serde_json::Number) -> EngineResult<u8> {
    let value = if let Some(i) = number.as_i64() {
        i
    } else if let Some(f) = number.as_f64() {
        // `as` saturates, so huge u64 values land on i64::MAX.
        f.round() as i64
    } else {
        return Err(EngineError::malformed(format!(
            "risk_score is not a usable number: {}",
            number
        )));
    };
    let clamped = value.clamp(0, 100);
    if clamped != value {
        tracing::debug!(reported = value, clamped, "risk_score outside 0..=100, clamped");
    }
    Ok(clamped as u8)
}
