//! Analysis Record
//!
//! The normalized verdict returned by the reasoning engine, plus the two
//! surface projections (dashboard report and extension popup) that consume it.
//!
//! The dashboard and popup historically asked the engine for different JSON
//! shapes. Both are folded into one superset record here; each surface gets a
//! small adapter instead of its own validator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Severity label reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::Low => "Low",
            ThreatLevel::Medium => "Medium",
            ThreatLevel::High => "High",
            ThreatLevel::Critical => "Critical",
        }
    }
}

impl FromStr for ThreatLevel {
    type Err = CoreError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(ThreatLevel::Low),
            "medium" => Ok(ThreatLevel::Medium),
            "high" => Ok(ThreatLevel::High),
            "critical" => Ok(ThreatLevel::Critical),
            other => Err(CoreError::parse(format!("unknown threat level: {}", other))),
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated assessment of one piece of evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Dissonance score, always within 0..=100
    pub risk_score: u8,
    pub threat_level: ThreatLevel,
    /// Detected social engineering patterns, in engine order
    #[serde(default)]
    pub tactics: Vec<String>,
    /// Human-readable narrative (the popup calls this `explanation`)
    pub dissonance_report: String,
    /// Specific words or phrases flagged by the engine
    #[serde(default)]
    pub psychological_triggers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigation_steps: Option<String>,
    /// Engine payload exactly as received
    #[serde(skip)]
    pub raw: Option<String>,
}

impl AnalysisResult {
    /// The narrative text, whichever field name the engine used.
    pub fn narrative(&self) -> &str {
        &self.dissonance_report
    }

    /// Projection consumed by the full dashboard report.
    pub fn dashboard_view(&self) -> DashboardView {
        DashboardView {
            risk_score: self.risk_score,
            threat_level: self.threat_level,
            tactics: self.tactics.clone(),
            dissonance_report: self.dissonance_report.clone(),
            psychological_triggers: self.psychological_triggers.clone(),
            mitigation_steps: self.mitigation_steps.clone().unwrap_or_default(),
        }
    }

    /// Projection consumed by the compact extension popup.
    pub fn popup_view(&self) -> PopupView {
        PopupView {
            risk_score: self.risk_score,
            threat_level: self.threat_level,
            explanation: self.dissonance_report.clone(),
            tactics: self.tactics.clone(),
        }
    }
}

/// Dashboard report shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub risk_score: u8,
    pub threat_level: ThreatLevel,
    pub tactics: Vec<String>,
    pub dissonance_report: String,
    pub psychological_triggers: Vec<String>,
    pub mitigation_steps: String,
}

/// Extension popup shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupView {
    pub risk_score: u8,
    pub threat_level: ThreatLevel,
    pub explanation: String,
    pub tactics: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            risk_score: 91,
            threat_level: ThreatLevel::Critical,
            tactics: vec!["Authority Drift".to_string(), "Artificial Urgency".to_string()],
            dissonance_report: "CEO persona with informal urgency.".to_string(),
            psychological_triggers: vec!["wire $5000".to_string()],
            mitigation_steps: Some("Verify via phone.".to_string()),
            raw: Some("{}".to_string()),
        }
    }

    #[test]
    fn test_threat_level_parsing() {
        assert_eq!("Critical".parse::<ThreatLevel>().unwrap(), ThreatLevel::Critical);
        assert_eq!(" medium ".parse::<ThreatLevel>().unwrap(), ThreatLevel::Medium);
        assert!("Severe".parse::<ThreatLevel>().is_err());
    }

    #[test]
    fn test_threat_level_ordering() {
        assert!(ThreatLevel::Critical > ThreatLevel::High);
        assert!(ThreatLevel::Medium > ThreatLevel::Low);
    }

    #[test]
    fn test_raw_payload_not_serialized() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("\"raw\""));
        assert!(json.contains("\"threat_level\":\"Critical\""));
    }

    #[test]
    fn test_popup_view_uses_explanation() {
        let view = sample().popup_view();
        assert_eq!(view.explanation, "CEO persona with informal urgency.");
        assert_eq!(view.tactics.len(), 2);

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("dissonance_report").is_none());
    }

    #[test]
    fn test_dashboard_view_flattens_missing_mitigation() {
        let mut result = sample();
        result.mitigation_steps = None;
        let view = result.dashboard_view();
        assert_eq!(view.mitigation_steps, "");
        assert_eq!(view.psychological_triggers, vec!["wire $5000".to_string()]);
    }
}
