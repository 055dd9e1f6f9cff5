//! Risk Classification
//!
//! Derives a display tier from the numeric dissonance score, independent of the
//! `threat_level` label the engine reports. The engine sometimes labels a
//! verdict inconsistently with its own score; the UI colors by score.
//!
//! Canonical scheme (exclusive lower bounds):
//!
//! | score    | tier     | band   |
//! |----------|----------|--------|
//! | 76..=100 | Critical | High   |
//! | 41..=75  | Elevated | Medium |
//! | 0..=40   | Nominal  | Low    |
//!
//! The extension popup once used a four-way 75/50/25 split; only the 75/40
//! dashboard scheme is implemented.

use serde::{Deserialize, Serialize};

/// Scores strictly above this are critical.
pub const CRITICAL_ABOVE: u8 = 75;
/// Scores strictly above this (and not critical) are elevated.
pub const ELEVATED_ABOVE: u8 = 40;

/// Score bucket used for threshold logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Nominal,
    Elevated,
    Critical,
}

/// Presentation severity class for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Low,
    Medium,
    High,
}

impl SeverityBand {
    /// Palette name used by the report surfaces.
    pub fn color(&self) -> &'static str {
        match self {
            SeverityBand::Low => "emerald",
            SeverityBand::Medium => "amber",
            SeverityBand::High => "red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskClassification {
    pub tier: RiskTier,
    pub band: SeverityBand,
}

/// Maps dissonance scores to tiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskClassifier;

impl RiskClassifier {
    /// Classify a score. Total over `u8`; anything above 100 is treated as 100.
    pub fn classify(score: u8) -> RiskClassification {
        let score = score.min(100);
        if score > CRITICAL_ABOVE {
            RiskClassification {
                tier: RiskTier::Critical,
                band: SeverityBand::High,
            }
        } else if score > ELEVATED_ABOVE {
            RiskClassification {
                tier: RiskTier::Elevated,
                band: SeverityBand::Medium,
            }
        } else {
            RiskClassification {
                tier: RiskTier::Nominal,
                band: SeverityBand::Low,
            }
        }
    }
}
