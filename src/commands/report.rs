//! Report Rendering
//!
//! Plain-text rendering of scan outcomes. The full report mirrors the
//! dashboard view, the compact one mirrors the extension popup.

use teger_core::{RiskTier, SeverityBand};

use crate::services::session::{SessionState, Verdict};

/// Output density for text reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    #[default]
    Full,
    Compact,
}

/// How a scan outcome is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportOptions {
    pub style: ReportStyle,
    /// Emit ANSI colors; only set when writing to a terminal
    pub color: bool,
    /// Append the engine's raw payload
    pub show_raw: bool,
}

/// Render any session state as text.
pub fn render_state(state: &SessionState, options: &ReportOptions) -> String {
    match state {
        SessionState::Idle => "No evidence to analyze.".to_string(),
        SessionState::Pending => "Analysis in progress...".to_string(),
        SessionState::Succeeded(verdict) => {
            let mut report = match options.style {
                ReportStyle::Full => render_full(verdict, options.color),
                ReportStyle::Compact => render_compact(verdict, options.color),
            };
            if options.show_raw {
                report.push_str("\n\n");
                report.push_str(&raw_panel(verdict));
            }
            report
        }
        // One line, nothing else: no partial report alongside an error.
        SessionState::Failed { message, .. } => format!("Error: {}", message),
    }
}

fn tier_label(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Critical => "CRITICAL",
        RiskTier::Elevated => "ELEVATED",
        RiskTier::Nominal => "NOMINAL",
    }
}

fn ansi_color(band: SeverityBand) -> &'static str {
    match band {
        SeverityBand::High => "\x1b[31m",
        SeverityBand::Medium => "\x1b[33m",
        SeverityBand::Low => "\x1b[32m",
    }
}

const ANSI_RESET: &str = "\x1b[0m";

fn headline(verdict: &Verdict, color: bool) -> String {
    let classification = verdict.classification;
    let (open, close) = if color {
        (ansi_color(classification.band), ANSI_RESET)
    } else {
        ("", "")
    };
    format!(
        "{}RISK {}/100 [{}]{}  threat level: {}  ({})",
        open,
        verdict.analysis.risk_score,
        tier_label(classification.tier),
        close,
        verdict.analysis.threat_level,
        classification.band.color(),
    )
}

fn tags(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items
        .iter()
        .map(|item| format!("[{}]", item))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_full(verdict: &Verdict, color: bool) -> String {
    let view = verdict.analysis.dashboard_view();
    let mut lines = vec![
        headline(verdict, color),
        format!("Tactics:   {}", tags(&view.tactics, "none detected")),
        format!(
            "Triggers:  {}",
            tags(&view.psychological_triggers, "none flagged")
        ),
        String::new(),
        "Dissonance report:".to_string(),
        format!("  {}", view.dissonance_report),
    ];
    if !view.mitigation_steps.is_empty() {
        lines.push(String::new());
        lines.push("Mitigation:".to_string());
        lines.push(format!("  {}", view.mitigation_steps));
    }
    if verdict.attempts > 1 {
        lines.push(String::new());
        lines.push(format!("(answered after {} attempts)", verdict.attempts));
    }
    lines.join("\n")
}

fn render_compact(verdict: &Verdict, color: bool) -> String {
    let view = verdict.analysis.popup_view();
    format!(
        "{}\n{}\n{}",
        headline(verdict, color),
        tags(&view.tactics, "no tactics detected"),
        view.explanation
    )
}

/// The engine payload as received, pretty-printed when it is JSON.
fn raw_panel(verdict: &Verdict) -> String {
    let body = match verdict.analysis.raw.as_deref() {
        Some(raw) => serde_json::from_str::<serde_json::Value>(raw)
            .and_then(|value| serde_json::to_string_pretty(&value))
            .unwrap_or_else(|_| raw.to_string()),
        None => "(not retained)".to_string(),
    };
    format!("Raw intelligence:\n{}", body)
}
