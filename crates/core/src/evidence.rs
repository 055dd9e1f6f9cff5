//! Evidence Types
//!
//! The captured communication that a scan is run against. Evidence is built
//! by a capture layer (manual form, page scrape, or the persisted hand-off
//! store) and handed to the analysis session by value.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Sender label used when the capture layer could not identify one.
pub const UNKNOWN_SENDER: &str = "Unknown";

/// Communication platform the evidence was captured from.
///
/// Serialized as its display label ("Email", "SMS/WhatsApp", ...). Labels that
/// do not match a known platform are preserved verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    #[default]
    Email,
    Slack,
    Teams,
    SmsWhatsApp,
    /// Detected by the browser extension on a webmail host
    Gmail,
    /// Any other source reported by a capture layer
    Other(String),
}

impl Platform {
    /// Parse a platform label, case-insensitively.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "email" | "e-mail" => Platform::Email,
            "slack" => Platform::Slack,
            "teams" | "microsoft teams" => Platform::Teams,
            "sms/whatsapp" | "sms" | "whatsapp" => Platform::SmsWhatsApp,
            "gmail" => Platform::Gmail,
            _ => Platform::Other(label.trim().to_string()),
        }
    }

    /// Display label used in prompts and reports.
    pub fn label(&self) -> &str {
        match self {
            Platform::Email => "Email",
            Platform::Slack => "Slack",
            Platform::Teams => "Teams",
            Platform::SmsWhatsApp => "SMS/WhatsApp",
            Platform::Gmail => "Gmail",
            Platform::Other(label) => label,
        }
    }
}

impl From<String> for Platform {
    fn from(label: String) -> Self {
        Platform::from_label(&label)
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> String {
        platform.label().to_string()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A captured message submitted for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Message body
    pub text: String,
    /// Claimed sender identity; may be empty
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub platform: Platform,
    /// Optional free-form context from the capture layer (subject line, channel, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Evidence {
    pub fn new(text: impl Into<String>, sender: impl Into<String>, platform: Platform) -> Self {
        Self {
            text: text.into(),
            sender: sender.into(),
            platform,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether the evidence carries any message text worth analysing.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Sender label, falling back to [`UNKNOWN_SENDER`] when empty.
    pub fn sender_or_unknown(&self) -> &str {
        let sender = self.sender.trim();
        if sender.is_empty() {
            UNKNOWN_SENDER
        } else {
            sender
        }
    }
}
