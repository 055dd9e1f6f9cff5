//! Captured-Evidence Hand-off Store
//!
//! A small JSON key-value file that lets a capture surface (browser extension,
//! `teger capture`) leave evidence for a later scan. The scan side reads the
//! pending record once and removes it.
//!
//! No durability guarantees beyond a whole-file rewrite.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teger_core::Evidence;

use crate::utils::error::AppResult;
use crate::utils::paths::{ensure_parent_dir, evidence_store_path};

/// Key under which the pending capture is stored.
pub const PENDING_SCAN_KEY: &str = "pendingScan";

/// Evidence plus capture time, as persisted.
///
/// Capture layers that only write `{text, sender, platform}` leave
/// `captured_at` unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingCapture {
    #[serde(flatten)]
    pub evidence: Evidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
}

/// File-backed key-value store for hand-off records.
#[derive(Debug, Clone)]
pub struct EvidenceStore {
    path: PathBuf,
}

impl EvidenceStore {
    /// Store at the default location (~/.teger/capture.json)
    pub fn new() -> AppResult<Self> {
        Ok(Self::open(evidence_store_path()?))
    }

    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> AppResult<BTreeMap<String, serde_json::Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, serde_json::Value>) -> AppResult<()> {
        ensure_parent_dir(&self.path)?;
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Record evidence for a later scan, replacing any earlier capture.
    pub fn save_pending_evidence(&self, evidence: &Evidence) -> AppResult<PendingCapture> {
        let capture = PendingCapture {
            evidence: evidence.clone(),
            captured_at: Some(Utc::now()),
        };
        let mut entries = self.read_all()?;
        entries.insert(PENDING_SCAN_KEY.to_string(), serde_json::to_value(&capture)?);
        self.write_all(&entries)?;
        tracing::debug!(
            platform = %evidence.platform,
            text_len = evidence.text.len(),
            "stored pending capture"
        );
        Ok(capture)
    }

    /// Look at the pending capture without consuming it.
    pub fn peek_pending(&self) -> AppResult<Option<PendingCapture>> {
        let entries = self.read_all()?;
        match entries.get(PENDING_SCAN_KEY) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Take the pending evidence, removing it from the store.
    ///
    /// A record that fails to parse is left in place.
    pub fn load_pending_evidence(&self) -> AppResult<Option<Evidence>> {
        let mut entries = self.read_all()?;
        let Some(value) = entries.get(PENDING_SCAN_KEY) else {
            return Ok(None);
        };
        let capture: PendingCapture = serde_json::from_value(value.clone())?;
        entries.remove(PENDING_SCAN_KEY);
        self.write_all(&entries)?;
        Ok(Some(capture.evidence))
    }
}
