//! Application State
//!
//! Services shared by every CLI command: configuration, the hand-off store,
//! and the runtime API key.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use teger_llm::{GeminiEngine, ReasoningEngine, ReasoningTransport};

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::services::session::AnalysisSession;
use crate::storage::{ConfigService, EvidenceStore};
use crate::utils::error::AppResult;

/// Application state built once per CLI invocation
pub struct AppState {
    config: RwLock<ConfigService>,
    evidence_store: EvidenceStore,
    /// Never persisted
    api_key: Option<String>,
}

impl AppState {
    /// Open state from explicit or default locations
    pub fn open(
        config_path: Option<PathBuf>,
        store_path: Option<PathBuf>,
        api_key: Option<String>,
    ) -> AppResult<Self> {
        let config = match config_path {
            Some(path) => ConfigService::open(path)?,
            None => ConfigService::new()?,
        };
        let evidence_store = match store_path {
            Some(path) => EvidenceStore::open(path),
            None => EvidenceStore::new()?,
        };
        Ok(Self::with_services(config, evidence_store, api_key))
    }

    pub fn with_services(
        config: ConfigService,
        evidence_store: EvidenceStore,
        api_key: Option<String>,
    ) -> Self {
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        Self {
            config: RwLock::new(config),
            evidence_store,
            api_key,
        }
    }

    /// Get the current configuration
    pub async fn get_config(&self) -> AppConfig {
        self.config.read().await.get_config().clone()
    }

    /// Update and persist configuration
    pub async fn update_config(&self, update: SettingsUpdate) -> AppResult<AppConfig> {
        self.config.write().await.update_config(update)
    }

    /// Restore and persist defaults
    pub async fn reset_config(&self) -> AppResult<AppConfig> {
        let mut config = self.config.write().await;
        config.reset()?;
        Ok(config.get_config().clone())
    }

    pub fn evidence_store(&self) -> &EvidenceStore {
        &self.evidence_store
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Engine built from the current configuration
    pub async fn engine(&self) -> AppResult<Arc<dyn ReasoningEngine>> {
        let config = self.get_config().await;
        if self.api_key.is_none() {
            tracing::warn!("no API key configured; requests will likely be rejected");
        }
        let engine = GeminiEngine::new(config.engine_config(self.api_key.clone()))?;
        Ok(Arc::new(engine))
    }

    /// Fresh analysis session over the configured engine and retry policy
    pub async fn analysis_session(&self) -> AppResult<AnalysisSession> {
        let policy = self.get_config().await.retry_policy();
        let transport = ReasoningTransport::new(self.engine().await?, policy);
        Ok(AnalysisSession::new(transport))
    }
}
