//! Gemini Engine
//!
//! Implementation of the ReasoningEngine trait for the Gemini `generateContent`
//! REST API, using reqwest for transport.
//!
//! Wire shape:
//!   request  `{contents:[{parts:[{text}]}], systemInstruction:{parts:[{text}]},
//!             generationConfig:{responseMimeType:"application/json"}}`
//!   response `candidates[0].content.parts[0].text`
//!
//! The API key travels as the `key` query parameter.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::provider::{classify_http_status, ReasoningEngine};
use super::types::{EngineConfig, EngineError, EngineResult};
use crate::http_client::build_http_client;

/// Gemini reasoning engine.
pub struct GeminiEngine {
    config: EngineConfig,
    client: reqwest::Client,
    generate_url: Url,
    model_url: Url,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiEngine {
    /// Create a new Gemini engine with the given configuration
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let client = build_http_client(&config)?;
        let model_url = Self::model_url(&config)?;
        let mut generate_url = model_url.clone();
        generate_url.set_path(&format!("{}:generateContent", model_url.path()));
        Ok(Self {
            config,
            client,
            generate_url,
            model_url,
        })
    }

    /// `{endpoint}/{model}` with the key query parameter when one is configured.
    fn model_url(config: &EngineConfig) -> EngineResult<Url> {
        let raw = format!(
            "{}/{}",
            config.endpoint.trim_end_matches('/'),
            config.model.trim()
        );
        let mut url = Url::parse(&raw).map_err(|e| EngineError::Transport {
            message: format!("invalid engine endpoint {}: {}", config.endpoint, e),
        })?;
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    /// Build the request body for the API.
    fn build_request_body(system_instruction: &str, user_instruction: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [
                { "parts": [ { "text": user_instruction } ] }
            ],
            "systemInstruction": {
                "parts": [ { "text": system_instruction } ]
            },
            "generationConfig": {
                "responseMimeType": "application/json"
            }
        })
    }

    /// Pull the generated text out of a success body.
    fn extract_text(body: &str) -> EngineResult<String> {
        let response: GenerateContentResponse =
            serde_json::from_str(body).map_err(|e| EngineError::EmptyResponse {
                message: format!("unreadable response envelope: {}", e),
            })?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.trim().is_empty());

        text.ok_or_else(|| EngineError::EmptyResponse {
            message: "no candidate text in response".to_string(),
        })
    }

    fn transport_error(e: reqwest::Error) -> EngineError {
        // Strip the URL: it carries the key.
        EngineError::Transport {
            message: e.without_url().to_string(),
        }
    }

    fn status_error(status: reqwest::StatusCode) -> EngineError {
        classify_http_status(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown status"),
        )
    }
}

#[async_trait]
impl ReasoningEngine for GeminiEngine {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(
        &self,
        system_instruction: &str,
        user_instruction: &str,
    ) -> EngineResult<String> {
        let body = Self::build_request_body(system_instruction, user_instruction);
        tracing::debug!(
            model = %self.config.model,
            system_len = system_instruction.len(),
            user_len = user_instruction.len(),
            "gemini: sending generateContent request"
        );

        let response = self
            .client
            .post(self.generate_url.clone())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "gemini: non-success status");
            return Err(Self::status_error(status));
        }

        let body_text = response.text().await.map_err(Self::transport_error)?;
        Self::extract_text(&body_text)
    }

    async fn health_check(&self) -> EngineResult<()> {
        let response = self
            .client
            .get(self.model_url.clone())
            .send()
            .await
            .map_err(Self::transport_error)?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::status_error(status))
        }
    }
}
