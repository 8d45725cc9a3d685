//! Analysis Gateway — the single point of entry for generative calls.
//!
//! ARCHITECTURAL RULE: no other module may call the model service
//! directly. Every degradation path (short prompt, failed probe, failed
//! generation) lands on the deterministic fallback synthesizer, so
//! `analyze` always returns usable text and never fails.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::fallback::fallback_analysis;
use crate::analysis::truncate_chars;

/// The model expected on the generation host.
/// Intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "llama3:8b";
/// Capability marker looked for in the probe response.
const MODEL_FAMILY: &str = "llama3";

/// Prompts below this length carry too little signal to justify the
/// network round-trip; they go straight to fallback.
const MIN_PROMPT_CHARS: usize = 200;
/// Prompts are truncated to this length before sending.
const MAX_PROMPT_CHARS: usize = 500;
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
const GENERATE_TIMEOUT: Duration = Duration::from_secs(5);
const RETRY_BACKOFF: Duration = Duration::from_millis(500);
const MAX_RETRIES: u32 = 1;

/// Which analysis a prompt belongs to. Labels log events only — fallback
/// dispatch keys on the prompt text itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Keywords,
    Bullets,
}

impl TaskKind {
    fn as_str(self) -> &'static str {
        match self {
            TaskKind::Keywords => "keyword",
            TaskKind::Bullets => "bullet",
        }
    }
}

#[derive(Debug, Error)]
enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

/// Conservative generation parameters: low randomness, bounded output,
/// short context window.
#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
    num_ctx: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            temperature: 0.3,
            top_p: 0.8,
            num_predict: 64,
            num_ctx: 256,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    #[serde(default)]
    name: String,
}

/// Seam between handlers and the generative service. Carried in
/// `AppState` as `Arc<dyn AnalysisBackend>` so tests can inject scripted
/// backends.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Always returns usable raw text for the given task — model output
    /// when the service path succeeds, fallback synthesis otherwise.
    async fn analyze(&self, prompt: &str, kind: TaskKind) -> String;
}

/// HTTP client for an Ollama-style generation service.
#[derive(Clone)]
pub struct AnalysisGateway {
    client: Client,
    base_url: String,
}

impl AnalysisGateway {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Lightweight availability check: the service answers within the
    /// probe window and lists the expected model family.
    async fn probe(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.client.get(&url).timeout(PROBE_TIMEOUT).send().await;
        match response {
            Ok(r) if r.status().is_success() => match r.json::<TagsResponse>().await {
                Ok(tags) => tags.models.iter().any(|m| m.name.contains(MODEL_FAMILY)),
                Err(e) => {
                    warn!("Model service probe returned an invalid body: {e}");
                    false
                }
            },
            Ok(r) => {
                warn!("Model service probe returned status {}", r.status());
                false
            }
            Err(e) => {
                warn!("Model service probe failed: {e}");
                false
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: MODEL,
            prompt,
            stream: false,
            options: GenerateOptions::default(),
        };

        let response = self
            .client
            .post(&url)
            .timeout(GENERATE_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.response.trim().to_string())
    }
}

#[async_trait]
impl AnalysisBackend for AnalysisGateway {
    async fn analyze(&self, prompt: &str, kind: TaskKind) -> String {
        if prompt.chars().count() < MIN_PROMPT_CHARS {
            info!("Short {} prompt, using fallback analysis", kind.as_str());
            return fallback_analysis(prompt);
        }

        if !self.probe().await {
            warn!("Model service not available, using {} fallback", kind.as_str());
            return fallback_analysis(prompt);
        }

        let prompt = bound_prompt(prompt);
        debug!(
            "Sending {} generation request (prompt length: {})",
            kind.as_str(),
            prompt.chars().count()
        );

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                tokio::time::sleep(RETRY_BACKOFF).await;
            }
            match self.generate(&prompt).await {
                Ok(text) => {
                    debug!("Generation response length: {}", text.chars().count());
                    return text;
                }
                Err(e) => warn!(
                    "Generation request failed (attempt {}): {e}",
                    attempt + 1
                ),
            }
        }

        warn!("Model service failed, using {} fallback", kind.as_str());
        fallback_analysis(&prompt)
    }
}

/// Truncates over-length prompts, marking the cut.
fn bound_prompt(prompt: &str) -> String {
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        format!("{}...", truncate_chars(prompt, MAX_PROMPT_CHARS))
    } else {
        prompt.to_string()
    }
}
