//! Suggestion Generator — the narrow capability seam to the language-model server.
//!
//! Scoring never depends on anything in this module: every call here may fail or time
//! out, and callers surface that as `AssistantUnavailable` while the computed report
//! stays intact.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod fallback;
pub mod handlers;
pub mod ollama;
pub mod parse;
pub mod prompts;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("model server unreachable: {0}")]
    Unreachable(String),

    #[error("model server did not answer within {0}s")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model server error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected model server response: {0}")]
    Parse(String),

    #[error("model returned an empty response")]
    EmptyResponse,
}

/// Per-call sampling options.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// Model to request; the backend's configured model when `None`.
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationOptions {
    pub fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            model: None,
            temperature,
            max_tokens,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Reachability of the model server as last probed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantStatus {
    pub connected: bool,
    pub model: String,
    pub available_models: Vec<String>,
}

/// Given a prompt, return generated text or fail. One attempt per call.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, AssistantError>;

    /// Probes the server. Never fails; an unreachable server reports `connected: false`.
    async fn status(&self) -> AssistantStatus;
}
