use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{Assistant, AssistantError, AssistantStatus, GenerationOptions};

const STATUS_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: SamplingOptions,
}

#[derive(Debug, Serialize)]
struct SamplingOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// `Assistant` backed by an Ollama server (`/api/generate`, `/api/tags`).
#[derive(Clone)]
pub struct OllamaAssistant {
    client: Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

impl OllamaAssistant {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, AssistantError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn classify(&self, e: reqwest::Error) -> AssistantError {
        if e.is_timeout() {
            AssistantError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            AssistantError::Unreachable(format!("cannot connect to {}", self.base_url))
        } else {
            AssistantError::Http(e)
        }
    }
}

#[async_trait]
impl Assistant for OllamaAssistant {
    async fn complete(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, AssistantError> {
        let model = options.model.as_deref().unwrap_or(&self.model);
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: SamplingOptions {
                temperature: options.temperature,
                num_predict: options.max_tokens,
            },
        };

        debug!(model, prompt_len = prompt.len(), "Requesting generation");
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Model server returned {status}: {body}");
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let generated: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| AssistantError::Parse(e.to_string()))?;

        let text = generated.response.trim();
        if text.is_empty() {
            return Err(AssistantError::EmptyResponse);
        }
        info!(model, chars = text.len(), "Generation succeeded");
        Ok(text.to_string())
    }

    async fn status(&self) -> AssistantStatus {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(STATUS_TIMEOUT_SECS))
            .send()
            .await;

        let available_models = match response {
            Ok(resp) if resp.status().is_success() => match resp.json::<TagsResponse>().await {
                Ok(tags) => Some(tags.models.into_iter().map(|m| m.name).collect()),
                Err(e) => {
                    warn!("Unreadable /api/tags response: {e}");
                    None
                }
            },
            Ok(resp) => {
                warn!("Model server status check failed: {}", resp.status());
                None
            }
            Err(e) => {
                warn!("Model server status check error: {e}");
                None
            }
        };

        AssistantStatus {
            connected: available_models.is_some(),
            model: self.model.clone(),
            available_models: available_models.unwrap_or_default(),
        }
    }
}
