//! Ollama backend implementation.
//!
//! Ollama is a local LLM server; no API key is needed.

use super::endpoint;
use crate::config::LlmSettings;
use crate::error::LlmError;
use crate::prompt::Prompt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const PROVIDER: &str = "ollama";
const DEFAULT_HOST: &str = "http://localhost:11434";

/// Ollama backend for local inference.
pub struct OllamaBackend {
    pub model: String,
    generate_url: String,
    tags_url: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    client: Client,
}

impl OllamaBackend {
    pub fn new(settings: &LlmSettings, client: Client) -> Self {
        let host = settings.base_url.as_deref();
        Self {
            model: settings.model.clone(),
            generate_url: endpoint(host, DEFAULT_HOST, "api/generate"),
            tags_url: endpoint(host, DEFAULT_HOST, "api/tags"),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            client,
        }
    }

    /// Generate text for a prompt.
    pub async fn generate(&self, prompt: &Prompt) -> Result<String, LlmError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: &prompt.user,
            system: &prompt.system,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };

        debug!(url = %self.generate_url, model = %self.model, "Sending generate request");
        let response = self
            .client
            .post(&self.generate_url)
            .json(&request)
            .send()
            .await
            .map_err(|source| LlmError::Transport {
                provider: PROVIDER,
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                message,
            });
        }

        let reply: GenerateResponse = response.json().await.map_err(|source| LlmError::Decode {
            provider: PROVIDER,
            source,
        })?;

        let text = reply.response.trim();
        if text.is_empty() {
            return Err(LlmError::Empty { provider: PROVIDER });
        }
        Ok(text.to_string())
    }

    /// Check that the Ollama server answers.
    pub async fn health_check(&self) -> Result<(), LlmError> {
        let response = self
            .client
            .get(&self.tags_url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|source| LlmError::Transport {
                provider: PROVIDER,
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(LlmError::Api {
                provider: PROVIDER,
                status: response.status().as_u16(),
                message: "health check failed".to_string(),
            })
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}
