//! Anthropic Claude backend implementation.
//!
//! Uses the messages endpoint.

use super::{api_key, endpoint};
use crate::config::LlmSettings;
use crate::error::LlmError;
use crate::prompt::Prompt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const PROVIDER: &str = "anthropic";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The messages API requires a limit.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic backend for Claude models.
pub struct AnthropicBackend {
    pub model: String,
    api_key: Option<String>,
    url: String,
    max_tokens: u32,
    temperature: Option<f32>,
    client: Client,
}

impl AnthropicBackend {
    pub fn new(settings: &LlmSettings, client: Client) -> Self {
        Self {
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
            url: endpoint(settings.base_url.as_deref(), DEFAULT_BASE_URL, "messages"),
            max_tokens: settings.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: settings.temperature,
            client,
        }
    }

    fn get_api_key(&self) -> Result<String, LlmError> {
        api_key(self.api_key.as_deref(), PROVIDER, API_KEY_ENV)
    }

    /// Generate text for a prompt.
    pub async fn generate(&self, prompt: &Prompt) -> Result<String, LlmError> {
        let api_key = self.get_api_key()?;

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: &prompt.system,
            messages: [UserMessage {
                role: "user",
                content: &prompt.user,
            }],
            temperature: self.temperature,
        };

        debug!(url = %self.url, model = %self.model, "Sending messages request");
        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|source| LlmError::Transport {
                provider: PROVIDER,
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body: Result<ErrorBody, _> = response.json().await;
            let message = body
                .map(|e| e.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                message,
            });
        }

        let reply: MessagesResponse = response.json().await.map_err(|source| LlmError::Decode {
            provider: PROVIDER,
            source,
        })?;

        // Long answers may arrive split across several text blocks.
        let text: String = reply
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        let text = text.trim();
        if text.is_empty() {
            return Err(LlmError::Empty { provider: PROVIDER });
        }
        Ok(text.to_string())
    }

    /// Only verifies an API key is available; no request is made.
    pub async fn health_check(&self) -> Result<(), LlmError> {
        self.get_api_key().map(|_| ())
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}
