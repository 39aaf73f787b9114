//! OpenAI backend implementation.
//!
//! Uses the chat completions endpoint.

use super::{api_key, endpoint};
use crate::config::LlmSettings;
use crate::error::LlmError;
use crate::prompt::Prompt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const PROVIDER: &str = "openai";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI backend for GPT models.
pub struct OpenAIBackend {
    pub model: String,
    api_key: Option<String>,
    url: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    client: Client,
}

impl OpenAIBackend {
    pub fn new(settings: &LlmSettings, client: Client) -> Self {
        Self {
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
            url: endpoint(
                settings.base_url.as_deref(),
                DEFAULT_BASE_URL,
                "chat/completions",
            ),
            max_tokens: settings.max_tokens,
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

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_completion_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!(url = %self.url, model = %self.model, "Sending chat completion request");
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
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

        let completion: ChatResponse = response.json().await.map_err(|source| LlmError::Decode {
            provider: PROVIDER,
            source,
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::Empty { provider: PROVIDER })
    }

    /// Only verifies an API key is available; no request is made.
    pub async fn health_check(&self) -> Result<(), LlmError> {
        self.get_api_key().map(|_| ())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}
