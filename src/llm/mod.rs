//! LLM backend implementations.
//!
//! Every provider sits behind the [`TextGenerator`] trait so workflows can be
//! driven by a real backend or by a stub in tests.

pub mod anthropic;
pub mod ollama;
pub mod openai;

use crate::config::{LlmSettings, Provider};
use crate::error::LlmError;
use crate::prompt::Prompt;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Something that turns a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one request and return the generated text. No retries.
    async fn generate(&self, prompt: &Prompt) -> Result<String, LlmError>;

    /// Short description for logs and the status line.
    fn describe(&self) -> String;
}

/// Enum-based backend for LLM providers.
pub enum Backend {
    OpenAI(openai::OpenAIBackend),
    Anthropic(anthropic::AnthropicBackend),
    Ollama(ollama::OllamaBackend),
}

impl Backend {
    /// Get the backend name.
    pub fn name(&self) -> &'static str {
        match self {
            Backend::OpenAI(_) => openai::PROVIDER,
            Backend::Anthropic(_) => anthropic::PROVIDER,
            Backend::Ollama(_) => ollama::PROVIDER,
        }
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        match self {
            Backend::OpenAI(b) => &b.model,
            Backend::Anthropic(b) => &b.model,
            Backend::Ollama(b) => &b.model,
        }
    }

    /// Check that the backend is usable before the first request.
    pub async fn health_check(&self) -> Result<(), LlmError> {
        match self {
            Backend::OpenAI(b) => b.health_check().await,
            Backend::Anthropic(b) => b.health_check().await,
            Backend::Ollama(b) => b.health_check().await,
        }
    }
}

#[async_trait]
impl TextGenerator for Backend {
    async fn generate(&self, prompt: &Prompt) -> Result<String, LlmError> {
        match self {
            Backend::OpenAI(b) => b.generate(prompt).await,
            Backend::Anthropic(b) => b.generate(prompt).await,
            Backend::Ollama(b) => b.generate(prompt).await,
        }
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.name(), self.model())
    }
}

/// Create a backend from the settings.
pub fn create_backend(settings: &LlmSettings) -> Result<Backend, LlmError> {
    let client = http_client(settings.timeout_secs)?;
    let backend = match settings.provider {
        Provider::OpenAI => Backend::OpenAI(openai::OpenAIBackend::new(settings, client)),
        Provider::Anthropic => {
            Backend::Anthropic(anthropic::AnthropicBackend::new(settings, client))
        }
        Provider::Ollama => Backend::Ollama(ollama::OllamaBackend::new(settings, client)),
    };
    Ok(backend)
}

fn http_client(timeout_secs: u64) -> Result<Client, LlmError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(LlmError::Client)
}

/// Pick the configured key, falling back to the provider's environment variable.
fn api_key(
    configured: Option<&str>,
    provider: &'static str,
    env_var: &'static str,
) -> Result<String, LlmError> {
    configured
        .map(str::to_string)
        .filter(|key| !key.trim().is_empty())
        .or_else(|| std::env::var(env_var).ok())
        .filter(|key| !key.trim().is_empty())
        .ok_or(LlmError::MissingApiKey { provider, env_var })
}

/// Trim the configured base URL so paths can be appended.
fn endpoint(base_url: Option<&str>, default: &str, path: &str) -> String {
    let base = base_url.unwrap_or(default).trim_end_matches('/');
    format!("{}/{}", base, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::llm_settings as settings;

    #[test]
    fn test_create_backend_per_provider() {
        for (provider, name) in [
            (Provider::OpenAI, "openai"),
            (Provider::Anthropic, "anthropic"),
            (Provider::Ollama, "ollama"),
        ] {
            let backend = create_backend(&settings(provider, "http://localhost:1")).unwrap();
            assert_eq!(backend.name(), name);
            assert_eq!(backend.model(), "test-model");
            assert_eq!(backend.describe(), format!("{} (test-model)", name));
        }
    }

    #[test]
    fn test_endpoint_joins_paths() {
        assert_eq!(
            endpoint(None, "https://api.openai.com/v1", "chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            endpoint(Some("http://proxy:8080/v1/"), "unused", "messages"),
            "http://proxy:8080/v1/messages"
        );
    }

    #[test]
    fn test_configured_key_wins() {
        let key = api_key(Some("from-config"), "openai", "CVTAILOR_TEST_UNSET_KEY").unwrap();
        assert_eq!(key, "from-config");
    }

    #[test]
    fn test_blank_key_is_missing() {
        let err = api_key(Some("  "), "openai", "CVTAILOR_TEST_UNSET_KEY").unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey { provider: "openai", .. }));
    }
}
