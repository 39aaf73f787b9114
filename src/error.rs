//! Error types for cvtailor.
//!
//! Configuration and template errors are fatal at startup; LLM and output
//! errors abort a single generation run and are shown in the status line.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Configuration errors
    #[error("Could not determine the program directory: {0}")]
    ProgramDir(#[source] std::io::Error),

    #[error("Failed to read settings file {}: {source}", .path.display())]
    ReadSettings {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write default settings file {}: {source}", .path.display())]
    WriteSettings {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed settings file {}: {source}", .path.display())]
    ParseSettings {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid setting `{key}`: {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    // Template errors
    #[error("Failed to read template {}: {source}", .path.display())]
    ReadTemplate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create template {}: {source}", .path.display())]
    WriteTemplate {
        path: PathBuf,
        source: std::io::Error,
    },

    // Generation errors
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Failed to write {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Failures talking to an LLM provider.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error(
        "{provider} API key not found. Set the {env_var} environment variable \
         or add api_key to settings.toml."
    )]
    MissingApiKey {
        provider: &'static str,
        env_var: &'static str,
    },

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to connect to {provider}: {source}")]
    Transport {
        provider: &'static str,
        source: reqwest::Error,
    },

    #[error("{provider} request failed with status {status}: {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Failed to parse {provider} response: {source}")]
    Decode {
        provider: &'static str,
        source: reqwest::Error,
    },

    #[error("Empty response from {provider}")]
    Empty { provider: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn llm_error_passes_through_unchanged() {
        let err: Error = LlmError::Api {
            provider: "openai",
            status: 401,
            message: "Incorrect API key provided".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "openai request failed with status 401: Incorrect API key provided"
        );
    }

    #[test]
    fn invalid_setting_names_the_key() {
        let err = Error::InvalidSetting {
            key: "llm.model",
            reason: "must not be empty".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid setting `llm.model`: must not be empty");
    }
}
