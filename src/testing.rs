//! Shared fixtures for unit tests.

use crate::config::{LlmSettings, Provider};
use crate::document::DocumentKind;
use crate::error::LlmError;
use crate::job::JobData;
use crate::llm::TextGenerator;
use crate::prompt::{CoverLetterPromptBuilder, Prompt, ResumePromptBuilder};
use crate::workflow::{DocumentWorkflow, Pipeline};
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn sample_job() -> JobData {
    JobData::new(
        "Acme",
        "Rust Engineer",
        "Berlin",
        "Build reliable services in Rust.",
    )
    .unwrap()
}

pub fn llm_settings(provider: Provider, base_url: &str) -> LlmSettings {
    LlmSettings {
        model: "test-model".to_string(),
        provider,
        api_key: Some("test-key".to_string()),
        base_url: Some(base_url.to_string()),
        temperature: None,
        max_tokens: Some(256),
        timeout_secs: 5,
    }
}

/// Pipeline writing `resume.md` and `cover_letter.md` into `dir`.
pub fn pipeline_in(dir: &Path, generator: Arc<dyn TextGenerator>) -> Pipeline {
    Pipeline::new(
        DocumentWorkflow::new(
            Box::new(ResumePromptBuilder::new("# Base resume")),
            generator.clone(),
            dir.join("resume.md"),
        ),
        DocumentWorkflow::new(
            Box::new(CoverLetterPromptBuilder::new("Dear {{company}},")),
            generator,
            dir.join("cover_letter.md"),
        ),
    )
}

enum Reply {
    Text(String),
    Fail { status: u16, message: String },
    Panic,
}

/// Text generator with a canned reply that records each call.
pub struct StubGenerator {
    reply: Reply,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<DocumentKind>>,
}

impl StubGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Reply::Text(text.to_string()),
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            reply: Reply::Fail {
                status,
                message: message.to_string(),
            },
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Panics inside `generate`, taking the calling task down with it.
    pub fn panicking() -> Self {
        Self {
            reply: Reply::Panic,
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Each call waits for a `notify_one` on `gate` before replying.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<DocumentKind> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(prompt.kind);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail { status, message } => Err(LlmError::Api {
                provider: "stub",
                status: *status,
                message: message.clone(),
            }),
            Reply::Panic => panic!("stub generator crashed"),
        }
    }

    fn describe(&self) -> String {
        "stub".to_string()
    }
}
