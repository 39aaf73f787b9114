//! cvtailor - tailors a resume and cover letter to a job posting.
//!
//! Collects the posting through a terminal form, asks an LLM to adapt the
//! user's template documents and writes the results next to the program.

mod config;
mod document;
mod error;
mod files;
mod job;
mod llm;
mod prompt;
#[cfg(test)]
mod testing;
mod ui;
mod workflow;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Settings, SettingsOrigin};
use document::DocumentKind;
use files::FileManager;
use llm::TextGenerator;
use prompt::{CoverLetterPromptBuilder, ResumePromptBuilder};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui::app::Tone;
use workflow::{DocumentWorkflow, Pipeline};

/// Log file written next to the settings; the terminal belongs to the UI.
const LOG_FILE: &str = "cvtailor.log";

#[derive(Parser)]
#[command(name = "cvtailor")]
#[command(author, version, about = "Tailors a resume and cover letter to a job posting")]
#[command(long_about = "Opens a form for the job posting, sends it with your template \
documents to the configured LLM and writes the tailored resume and cover letter.\n\n\
Settings live in settings.toml next to the executable (override the directory with CVTAILOR_HOME).")]
struct Cli {}

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = Cli::parse();

    let program_dir = config::program_dir()?;
    init_logging(&program_dir)?;
    info!("Starting cvtailor in {}", program_dir.display());

    let (settings, origin) = Settings::load_or_create(&program_dir)
        .context("Failed to load configuration")?;
    let mut notices = Vec::new();
    let mut tone = Tone::Neutral;
    if origin == SettingsOrigin::CreatedDefault {
        info!("No settings file found, created default at {}", settings.path.display());
        notices.push(format!("Created default settings at {}", settings.path.display()));
    }

    let files = FileManager::new(&settings);
    let created = files.ensure_templates()?;
    if !created.is_empty() {
        notices.push(format!(
            "Created starter templates in {}; edit them before generating",
            files.template_dir().display()
        ));
    }
    info!(
        "Templates in {}, output to {}",
        files.template_dir().display(),
        files.output_dir().display()
    );

    let backend = llm::create_backend(&settings.llm)?;
    info!("Using {}", backend.describe());
    if let Err(e) = backend.health_check().await {
        warn!("Backend check failed: {}", e);
        notices.push(format!("Warning: {}", e));
        tone = Tone::Error;
    }

    let generator: Arc<dyn TextGenerator> = Arc::new(backend);
    let pipeline = Pipeline::new(
        DocumentWorkflow::new(
            Box::new(ResumePromptBuilder::from_files(&files)?),
            Arc::clone(&generator),
            files.output_path(DocumentKind::Resume),
        ),
        DocumentWorkflow::new(
            Box::new(CoverLetterPromptBuilder::from_files(&files)?),
            generator,
            files.output_path(DocumentKind::CoverLetter),
        ),
    );

    let mut app = ui::App::new(Arc::new(pipeline));
    if !notices.is_empty() {
        app = app.with_notice(notices.join(". "), tone);
    }
    let result = ui::run_tui(app);
    info!("Exiting");
    result
}

/// Send tracing output to the log file next to the program.
fn init_logging(dir: &Path) -> Result<()> {
    let path = dir.join(LOG_FILE);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cvtailor=info,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
