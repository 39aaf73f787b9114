//! Locations of template inputs and generated outputs.

use crate::config::Settings;
use crate::document::DocumentKind;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

const STARTER_RESUME: &str = r#"# Your Name

Email · Phone · City · LinkedIn

## Summary

Two or three sentences about who you are and what you do best.

## Experience

### Job title, Company (Start - End)

- Achievement with a measurable result
- Achievement with a measurable result

## Skills

- Languages, frameworks, tools

## Education

Degree, School (Year)
"#;

const STARTER_COVER_LETTER: &str = r#"Your Name
Email · Phone

Dear Hiring Manager at {{company}},

I am writing to apply for the {{job_title}} position.

Your background and the reasons you fit the role go here.

Sincerely,
Your Name
"#;

/// Resolves template and output paths from the settings.
#[derive(Debug, Clone)]
pub struct FileManager {
    template_dir: PathBuf,
    output_dir: PathBuf,
    resume_name: String,
    cover_letter_name: String,
}

impl FileManager {
    pub fn new(settings: &Settings) -> Self {
        Self {
            template_dir: settings.template_dir.clone(),
            output_dir: settings.output_dir.clone(),
            resume_name: settings.resume_name.clone(),
            cover_letter_name: settings.cover_letter_name.clone(),
        }
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the base template for a document kind.
    pub fn template_path(&self, kind: DocumentKind) -> PathBuf {
        self.template_dir.join(kind.template_file_name())
    }

    /// Path the generated document is written to.
    pub fn output_path(&self, kind: DocumentKind) -> PathBuf {
        match kind {
            DocumentKind::Resume => self.output_dir.join(&self.resume_name),
            DocumentKind::CoverLetter => self.output_dir.join(&self.cover_letter_name),
        }
    }

    /// Read the base template for a document kind.
    pub fn read_template(&self, kind: DocumentKind) -> Result<String> {
        let path = self.template_path(kind);
        std::fs::read_to_string(&path).map_err(|source| Error::ReadTemplate { path, source })
    }

    /// Write starter templates for any that are missing. Returns the paths
    /// that were created.
    pub fn ensure_templates(&self) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        for (kind, contents) in [
            (DocumentKind::Resume, STARTER_RESUME),
            (DocumentKind::CoverLetter, STARTER_COVER_LETTER),
        ] {
            let path = self.template_path(kind);
            if path.exists() {
                continue;
            }
            std::fs::create_dir_all(&self.template_dir).map_err(|source| {
                Error::WriteTemplate {
                    path: path.clone(),
                    source,
                }
            })?;
            std::fs::write(&path, contents).map_err(|source| Error::WriteTemplate {
                path: path.clone(),
                source,
            })?;
            info!("Created starter {} template at {}", kind, path.display());
            created.push(path);
        }
        Ok(created)
    }
}
