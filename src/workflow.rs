//! Generation workflows.
//!
//! A [`DocumentWorkflow`] runs prompt → LLM → document write for one document
//! kind. A [`Pipeline`] runs the resume workflow and then, when asked, the
//! cover letter workflow. The first failure aborts everything after it.

use crate::document::{self, DocumentKind};
use crate::error::{Error, Result};
use crate::job::JobData;
use crate::llm::TextGenerator;
use crate::prompt::PromptBuilder;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

/// Generates one document kind.
pub struct DocumentWorkflow {
    prompts: Box<dyn PromptBuilder>,
    generator: Arc<dyn TextGenerator>,
    output: PathBuf,
}

impl DocumentWorkflow {
    pub fn new(
        prompts: Box<dyn PromptBuilder>,
        generator: Arc<dyn TextGenerator>,
        output: PathBuf,
    ) -> Self {
        Self {
            prompts,
            generator,
            output,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.prompts.kind()
    }

    /// Build the prompt, call the generator and overwrite the output file.
    /// Returns the path written.
    pub async fn run(&self, job: &JobData) -> Result<PathBuf> {
        let span = info_span!("workflow", document = %self.kind());
        async {
            info!(
                company = job.company(),
                title = job.job_title(),
                generator = %self.generator.describe(),
                "Generating"
            );
            let prompt = self.prompts.build(job);
            let text = self.generator.generate(&prompt).await?;
            let contents = document::render(&text, job);
            document::write(&self.output, &contents)?;
            info!(path = %self.output.display(), bytes = contents.len(), "Done");
            Ok::<_, Error>(self.output.clone())
        }
        .instrument(span)
        .await
    }
}

/// Paths written by one successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub resume: PathBuf,
    pub cover_letter: Option<PathBuf>,
}

/// Resume workflow followed by the optional cover letter workflow.
pub struct Pipeline {
    resume: DocumentWorkflow,
    cover_letter: DocumentWorkflow,
}

impl Pipeline {
    pub fn new(resume: DocumentWorkflow, cover_letter: DocumentWorkflow) -> Self {
        Self {
            resume,
            cover_letter,
        }
    }

    /// Run the workflows in order. `on_stage` is called as each one starts.
    pub async fn run<F>(
        &self,
        job: &JobData,
        include_cover_letter: bool,
        mut on_stage: F,
    ) -> Result<GenerationReport>
    where
        F: FnMut(DocumentKind) + Send,
    {
        on_stage(self.resume.kind());
        let resume = self.resume.run(job).await?;

        let cover_letter = if include_cover_letter {
            on_stage(self.cover_letter.kind());
            Some(self.cover_letter.run(job).await?)
        } else {
            None
        };

        Ok(GenerationReport {
            resume,
            cover_letter,
        })
    }
}
