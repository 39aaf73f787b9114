//! Prompt construction for each document kind.

use crate::document::DocumentKind;
use crate::error::Result;
use crate::files::FileManager;
use crate::job::JobData;

/// System prompt for tailoring a resume.
const RESUME_SYSTEM: &str = "You are an expert resume writer. \
    You rewrite a candidate's base resume so it targets one specific job posting. \
    Only use facts present in the base resume; never invent employers, dates, \
    degrees or skills. Reorder and rephrase to match the posting's keywords. \
    Output ONLY the finished resume in the same markdown layout as the base resume. \
    No preamble, no explanations, no code fences. \
    Keep any {{placeholder}} markers exactly as written.";

/// System prompt for writing a cover letter.
const COVER_LETTER_SYSTEM: &str = "You are an expert career coach writing cover letters. \
    You write a concise, specific cover letter (under 400 words) for one job posting, \
    following the structure and voice of the candidate's template letter. \
    Only claim experience the template supports. \
    Output ONLY the letter text. \
    No preamble, no explanations, no code fences. \
    Keep any {{placeholder}} markers exactly as written.";

/// A prompt ready to send to a text generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: DocumentKind,
    pub system: String,
    pub user: String,
}

/// Builds the prompt for one document kind.
pub trait PromptBuilder: Send + Sync {
    fn kind(&self) -> DocumentKind;

    fn build(&self, job: &JobData) -> Prompt;
}

/// Tailors the base resume template to a posting.
pub struct ResumePromptBuilder {
    template: String,
}

impl ResumePromptBuilder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Read the resume template once, at construction.
    pub fn from_files(files: &FileManager) -> Result<Self> {
        Ok(Self::new(files.read_template(DocumentKind::Resume)?))
    }
}

impl PromptBuilder for ResumePromptBuilder {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Resume
    }

    fn build(&self, job: &JobData) -> Prompt {
        let user = format!(
            "Tailor my resume for this job.\n\n{}\n\nBase resume:\n{}",
            job_section(job),
            self.template.trim()
        );
        Prompt {
            kind: DocumentKind::Resume,
            system: RESUME_SYSTEM.to_string(),
            user,
        }
    }
}

/// Writes a cover letter modelled on the template letter.
pub struct CoverLetterPromptBuilder {
    template: String,
}

impl CoverLetterPromptBuilder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Read the cover letter template once, at construction.
    pub fn from_files(files: &FileManager) -> Result<Self> {
        Ok(Self::new(files.read_template(DocumentKind::CoverLetter)?))
    }
}

impl PromptBuilder for CoverLetterPromptBuilder {
    fn kind(&self) -> DocumentKind {
        DocumentKind::CoverLetter
    }

    fn build(&self, job: &JobData) -> Prompt {
        let user = format!(
            "Write a cover letter for this job, addressed to {}.\n\n{}\n\nTemplate letter:\n{}",
            job.company(),
            job_section(job),
            self.template.trim()
        );
        Prompt {
            kind: DocumentKind::CoverLetter,
            system: COVER_LETTER_SYSTEM.to_string(),
            user,
        }
    }
}

fn job_section(job: &JobData) -> String {
    let location = if job.location().is_empty() {
        "Not specified"
    } else {
        job.location()
    };
    format!(
        "Company: {}\nPosition: {}\nLocation: {}\n\nJob description:\n{}",
        job.company(),
        job.job_title(),
        location,
        job.job_description()
    )
}
