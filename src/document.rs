//! Output documents: cleaning model output, filling placeholders, writing.

use crate::error::{Error, Result};
use crate::job::JobData;
use std::fmt;
use std::path::Path;

/// The two documents a run can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    /// File name of the base template inside the template directory.
    pub fn template_file_name(self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume_template.md",
            DocumentKind::CoverLetter => "cover_letter_template.md",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Resume => f.write_str("resume"),
            DocumentKind::CoverLetter => f.write_str("cover letter"),
        }
    }
}

/// Turn generated text into the final document for `job`.
///
/// Strips a wrapping markdown fence if the model added one and fills the
/// `{{company}}`, `{{job_title}}` and `{{location}}` placeholders.
pub fn render(generated: &str, job: &JobData) -> String {
    let body = strip_fence(generated);
    let mut document = body
        .replace("{{company}}", job.company())
        .replace("{{job_title}}", job.job_title())
        .replace("{{location}}", job.location());
    if !document.ends_with('\n') {
        document.push('\n');
    }
    document
}

fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening line.
    match inner.find('\n') {
        Some(newline) => inner[newline + 1..].trim(),
        None => inner.trim(),
    }
}

/// Write `contents` to `path`, creating parent directories and replacing any
/// existing file.
pub fn write(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| Error::WriteOutput {
            path: path.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, contents).map_err(|source| Error::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> JobData {
        JobData::new("Acme", "Rust Engineer", "Berlin", "Ship fast code.").unwrap()
    }

    #[test]
    fn test_plain_text_is_kept() {
        assert_eq!(render("Jane Doe\nEngineer", &job()), "Jane Doe\nEngineer\n");
    }

    #[test]
    fn test_placeholders_are_filled() {
        let text = "Dear {{company}} team,\nI want to be your {{job_title}} in {{location}}.";
        assert_eq!(
            render(text, &job()),
            "Dear Acme team,\nI want to be your Rust Engineer in Berlin.\n"
        );
    }

    #[test]
    fn test_markdown_fence_is_stripped() {
        assert_eq!(render("```markdown\n# Jane Doe\n```", &job()), "# Jane Doe\n");
        assert_eq!(render("```\nJane\n```", &job()), "Jane\n");
    }

    #[test]
    fn test_unterminated_fence_is_left_alone() {
        assert_eq!(render("```md\n# Jane", &job()), "```md\n# Jane\n");
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("resume.md");

        write(&path, "first\n").unwrap();
        write(&path, "second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
    }
}
