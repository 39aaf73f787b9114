//! The job posting a generation run is tailored to.

use std::fmt;

/// Form fields that make up a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Company,
    JobTitle,
    Location,
    JobDescription,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Company => "Company",
            Field::JobTitle => "Position",
            Field::Location => "Location",
            Field::JobDescription => "Job description",
        };
        f.write_str(label)
    }
}

/// Required fields that were left empty, in form order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing required fields: {}", join(.missing))]
pub struct ValidationError {
    pub missing: Vec<Field>,
}

fn join(fields: &[Field]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A validated, immutable job posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobData {
    company: String,
    job_title: String,
    location: String,
    job_description: String,
}

impl JobData {
    /// Validate raw form values. Surrounding whitespace is dropped and a
    /// whitespace-only value counts as empty.
    pub fn new(
        company: &str,
        job_title: &str,
        location: &str,
        job_description: &str,
    ) -> Result<Self, ValidationError> {
        let company = company.trim();
        let job_title = job_title.trim();
        let job_description = job_description.trim();

        let missing: Vec<Field> = [
            (Field::Company, company),
            (Field::JobTitle, job_title),
            (Field::JobDescription, job_description),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(ValidationError { missing });
        }

        Ok(Self {
            company: company.to_string(),
            job_title: job_title.to_string(),
            location: location.trim().to_string(),
            job_description: job_description.to_string(),
        })
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    /// Empty when not given.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }
}
