//! Form state: inputs, focus and inline validation errors.

use crate::job::{Field, JobData, ValidationError};
use tui_input::{Input, InputRequest};

/// Focusable form elements, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Company,
    Position,
    Location,
    Description,
    CoverLetter,
    Generate,
}

const ORDER: [Focus; 6] = [
    Focus::Company,
    Focus::Position,
    Focus::Location,
    Focus::Description,
    Focus::CoverLetter,
    Focus::Generate,
];

impl Focus {
    pub fn next(self) -> Self {
        let i = ORDER.iter().position(|f| *f == self).unwrap_or(0);
        ORDER[(i + 1) % ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let i = ORDER.iter().position(|f| *f == self).unwrap_or(0);
        ORDER[(i + ORDER.len() - 1) % ORDER.len()]
    }

    /// The job field edited by this element, if it is a text input.
    pub fn field(self) -> Option<Field> {
        match self {
            Focus::Company => Some(Field::Company),
            Focus::Position => Some(Field::JobTitle),
            Focus::Location => Some(Field::Location),
            Focus::Description => Some(Field::JobDescription),
            Focus::CoverLetter | Focus::Generate => None,
        }
    }
}

pub struct Form {
    pub company: Input,
    pub position: Input,
    pub location: Input,
    pub description: Input,
    pub cover_letter: bool,
    pub focus: Focus,
    errors: Vec<Field>,
}

impl Default for Form {
    fn default() -> Self {
        Self {
            company: Input::default(),
            position: Input::default(),
            location: Input::default(),
            description: Input::default(),
            cover_letter: true,
            focus: Focus::Company,
            errors: Vec::new(),
        }
    }
}

impl Form {
    /// Validate the current values into a job.
    pub fn job(&self) -> Result<JobData, ValidationError> {
        JobData::new(
            self.company.value(),
            self.position.value(),
            self.location.value(),
            self.description.value(),
        )
    }

    pub fn input(&self, field: Field) -> &Input {
        match field {
            Field::Company => &self.company,
            Field::JobTitle => &self.position,
            Field::Location => &self.location,
            Field::JobDescription => &self.description,
        }
    }

    pub fn input_mut(&mut self, field: Field) -> &mut Input {
        match field {
            Field::Company => &mut self.company,
            Field::JobTitle => &mut self.position,
            Field::Location => &mut self.location,
            Field::JobDescription => &mut self.description,
        }
    }

    /// Show the validation result next to each field.
    pub fn show_errors(&mut self, err: &ValidationError) {
        self.errors = err.missing.clone();
    }

    pub fn has_error(&self, field: Field) -> bool {
        self.errors.contains(&field)
    }

    /// Editing a field hides its error.
    pub fn clear_error(&mut self, field: Field) {
        self.errors.retain(|f| *f != field);
    }

    /// Insert text into the focused input, e.g. from a paste.
    pub fn insert_text(&mut self, text: &str) {
        let Some(field) = self.focus.field() else {
            return;
        };
        let multiline = field == Field::JobDescription;
        let input = self.input_mut(field);
        for c in text.chars() {
            let c = match c {
                '\r' => continue,
                '\n' if !multiline => ' ',
                '\t' => ' ',
                c => c,
            };
            input.handle(InputRequest::InsertChar(c));
        }
        self.clear_error(field);
    }

    /// Empty every text input after a successful run. The cover letter
    /// choice is kept.
    pub fn clear(&mut self) {
        self.company.reset();
        self.position.reset();
        self.location.reset();
        self.description.reset();
        self.errors.clear();
        self.focus = Focus::Company;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycles_both_ways() {
        assert_eq!(Focus::Company.next(), Focus::Position);
        assert_eq!(Focus::Generate.next(), Focus::Company);
        assert_eq!(Focus::Company.prev(), Focus::Generate);
        assert_eq!(Focus::Description.prev(), Focus::Location);
    }

    #[test]
    fn test_errors_shown_and_cleared_per_field() {
        let mut form = Form::default();
        let err = form.job().unwrap_err();
        form.show_errors(&err);
        assert!(form.has_error(Field::Company));
        assert!(form.has_error(Field::JobTitle));
        assert!(form.has_error(Field::JobDescription));
        assert!(!form.has_error(Field::Location));

        form.focus = Focus::Position;
        form.insert_text("Engineer");
        assert!(!form.has_error(Field::JobTitle));
        assert!(form.has_error(Field::Company));
    }

    #[test]
    fn test_paste_keeps_newlines_only_in_description() {
        let mut form = Form::default();
        form.insert_text("Acme\r\nCorp");
        assert_eq!(form.company.value(), "Acme Corp");

        form.focus = Focus::Description;
        form.insert_text("line one\r\nline two");
        assert_eq!(form.description.value(), "line one\nline two");
    }

    #[test]
    fn test_clear_keeps_cover_letter_choice() {
        let mut form = Form::default();
        form.cover_letter = false;
        form.focus = Focus::Description;
        form.insert_text("text");

        form.clear();

        assert_eq!(form.description.value(), "");
        assert_eq!(form.focus, Focus::Company);
        assert!(!form.cover_letter);
    }
}
