//! Application state behind the terminal UI.
//!
//! Key handling, submission and worker completion all mutate [`App`] on the
//! UI loop's thread; rendering only reads it.

use super::form::{Focus, Form};
use super::worker::{RunFailure, RunOutcome, Worker, WorkerEvent};
use crate::document::DocumentKind;
use crate::workflow::{GenerationReport, Pipeline};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use tracing::{debug, info};
use tui_input::backend::crossterm::EventHandler;
use tui_input::InputRequest;

const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Colour hint for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Busy,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub tone: Tone,
}

impl Status {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Looping progress indicator.
#[derive(Debug, Default)]
struct Spinner {
    label: String,
    frame: usize,
}

impl Spinner {
    fn start(&mut self, label: String) {
        self.label = label;
        self.frame = 0;
    }

    fn tick(&mut self) {
        self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
    }

    fn status(&self) -> Status {
        Status::new(
            format!("{} {}", SPINNER_FRAMES[self.frame], self.label),
            Tone::Busy,
        )
    }
}

/// What happened to a submit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Started,
    /// Required fields were empty.
    Rejected,
    /// A run is already in flight.
    Busy,
}

pub struct App {
    pub form: Form,
    status: Status,
    spinner: Spinner,
    worker: Worker,
    pipeline: Arc<Pipeline>,
    should_quit: bool,
}

impl App {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            form: Form::default(),
            status: Status::new("Ready. Fill in the job and press Ctrl+G.", Tone::Neutral),
            spinner: Spinner::default(),
            worker: Worker::default(),
            pipeline,
            should_quit: false,
        }
    }

    /// Replace the initial status, e.g. with a startup warning.
    pub fn with_notice(mut self, notice: impl Into<String>, tone: Tone) -> Self {
        self.status = Status::new(notice, tone);
        self
    }

    pub fn status(&self) -> Status {
        if self.worker.is_busy() {
            self.spinner.status()
        } else {
            self.status.clone()
        }
    }

    /// Inputs are disabled while a run is in flight.
    pub fn is_busy(&self) -> bool {
        self.worker.is_busy()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handle any terminal event.
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(*key),
            Event::Paste(text) if !self.is_busy() => self.form.insert_text(text),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if self.is_busy() {
            // No cancellation and no edits until the run finishes.
            debug!(key = ?key.code, "Ignoring key while generating");
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('g') if ctrl => {
                self.submit();
            }
            KeyCode::Tab => self.form.focus = self.form.focus.next(),
            KeyCode::BackTab => self.form.focus = self.form.focus.prev(),
            KeyCode::Enter => match self.form.focus {
                Focus::Description => {
                    self.form
                        .description
                        .handle(InputRequest::InsertChar('\n'));
                }
                Focus::CoverLetter => self.form.cover_letter = !self.form.cover_letter,
                Focus::Generate => {
                    self.submit();
                }
                _ => self.form.focus = self.form.focus.next(),
            },
            KeyCode::Char(' ') if self.form.focus == Focus::CoverLetter => {
                self.form.cover_letter = !self.form.cover_letter;
            }
            _ => {
                if let Some(field) = self.form.focus.field() {
                    let changed = self
                        .form
                        .input_mut(field)
                        .handle_event(&Event::Key(key))
                        .is_some();
                    if changed {
                        self.form.clear_error(field);
                    }
                }
            }
        }
    }

    /// Validate the form and start a run.
    pub fn submit(&mut self) -> Submission {
        if self.worker.is_busy() {
            return Submission::Busy;
        }

        let job = match self.form.job() {
            Ok(job) => job,
            Err(err) => {
                debug!("Submission rejected: {}", err);
                self.form.show_errors(&err);
                self.status = Status::new("Please fill in the required fields.", Tone::Error);
                return Submission::Rejected;
            }
        };

        info!(
            company = job.company(),
            title = job.job_title(),
            cover_letter = self.form.cover_letter,
            "Starting generation"
        );
        match self
            .worker
            .start(Arc::clone(&self.pipeline), job, self.form.cover_letter)
        {
            Ok(()) => {
                self.spinner.start(stage_label(DocumentKind::Resume));
                Submission::Started
            }
            Err(_) => Submission::Busy,
        }
    }

    /// Advance the spinner and apply anything the worker has reported.
    pub fn on_tick(&mut self) {
        while let Some(event) = self.worker.poll() {
            match event {
                WorkerEvent::Stage(kind) => self.spinner.start(stage_label(kind)),
                WorkerEvent::Finished(outcome) => self.finish(outcome),
            }
        }
        if self.worker.is_busy() {
            self.spinner.tick();
        }
    }

    fn finish(&mut self, outcome: RunOutcome) {
        match outcome.result {
            Ok(report) => {
                self.status = Status::new(
                    format!(
                        "Files generated for {} {}: {}",
                        outcome.job.company(),
                        outcome.job.job_title(),
                        written_files(&report)
                    ),
                    Tone::Success,
                );
                self.form.clear();
            }
            Err(failure) => {
                self.status = Status::new(failure_message(&failure), Tone::Error);
            }
        }
    }
}

fn stage_label(kind: DocumentKind) -> String {
    format!("Generating {}...", kind)
}

fn written_files(report: &GenerationReport) -> String {
    let mut names = vec![display_name(&report.resume)];
    if let Some(letter) = &report.cover_letter {
        names.push(display_name(letter));
    }
    names.join(", ")
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn failure_message(failure: &RunFailure) -> String {
    format!("Generation failed: {}", failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::Field;
    use crate::testing::{pipeline_in, StubGenerator};
    use std::path::Path;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn app(dir: &Path, generator: Arc<StubGenerator>) -> App {
        App::new(Arc::new(pipeline_in(dir, generator)))
    }

    fn fill(app: &mut App, company: &str, position: &str, description: &str) {
        for (focus, text) in [
            (Focus::Company, company),
            (Focus::Position, position),
            (Focus::Description, description),
        ] {
            app.form.focus = focus;
            app.form.insert_text(text);
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    async fn settle(app: &mut App) {
        for _ in 0..500 {
            app.on_tick();
            if !app.is_busy() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("generation did not finish");
    }

    #[tokio::test]
    async fn test_empty_required_field_blocks_submission() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(StubGenerator::replying("text\n"));
        let mut app = app(dir.path(), generator.clone());
        fill(&mut app, "Acme", "", "Build things");

        assert_eq!(app.submit(), Submission::Rejected);

        assert!(!app.is_busy());
        assert!(app.form.has_error(Field::JobTitle));
        assert!(!app.form.has_error(Field::Company));
        assert_eq!(app.status().tone, Tone::Error);
        settle(&mut app).await;
        assert!(generator.calls().is_empty());
        assert!(!dir.path().join("resume.md").exists());
    }

    #[tokio::test]
    async fn test_success_clears_form() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(StubGenerator::replying("text\n"));
        let mut app = app(dir.path(), generator.clone());
        fill(&mut app, "Acme", "Rust Engineer", "Build things");
        app.form.cover_letter = false;

        assert_eq!(app.submit(), Submission::Started);
        assert!(app.is_busy());
        assert_eq!(app.status().tone, Tone::Busy);
        assert!(app.status().text.contains("Generating resume"));
        settle(&mut app).await;

        let status = app.status();
        assert_eq!(status.tone, Tone::Success);
        assert_eq!(
            status.text,
            "Files generated for Acme Rust Engineer: resume.md"
        );
        assert_eq!(app.form.company.value(), "");
        assert_eq!(app.form.description.value(), "");
        assert_eq!(generator.calls(), vec![DocumentKind::Resume]);
    }

    #[tokio::test]
    async fn test_failure_keeps_form_and_message() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(StubGenerator::failing(429, "Rate limit reached"));
        let mut app = app(dir.path(), generator);
        fill(&mut app, "Acme", "Rust Engineer", "Build things");

        app.submit();
        settle(&mut app).await;

        let status = app.status();
        assert_eq!(status.tone, Tone::Error);
        assert_eq!(
            status.text,
            "Generation failed: stub request failed with status 429: Rate limit reached"
        );
        assert_eq!(app.form.company.value(), "Acme");
        assert_eq!(app.form.position.value(), "Rust Engineer");
        assert_eq!(app.form.description.value(), "Build things");
        assert!(!dir.path().join("resume.md").exists());
    }

    #[tokio::test]
    async fn test_crashed_generation_keeps_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), Arc::new(StubGenerator::panicking()));
        fill(&mut app, "Acme", "Rust Engineer", "Build things");

        assert_eq!(app.submit(), Submission::Started);
        settle(&mut app).await;

        let status = app.status();
        assert_eq!(status.tone, Tone::Error);
        assert_eq!(
            status.text,
            "Generation failed: The generation task stopped unexpectedly"
        );
        assert_eq!(app.form.company.value(), "Acme");
        assert_eq!(app.form.description.value(), "Build things");

        // The form can be submitted again.
        assert_eq!(app.submit(), Submission::Started);
        settle(&mut app).await;
    }

    #[tokio::test]
    async fn test_back_to_back_submissions() {
        let dir = tempfile::tempdir().unwrap();
        let gate = Arc::new(Notify::new());
        let generator = Arc::new(StubGenerator::replying("text\n").gated(gate.clone()));
        let mut app = app(dir.path(), generator.clone());
        fill(&mut app, "Acme", "Rust Engineer", "Build things");
        app.form.cover_letter = false;

        assert_eq!(app.submit(), Submission::Started);
        assert_eq!(app.submit(), Submission::Busy);

        // Keys are ignored while busy, including Ctrl+G and quit.
        app.handle_key(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL));
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.should_quit());

        gate.notify_one();
        settle(&mut app).await;

        assert_eq!(generator.calls(), vec![DocumentKind::Resume]);
        assert_eq!(app.status().tone, Tone::Success);
    }

    #[tokio::test]
    async fn test_stage_label_follows_worker() {
        let dir = tempfile::tempdir().unwrap();
        let gate = Arc::new(Notify::new());
        let generator = Arc::new(StubGenerator::replying("text\n").gated(gate.clone()));
        let mut app = app(dir.path(), generator.clone());
        fill(&mut app, "Acme", "Rust Engineer", "Build things");

        app.submit();
        gate.notify_one();
        for _ in 0..500 {
            app.on_tick();
            if app.status().text.contains("Generating cover letter") {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(app.status().text.contains("Generating cover letter"));

        gate.notify_one();
        settle(&mut app).await;
        assert_eq!(
            generator.calls(),
            vec![DocumentKind::Resume, DocumentKind::CoverLetter]
        );
    }

    #[test]
    fn test_keyboard_navigation() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), Arc::new(StubGenerator::replying("text")));

        press(&mut app, KeyCode::Char('A'));
        assert_eq!(app.form.company.value(), "A");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form.focus, Focus::Position);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.form.focus, Focus::Company);

        app.form.focus = Focus::Description;
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.form.description.value(), "a\nb");

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form.focus, Focus::CoverLetter);
        assert!(app.form.cover_letter);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.form.cover_letter);

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }
}
