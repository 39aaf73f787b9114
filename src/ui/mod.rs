//! Interactive form for entering a job posting.
//!
//! - `form`: input values, focus and inline validation errors
//! - `worker`: the single background generation task
//! - `app`: key handling, submission and completion
//! - `tui`: terminal setup and rendering

pub mod app;
pub mod form;
pub mod tui;
pub mod worker;

pub use app::App;
pub use tui::run_tui;
