//! Full-screen form rendered with ratatui.

use super::app::{App, Tone};
use super::form::Focus;
use crate::job::Field;
use anyhow::Result;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tui_input::Input;

/// Spinner frame rate and worker poll interval.
const TICK: Duration = Duration::from_millis(100);

const MAX_WIDTH: u16 = 100;

/// Run the form until the user quits.
pub fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| draw_ui(frame, app))?;

        if event::poll(TICK)? {
            let event = event::read()?;
            app.handle_event(&event);
        }
        app.on_tick();
    }
    Ok(())
}

/// Draw the whole form.
pub fn draw_ui(frame: &mut Frame, app: &App) {
    let size = frame.area();
    let width = size.width.min(MAX_WIDTH);
    let area = centered_rect(width, size.height, size);
    frame.render_widget(Clear, area);

    let outer = Block::default()
        .title(" cvtailor ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let busy = app.is_busy();
    draw_line_input(frame, app, Field::Company, Focus::Company, rows[0], busy);
    draw_line_input(frame, app, Field::JobTitle, Focus::Position, rows[1], busy);
    draw_line_input(frame, app, Field::Location, Focus::Location, rows[2], busy);
    draw_description(frame, app, rows[3], busy);
    draw_controls(frame, app, rows[4], busy);
    draw_status(frame, app, rows[5]);

    let help = Paragraph::new(Line::from(Span::styled(
        " Tab/Shift+Tab move · Enter next · Ctrl+G generate · Esc quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(help, rows[6]);
}

fn field_block(app: &App, field: Field, focused: bool, busy: bool) -> Block<'static> {
    let border = if busy {
        Color::DarkGray
    } else if app.form.has_error(field) {
        Color::Red
    } else if focused {
        Color::Cyan
    } else {
        Color::Gray
    };

    let mut block = Block::default()
        .title(format!(" {} ", field))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    if app.form.has_error(field) {
        block = block.title(
            Line::from(Span::styled(
                " Required ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        );
    } else if field == Field::Location && app.form.input(field).value().is_empty() {
        block = block.title(
            Line::from(Span::styled(" (optional) ", Style::default().fg(Color::DarkGray)))
                .right_aligned(),
        );
    }
    block
}

fn text_style(busy: bool) -> Style {
    if busy {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    }
}

fn draw_line_input(
    frame: &mut Frame,
    app: &App,
    field: Field,
    focus: Focus,
    area: Rect,
    busy: bool,
) {
    let focused = app.form.focus == focus;
    let block = field_block(app, field, focused, busy);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let input = app.form.input(field);
    let input_width = inner_area.width as usize;
    if input_width == 0 {
        return;
    }
    // Keep one column free for the cursor at the end of the value.
    let cursor_pos = input.visual_cursor();
    let scroll = input.visual_scroll(input_width.saturating_sub(1));

    frame.render_widget(
        Paragraph::new(Span::styled(input.value(), text_style(busy))).scroll((0, scroll as u16)),
        inner_area,
    );

    if focused && !busy {
        let cursor_x = inner_area.x + cursor_pos.saturating_sub(scroll) as u16;
        frame.set_cursor_position((cursor_x, inner_area.y));
    }
}

fn draw_description(frame: &mut Frame, app: &App, area: Rect, busy: bool) {
    let focused = app.form.focus == Focus::Description;
    let block = field_block(app, Field::JobDescription, focused, busy);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let input = &app.form.description;
    let (text, through_cursor) = with_cursor_marker(input, focused && !busy);
    let lines = Paragraph::new(through_cursor)
        .wrap(Wrap { trim: false })
        .line_count(inner_area.width);
    let scroll = lines.saturating_sub(inner_area.height as usize) as u16;

    let paragraph = Paragraph::new(text)
        .style(text_style(busy))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, inner_area);
}

/// The description text with a block cursor inserted, plus the text up to
/// the end of the word under the cursor. Word wrapping places that prefix
/// the same way as the full text, so its height gives the cursor line.
fn with_cursor_marker(input: &Input, show: bool) -> (String, String) {
    let value = input.value();
    if !show {
        return (value.to_string(), value.to_string());
    }
    let split = value
        .char_indices()
        .nth(input.cursor())
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    let (before, after) = value.split_at(split);
    let word_end = after.find(char::is_whitespace).unwrap_or(after.len());
    let text = format!("{}▏{}", before, after);
    let through_cursor = format!("{}▏{}", before, &after[..word_end]);
    (text, through_cursor)
}

fn draw_controls(frame: &mut Frame, app: &App, area: Rect, busy: bool) {
    let highlight = |focus: Focus| {
        if busy {
            Style::default().fg(Color::DarkGray)
        } else if app.form.focus == focus {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        }
    };

    let checkbox = if app.form.cover_letter { "[x]" } else { "[ ]" };
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(format!("{} Cover letter", checkbox), highlight(Focus::CoverLetter)),
        Span::raw("   "),
        Span::styled("[ Generate ]", highlight(Focus::Generate)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.status();
    let color = match status.tone {
        Tone::Neutral => Color::White,
        Tone::Busy => Color::Blue,
        Tone::Success => Color::Green,
        Tone::Error => Color::Red,
    };
    let line = Line::from(Span::styled(
        format!(" {}", status.text),
        Style::default().fg(color),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Create a centered rectangle.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{pipeline_in, StubGenerator};
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| draw_ui(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App {
        let dir = std::env::temp_dir();
        App::new(Arc::new(pipeline_in(
            &dir,
            Arc::new(StubGenerator::replying("text")),
        )))
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(40, 10, area);
        assert_eq!(centered.width, 40);
        assert_eq!(centered.height, 10);
        assert_eq!(centered.x, 30); // (100 - 40) / 2
        assert_eq!(centered.y, 20); // (50 - 10) / 2
    }

    #[test]
    fn test_form_renders_all_fields() {
        let screen = render(&app());
        for label in [
            "Company",
            "Position",
            "Location",
            "(optional)",
            "Job description",
            "[x] Cover letter",
            "[ Generate ]",
            "Ready.",
        ] {
            assert!(screen.contains(label), "missing {label:?}");
        }
    }

    #[test]
    fn test_required_markers_after_rejected_submit() {
        let mut app = app();
        let err = app.form.job().unwrap_err();
        app.form.show_errors(&err);

        let screen = render(&app);
        assert_eq!(screen.matches("Required").count(), 3);
    }

    #[test]
    fn test_long_description_keeps_cursor_visible() {
        let mut app = app();
        app.form.focus = Focus::Description;
        app.form
            .insert_text(&"responsibilities include designing distributed systems ".repeat(60));

        let screen = render(&app);
        assert!(screen.contains('▏'), "cursor marker scrolled out of view");
    }

    #[test]
    fn test_wide_characters_fill_line_input() {
        let mut app = app();
        app.form.focus = Focus::Company;
        app.form.insert_text(&"株式会社".repeat(20));

        let screen = render(&app);
        let visible = screen.chars().filter(|c| "株式会社".contains(*c)).count();
        // 96 columns inside the field, two per character.
        assert!(visible >= 44, "only {visible} characters drawn");
    }

    #[test]
    fn test_cursor_marker_position() {
        let input = Input::default().with_value("héllo".to_string());
        let (text, through_cursor) = with_cursor_marker(&input, true);
        assert_eq!(text, "héllo▏");
        assert_eq!(through_cursor, "héllo▏");

        let input = input.with_cursor(2);
        let (text, through_cursor) = with_cursor_marker(&input, true);
        assert_eq!(text, "hé▏llo");
        assert_eq!(through_cursor, "hé▏llo");

        let input = Input::default().with_value("one two\nthree".to_string()).with_cursor(1);
        let (_, through_cursor) = with_cursor_marker(&input, true);
        assert_eq!(through_cursor, "o▏ne");

        let (text, _) = with_cursor_marker(&input, false);
        assert_eq!(text, "one two\nthree");
    }
}
