//! Terminal user interface (TUI) for cameko.
//!
//! ## Entry points
//!
//! - [`run_form`]: full-screen form with a live preview of the post.

pub mod form;

use crate::context::Session;
use crate::output::OutputMode;
use crate::system::SystemExporter;
use anyhow::{Context, Result};
use cameko_core::export::ExportKind;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use form::{FormAction, FormView};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::path::Path;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Open the form and block until the user quits.
///
/// # Errors
///
/// Fails when the config is invalid or the terminal cannot be driven.
pub fn run_form(state_dir: Option<&Path>) -> Result<()> {
    let mut session = Session::open(OutputMode::Text, state_dir)?;

    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enter raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
    terminal.hide_cursor()?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, &mut session);
    restore_terminal(&mut terminal)?;
    result
}

fn event_loop(terminal: &mut Term, session: &mut Session) -> Result<()> {
    let mut view = FormView::new();
    loop {
        terminal.draw(|frame| view.render(frame, &session.controller))?;

        let Event::Key(key) = event::read().context("failed to read terminal event")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match view.handle_key(key, &mut session.controller) {
            FormAction::Continue => {}
            FormAction::Quit => return Ok(()),
            FormAction::Export(kind) => {
                let base = session.compose_base().to_string();
                let message = match session
                    .controller
                    .export(kind, &SystemExporter::long_lived(), &base) {
                    Ok(_) if kind == ExportKind::Copy => "コピーしました".to_string(),
                    Ok(_) => "投稿画面を開きました".to_string(),
                    Err(err) => err.to_string(),
                };
                view.set_status(message);
            }
        }
    }
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}
