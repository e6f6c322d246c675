//! Terminal front end
//!
//! Draws photos and the live feed with Unicode half-block characters, two
//! image rows per terminal cell.

mod widgets;

use crate::constants::INPUT_POLL_LIMIT;
use crate::shell::{Command, Shell};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use std::io::{self, stdout};
use std::time::Instant;
use widgets::{ImagePane, MessageLine, StatusBar};

/// Run the shell until the user quits
pub fn run(shell: &mut Shell) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut terminal = or_rollback(
        || {
            let mut stdout = stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Ok(Terminal::new(CrosstermBackend::new(stdout))?)
        },
        || {
            // Best effort: the setup error is the one worth reporting
            let _ = execute!(stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        },
    )
    .context("Failed to set up terminal")?;

    let result = run_loop(&mut terminal, shell);

    // Restore every piece even if one of them fails
    let raw = disable_raw_mode();
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let cursor = terminal.show_cursor();

    result?;
    raw?;
    screen?;
    cursor?;
    Ok(())
}

/// Run `setup`, undoing earlier terminal changes with `rollback` if it fails
fn or_rollback<T>(setup: impl FnOnce() -> Result<T>, rollback: impl FnOnce()) -> Result<T> {
    match setup() {
        Ok(value) => Ok(value),
        Err(e) => {
            rollback();
            Err(e)
        }
    }
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, shell: &mut Shell) -> Result<()> {
    shell.start(Instant::now());
    tracing::info!("Shell ready");

    loop {
        shell.tick(Instant::now());

        terminal.draw(|f| draw(f, shell))?;

        let now = Instant::now();
        let timeout = shell
            .next_deadline()
            .map(|due| due.saturating_duration_since(now))
            .unwrap_or(INPUT_POLL_LIMIT)
            .min(INPUT_POLL_LIMIT);

        if !event::poll(timeout)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match map_key(key, shell.ui().prompt.is_some()) {
                Some(Action::Quit) => break,
                Some(Action::Run(command)) => shell.dispatch(command),
                None => {}
            }
        }
    }

    tracing::info!("Shell closed");
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Quit,
    Run(Command),
}

fn map_key(key: KeyEvent, prompting: bool) -> Option<Action> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    if prompting {
        let command = match key.code {
            KeyCode::Enter => Command::SubmitName,
            KeyCode::Esc => Command::CancelName,
            KeyCode::Backspace => Command::PromptBackspace,
            KeyCode::Char(c) => Command::PromptInput(c),
            _ => return None,
        };
        return Some(Action::Run(command));
    }

    let command = match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char('c') => Command::Capture,
        KeyCode::Char('r') => Command::ShowRecent,
        KeyCode::Char('p') => Command::ShowPrevious,
        KeyCode::Esc => Command::DismissNotice,
        _ => return None,
    };
    Some(Action::Run(command))
}

fn draw(f: &mut Frame, shell: &Shell) {
    let area = f.area();
    let ui = shell.ui();

    // Bottom two lines: notice/prompt, then status bar
    let body = Rect {
        height: area.height.saturating_sub(2),
        ..area
    };
    let message_area = Rect {
        y: area.y + area.height.saturating_sub(2),
        height: area.height.min(1),
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };

    if shell.options().live {
        let left = Rect {
            width: body.width / 2,
            ..body
        };
        let right = Rect {
            x: body.x + left.width,
            width: body.width - left.width,
            ..body
        };
        let placeholder = if shell.preview_running() {
            "Waiting for camera..."
        } else {
            "Live preview unavailable"
        };
        f.render_widget(ImagePane::new(ui.live_frame.as_ref(), placeholder), left);
        f.render_widget(photo_pane(shell), right);
    } else {
        f.render_widget(photo_pane(shell), body);
    }

    f.render_widget(MessageLine::from_ui(ui), message_area);
    f.render_widget(
        StatusBar::new(&ui.status, shell.options().annotate),
        status_area,
    );
}

fn photo_pane(shell: &Shell) -> ImagePane<'_> {
    let image = shell.ui().display.as_ref().map(|d| &d.image);
    ImagePane::new(image, "No photos to display.")
}
