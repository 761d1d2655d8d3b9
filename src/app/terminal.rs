use std::{
    io::{self, Stdout},
    sync::Once,
    time::Duration,
};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event},
    execute,
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

static RESTORE_ON_PANIC: Once = Once::new();

/// The screen the editor owns while it runs: raw mode, alternate screen, no
/// cursor. `close` hands the terminal back and reports failures; dropping
/// without closing restores it quietly.
pub struct EditorTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    closed: bool,
}

impl EditorTerminal {
    pub fn open() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All)) {
            let _ = disable_raw_mode();
            return Err(err).context("failed to enter alternate screen");
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))
            .context("failed to initialize terminal")?;
        RESTORE_ON_PANIC.call_once(|| {
            let previous = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = leave_screen();
                previous(info);
            }));
        });
        debug!("editor terminal opened");
        Ok(Self {
            terminal,
            closed: false,
        })
    }

    pub fn render(&mut self, draw: impl FnOnce(&mut Frame<'_>)) -> Result<()> {
        self.terminal
            .draw(draw)
            .context("failed to draw the editor")?;
        Ok(())
    }

    /// Waits at most `tick` for the next input event.
    pub fn next_event(&self, tick: Duration) -> Result<Option<Event>> {
        if !event::poll(tick).context("failed to poll terminal events")? {
            return Ok(None);
        }
        let event = event::read().context("failed to read terminal event")?;
        Ok(Some(event))
    }

    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        leave_screen().context("failed to restore the terminal")?;
        debug!("editor terminal closed");
        Ok(())
    }
}

impl Drop for EditorTerminal {
    fn drop(&mut self) {
        if !self.closed
            && let Err(err) = leave_screen()
        {
            warn!(error = %err, "terminal left in raw mode");
        }
    }
}

fn leave_screen() -> io::Result<()> {
    let raw = disable_raw_mode();
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    raw
}
