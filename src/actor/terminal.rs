//! Terminal guard: raw mode and alternate screen for the lifetime of the UI.

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;

/// Terminal setup options.
#[derive(Debug, Clone, Copy)]
pub struct TerminalConfig {
    /// Capture wheel and clicks.
    pub enable_mouse: bool,
    /// Draw on the alternate screen so the shell is restored on exit.
    pub alternate_screen: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            enable_mouse: true,
            alternate_screen: true,
        }
    }
}

/// Puts the terminal into raw mode on creation and restores it on drop.
pub struct Terminal {
    config: TerminalConfig,
}

impl Terminal {
    /// Enter raw mode and the configured screen modes.
    ///
    /// If a later step fails, the steps already taken are undone by the
    /// guard's drop.
    pub fn enter(config: TerminalConfig) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self { config };

        let mut stdout = io::stdout();
        if config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        if config.enable_mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        execute!(stdout, cursor::Hide)?;
        Ok(guard)
    }

    /// Current terminal size as `(columns, rows)`.
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show);
        if self.config.enable_mouse {
            let _ = execute!(stdout, DisableMouseCapture);
        }
        if self.config.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
    }
}
