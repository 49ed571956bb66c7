use std::io::stdout;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::error::TerminalError;

/// Exclusive use of the terminal: alternate screen, raw mode, hidden cursor.
///
/// Restores the normal screen when dropped, so every exit path out of the
/// refresh loop gives the terminal back. Panics are covered by the hook that
/// `ratatui::try_init` installs.
pub struct TerminalGuard {
    terminal: DefaultTerminal,
    restored: bool,
}

impl TerminalGuard {
    pub fn acquire() -> Result<Self, TerminalError> {
        let terminal = ratatui::try_init().map_err(TerminalError::Init)?;
        if let Err(err) = execute!(stdout(), Hide) {
            ratatui::restore();
            return Err(TerminalError::Init(err));
        }
        tracing::debug!("terminal acquired");
        Ok(Self {
            terminal,
            restored: false,
        })
    }

    pub fn terminal(&mut self) -> &mut DefaultTerminal {
        &mut self.terminal
    }

    /// Restores the terminal and reports failures; `Drop` does the same
    /// silently if this is never called.
    pub fn release(mut self) -> Result<(), TerminalError> {
        self.restored = true;
        let shown = execute!(stdout(), Show);
        ratatui::try_restore().map_err(TerminalError::Restore)?;
        shown.map_err(TerminalError::Restore)?;
        tracing::debug!("terminal restored");
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if !self.restored {
            let _ = execute!(stdout(), Show);
            ratatui::restore();
        }
    }
}
