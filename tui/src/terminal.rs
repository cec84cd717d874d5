//! Terminal acquisition and restore
//!
//! Raw mode and the alternate screen are undone on drop and from a panic hook,
//! so a crash never leaves the user's shell unusable. Stderr logging is muted
//! for as long as the guard holds the screen.

use std::io::{self, Stdout};
use std::panic;
use std::sync::Once;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::logging::{mute_stderr, StderrMute};

/// The terminal type the session draws to
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

static PANIC_HOOK: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            // Restore terminal before printing panic
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));
    });
}

/// Owns the terminal in raw mode on the alternate screen
pub struct TerminalGuard {
    terminal: Tui,
    restored: bool,
    log_mute: Option<StderrMute>,
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen
    ///
    /// # Errors
    ///
    /// Any terminal I/O error; whatever was already changed is undone.
    pub fn acquire() -> io::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }

        let mut guard = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Self {
                terminal,
                restored: false,
                log_mute: Some(mute_stderr()),
            },
            Err(e) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                return Err(e);
            }
        };
        guard.terminal.clear()?;
        guard.terminal.hide_cursor()?;
        Ok(guard)
    }

    /// The terminal to draw on
    pub fn terminal(&mut self) -> &mut Tui {
        &mut self.terminal
    }

    /// Leave the alternate screen and raw mode
    ///
    /// Idempotent.
    ///
    /// # Errors
    ///
    /// Any terminal I/O error.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        // Unmutes once the screen is back, on success or error
        let _log_mute = self.log_mute.take();

        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::warn!(error = %e, "Failed to restore terminal");
        }
    }
}
