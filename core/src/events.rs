//! Session Events and Effects
//!
//! Everything that can happen to a display session arrives as a
//! [`SessionEvent`] on one FIFO channel: key presses from the terminal,
//! timer ticks and reload results from the scheduler. The router answers each
//! event with a list of [`Effect`]s for the scheduler to carry out.

use crate::tip::TipCollection;

/// Key-driven user actions
///
/// Bindings are fixed: `n` next, `k` known (dismiss), `q` quit, and the
/// interrupt key (Ctrl-C) also quits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Show another tip
    Next,
    /// Remove the current tip permanently
    Dismiss,
    /// End the session
    Quit,
    /// Interrupt signal; same as quit
    Interrupt,
}

impl KeyAction {
    /// Map a typed character to an action
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(Self::Next),
            'k' => Some(Self::Dismiss),
            'q' => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Events consumed by the session router
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// A bound key was pressed
    Key(KeyAction),
    /// The refresh timer fired
    Tick,
    /// A reload of the tips file finished
    ReloadCompleted(Result<TipCollection, String>),
    /// A producer reported an error
    Error(String),
    /// The display surface needs repainting (e.g. the terminal was resized)
    Redraw,
}

/// Follow-up work requested by the router
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Deliver the next [`SessionEvent::Tick`] one refresh period from now
    ScheduleTick,
    /// Read the tips file and deliver [`SessionEvent::ReloadCompleted`]
    Reload,
}
