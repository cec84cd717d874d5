//! Interactive Session Host
//!
//! Connects a [`SessionRouter`] to the terminal:
//!
//! - a key reader task turns crossterm events into [`SessionEvent`]s on the
//!   session channel, next to the scheduler's ticks and reloads
//! - a signal task turns SIGINT/SIGTERM into an interrupt, so the terminal is
//!   restored even when the signal does not come from the keyboard
//! - after every event the state is rendered and drawn with [`TipCard`]
//!
//! Any failure to get or use the terminal is reported as a [`HostError`] so
//! the caller can fall back to plain output.

use std::future::Future;
use std::io::{self, IsTerminal};
use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::layout::Margin;
use ratatui::Frame;
use thiserror::Error;
use tokio::task::JoinHandle;

use tips_core::{
    event_channel, render, run_session, EventSender, KeyAction, Scheduler, SessionConfig,
    SessionEvent, SessionRouter, SessionState, TipStore,
};

use crate::terminal::TerminalGuard;
use crate::widgets::TipCard;

/// Why the interactive session could not run
#[derive(Debug, Error)]
pub enum HostError {
    /// stdin or stdout is not a TTY
    #[error("not running in a terminal")]
    NotATerminal,

    /// Raw mode, alternate screen or restore failed
    #[error("terminal setup failed: {0}")]
    Terminal(#[from] io::Error),

    /// The session loop failed while running
    #[error("session failed: {0:#}")]
    Session(anyhow::Error),
}

/// Map a key press to a session action
///
/// Only presses count; Ctrl-C is the interrupt, other control chords are
/// ignored.
#[must_use]
pub fn map_key(key: &KeyEvent) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Interrupt)
        }
        KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => None,
        KeyCode::Char(c) => KeyAction::from_char(c),
        _ => None,
    }
}

/// Draw the current state into a frame
pub fn draw_session(frame: &mut Frame, state: &SessionState) {
    let screen = render(state);
    let area = frame.area().inner(Margin {
        horizontal: 1,
        vertical: 1,
    });
    frame.render_widget(TipCard::new(&screen), area);
}

/// Feed terminal input into the session channel until it closes
fn spawn_key_reader(tx: EventSender) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut events = EventStream::new();

        while let Some(event) = events.next().await {
            let session_event = match event {
                Ok(Event::Key(key)) => match map_key(&key) {
                    Some(action) => SessionEvent::Key(action),
                    None => continue,
                },
                Ok(Event::Resize(..)) => SessionEvent::Redraw,
                Ok(_) => continue,
                Err(e) => {
                    let _ = tx.send(SessionEvent::Error(format!("terminal input failed: {e}")));
                    break;
                }
            };

            if tx.send(session_event).is_err() {
                break;
            }
        }

        tracing::debug!("Key reader stopped");
    })
}

/// Send an interrupt once `signal` fires
///
/// A listener that could not be installed sends nothing; the keyboard Ctrl-C
/// still works.
async fn forward_interrupt<F>(signal: F, tx: EventSender)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            tracing::debug!("Interrupt signal received");
            let _ = tx.send(SessionEvent::Key(KeyAction::Interrupt));
        }
        Err(e) => tracing::debug!(error = %e, "Signal listener unavailable"),
    }
}

/// Resolves on SIGINT, or SIGTERM on unix
async fn shutdown_signal() -> io::Result<()> {
    #[cfg(unix)]
    let mut terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    #[cfg(unix)]
    let terminated = async {
        terminate.recv().await;
    };

    #[cfg(not(unix))]
    let terminated = std::future::pending::<()>();

    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        () = terminated => Ok(()),
    }
}

fn spawn_signal_listener(tx: EventSender) -> JoinHandle<()> {
    tokio::spawn(forward_interrupt(shutdown_signal(), tx))
}

/// Run the interactive display session until quit
///
/// # Errors
///
/// [`HostError`] when no terminal is attached or terminal I/O fails.
pub async fn run_interactive<S>(config: &SessionConfig, store: Arc<S>) -> Result<(), HostError>
where
    S: TipStore + 'static,
{
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(HostError::NotATerminal);
    }

    let mut guard = TerminalGuard::acquire()?;

    let mut router = SessionRouter::initialize(config, Arc::clone(&store));
    let (tx, mut rx) = event_channel();
    let key_reader = spawn_key_reader(tx.clone());
    let signal_listener = spawn_signal_listener(tx.clone());
    let mut scheduler = Scheduler::new(config.refresh_period, store, tx);

    tracing::debug!(
        topics = ?config.topics,
        refresh_secs = config.refresh_period.as_secs(),
        "Interactive session started"
    );

    let terminal = guard.terminal();
    let result = run_session(&mut router, &mut scheduler, &mut rx, |state| {
        terminal.draw(|frame| draw_session(frame, state))?;
        Ok(())
    })
    .await;

    key_reader.abort();
    signal_listener.abort();
    guard.restore()?;

    result.map_err(HostError::Session)
}
