//! Session Router - The Display State Machine
//!
//! A synchronous reducer: it folds one [`SessionEvent`] at a time into the
//! [`SessionState`] and returns the [`Effect`]s the scheduler should carry
//! out. No two events interleave, so the state needs no locking.
//!
//! # Transitions
//!
//! | Event | Effect on state | Effects returned |
//! |---|---|---|
//! | quit / interrupt | `terminated` | none |
//! | next | new tip pending | none |
//! | dismiss | remove current tip, persist | none |
//! | tick | new tip pending | `ScheduleTick`, `Reload` |
//! | reload ok | replace snapshot, new tip pending | none |
//! | reload failed / error | status line | none |
//! | redraw | nothing | none |
//!
//! Once terminated, every event is ignored, which also discards reloads that
//! were still in flight when the user quit.
//!
//! # Dismiss consistency
//!
//! The tip is removed from a copy of the snapshot, the copy is saved, and only
//! a successful save makes the copy current. A failed save leaves memory
//! exactly as it was, so memory and disk cannot diverge.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::events::{Effect, KeyAction, SessionEvent};
use crate::session::{SessionConfig, SessionState};
use crate::storage::TipStore;
use crate::tip::TipCollection;

/// Status line shown after a successful dismiss
pub const DISMISSED_MESSAGE: &str = "Tip marked as known!";

/// Folds session events into session state
pub struct SessionRouter<S: TipStore, R: Rng = StdRng> {
    state: SessionState,
    store: Arc<S>,
    rng: R,
}

impl<S: TipStore> SessionRouter<S> {
    /// Initialize a session with an entropy-seeded random source
    ///
    /// Performs one synchronous load; see [`SessionRouter::with_rng`].
    pub fn initialize(config: &SessionConfig, store: Arc<S>) -> Self {
        Self::with_rng(config, store, StdRng::from_entropy())
    }
}

impl<S: TipStore, R: Rng> SessionRouter<S, R> {
    /// Initialize a session using `rng` for tip selection
    ///
    /// The collection is loaded synchronously. A failed load is not fatal: the
    /// session starts empty with the error on the status line. When tips are
    /// available the first one is selected right away so the first frame has
    /// content.
    pub fn with_rng(config: &SessionConfig, store: Arc<S>, rng: R) -> Self {
        let mut state = SessionState::new(config);

        let mut message_set = false;
        match store.load() {
            Ok(collection) => {
                tracing::debug!(count = collection.len(), "Initial tips load");
                state.collection = Some(collection);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Initial tips load failed, starting empty");
                state.collection = Some(TipCollection::new());
                state.status_message = Some(format!("Error loading tips: {e}"));
                message_set = true;
            }
        }

        let mut router = Self { state, store, rng };
        router.resolve_selection(message_set);
        router
    }

    /// Effects to issue when the session starts: the first tick
    #[must_use]
    pub fn start(&self) -> Vec<Effect> {
        if self.state.terminated {
            Vec::new()
        } else {
            vec![Effect::ScheduleTick]
        }
    }

    /// Current state, for rendering
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether the session has ended
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.state.terminated
    }

    /// Fold one event into the state
    ///
    /// Returns the follow-up work to schedule. Events after termination are
    /// ignored and yield no effects.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        if self.state.terminated {
            tracing::debug!(?event, "Ignoring event after termination");
            return Vec::new();
        }

        let mut message_set = false;
        let effects = match event {
            SessionEvent::Key(KeyAction::Quit | KeyAction::Interrupt) => {
                tracing::debug!("Session terminated by user");
                self.state.terminated = true;
                return Vec::new();
            }
            SessionEvent::Redraw => return Vec::new(),
            SessionEvent::Key(KeyAction::Next) => {
                self.state.pending_selection = true;
                Vec::new()
            }
            SessionEvent::Key(KeyAction::Dismiss) => {
                message_set = self.dismiss_current();
                Vec::new()
            }
            SessionEvent::Tick => {
                self.state.pending_selection = true;
                vec![Effect::ScheduleTick, Effect::Reload]
            }
            SessionEvent::ReloadCompleted(Ok(collection)) => {
                tracing::debug!(count = collection.len(), "Reloaded tips");
                self.state.collection = Some(collection);
                self.state.pending_selection = true;
                Vec::new()
            }
            SessionEvent::ReloadCompleted(Err(error)) | SessionEvent::Error(error) => {
                tracing::debug!(%error, "Session error");
                self.state.status_message = Some(format!("Error: {error}"));
                message_set = true;
                Vec::new()
            }
        };

        if self.state.pending_selection {
            self.resolve_selection(message_set);
        }

        effects
    }

    /// Remove the displayed tip and persist the result
    ///
    /// Returns whether the status line was set.
    fn dismiss_current(&mut self) -> bool {
        let Some(id) = self.state.current.clone() else {
            tracing::debug!("Dismiss with no tip displayed");
            return false;
        };
        let Some(collection) = self.state.collection.as_ref() else {
            return false;
        };

        let mut updated = collection.clone();
        let Some(removed) = updated.remove_tip(&id) else {
            tracing::debug!(tip_id = %id, "Displayed tip no longer in collection");
            return false;
        };

        match self.store.save(&updated) {
            Ok(()) => {
                tracing::info!(
                    tip_id = removed.short_id(),
                    topic = %removed.topic,
                    remaining = updated.len(),
                    "Tip marked as known"
                );
                self.state.collection = Some(updated);
                self.state.current = None;
                self.state.status_message = Some(DISMISSED_MESSAGE.to_string());
                self.state.pending_selection = true;
            }
            Err(e) => {
                tracing::warn!(error = %e, tip_id = removed.short_id(), "Failed to persist dismiss");
                self.state.status_message = Some(format!("Error saving: {e}"));
            }
        }
        true
    }

    /// Pick a new tip if the collection is loaded
    ///
    /// Clears the status line unless the event being handled set it. With an
    /// empty collection the selection stays pending.
    fn resolve_selection(&mut self, keep_message: bool) {
        let Some(collection) = self.state.collection.as_ref() else {
            return;
        };

        if !keep_message {
            self.state.status_message = None;
        }

        if collection.is_empty() {
            self.state.current = None;
            return;
        }

        let picked = collection
            .pick_random(&self.state.topic_filter, &mut self.rng)
            .map(|tip| tip.id.clone());
        if picked.is_none() {
            tracing::debug!(filter = ?self.state.topic_filter, "No tips match filter");
        }
        self.state.current = picked;
        self.state.pending_selection = false;
    }
}
