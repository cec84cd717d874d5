//! Display Session State
//!
//! The state threaded through the [`SessionRouter`](crate::router::SessionRouter).
//! It is owned by the router and only read by the renderer.
//!
//! The displayed tip is held by id, not by index or reference: every
//! [`SessionState::current_tip`] call resolves it against the latest
//! collection snapshot, so replacing the snapshot can never leave a dangling
//! selection.

use std::num::NonZeroU32;
use std::time::Duration;

use crate::tip::{Tip, TipCollection};

/// Immutable settings for one display session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Topics to show (empty = all)
    pub topics: Vec<String>,
    /// Interval between refresh ticks
    pub refresh_period: Duration,
}

impl SessionConfig {
    /// Build from CLI-level values
    ///
    /// Blank topics are dropped and the rest trimmed, matching how tips are
    /// stored.
    #[must_use]
    pub fn new(topics: Vec<String>, refresh_minutes: NonZeroU32) -> Self {
        Self {
            topics: normalize_topics(topics),
            refresh_period: Duration::from_secs(u64::from(refresh_minutes.get()) * 60),
        }
    }

    /// Use an explicit refresh period instead of whole minutes
    #[must_use]
    pub fn with_refresh_period(mut self, period: Duration) -> Self {
        self.refresh_period = period;
        self
    }

    /// Refresh period in whole minutes, for the control hint
    #[must_use]
    pub fn refresh_minutes(&self) -> u64 {
        self.refresh_period.as_secs() / 60
    }
}

fn normalize_topics(topics: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(topics.len());
    for topic in topics {
        let topic = topic.trim();
        if !topic.is_empty() && !out.iter().any(|t| t == topic) {
            out.push(topic.to_string());
        }
    }
    out
}

/// The mutable state of a display session
#[derive(Clone, Debug)]
pub struct SessionState {
    /// Latest collection snapshot (`None` until the first load)
    pub(crate) collection: Option<TipCollection>,
    /// Id of the displayed tip
    pub(crate) current: Option<String>,
    /// Topic filter (empty = all)
    pub(crate) topic_filter: Vec<String>,
    /// Interval between ticks
    pub(crate) refresh_period: Duration,
    /// A new tip must be chosen before the next render
    pub(crate) pending_selection: bool,
    /// Transient status line
    pub(crate) status_message: Option<String>,
    /// The session has ended
    pub(crate) terminated: bool,
}

impl SessionState {
    /// A fresh, not yet loaded state
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            collection: None,
            current: None,
            topic_filter: config.topics.clone(),
            refresh_period: config.refresh_period,
            pending_selection: true,
            status_message: None,
            terminated: false,
        }
    }

    /// Latest collection snapshot
    #[must_use]
    pub fn collection(&self) -> Option<&TipCollection> {
        self.collection.as_ref()
    }

    /// The displayed tip, resolved against the current snapshot
    #[must_use]
    pub fn current_tip(&self) -> Option<&Tip> {
        let id = self.current.as_deref()?;
        self.collection.as_ref()?.get(id)
    }

    /// Id of the displayed tip
    #[must_use]
    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Active topic filter
    #[must_use]
    pub fn topic_filter(&self) -> &[String] {
        &self.topic_filter
    }

    /// Refresh period
    #[must_use]
    pub fn refresh_period(&self) -> Duration {
        self.refresh_period
    }

    /// Refresh period in whole minutes
    #[must_use]
    pub fn refresh_minutes(&self) -> u64 {
        self.refresh_period.as_secs() / 60
    }

    /// Whether a new tip must be chosen
    #[must_use]
    pub fn pending_selection(&self) -> bool {
        self.pending_selection
    }

    /// Transient status line
    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Whether the session has ended
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}
