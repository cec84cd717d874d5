//! Screen Rendering
//!
//! [`render`] is a pure function from [`SessionState`] to a [`Screen`]. The
//! screen is a small semantic description (which message, which tip, which
//! status line) so the terminal host can style it, while [`Display`] gives the
//! plain-text form used by the fallback presenter and by tests.

use std::fmt;

use crate::session::SessionState;

/// Shown while no collection has been loaded
pub const LOADING_MESSAGE: &str = "Loading tips...";

/// Shown when the tips file holds no tips at all
pub const NO_TIPS_MESSAGE: &str =
    "No tips found. Generate some tips first using: tips generate -t <topic>";

/// Shown when the unfiltered selection came up empty
pub const NO_TIPS_AVAILABLE_MESSAGE: &str = "No tips available!";

/// Appended to every screen that has no tip to act on
pub const QUIT_HINT: &str = "Press 'q' to quit.";

/// What the session should currently display
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    /// The session has ended; nothing is drawn
    Terminated,
    /// No collection yet
    Loading,
    /// The collection is empty
    NoTips {
        /// Pending status line
        status: Option<String>,
    },
    /// The topic filter matched nothing
    NoTipsForTopics {
        /// The active filter
        topics: Vec<String>,
        /// Pending status line
        status: Option<String>,
    },
    /// No filter, yet nothing was selected
    NoTipsAvailable {
        /// Pending status line
        status: Option<String>,
    },
    /// A tip is on screen
    Tip {
        /// Topic of the tip
        topic: String,
        /// Tip content
        content: String,
        /// Refresh period in whole minutes
        refresh_minutes: u64,
        /// Pending status line
        status: Option<String>,
    },
}

impl Screen {
    /// The headline message for screens without a tip
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Terminated | Self::Tip { .. } => None,
            Self::Loading => Some(LOADING_MESSAGE.to_string()),
            Self::NoTips { .. } => Some(NO_TIPS_MESSAGE.to_string()),
            Self::NoTipsForTopics { topics, .. } => Some(no_tips_for_topics(topics)),
            Self::NoTipsAvailable { .. } => Some(NO_TIPS_AVAILABLE_MESSAGE.to_string()),
        }
    }

    /// The status line, if any
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        match self {
            Self::Terminated | Self::Loading => None,
            Self::NoTips { status }
            | Self::NoTipsForTopics { status, .. }
            | Self::NoTipsAvailable { status }
            | Self::Tip { status, .. } => status.as_deref(),
        }
    }

    /// Whether the quit hint belongs under the message
    #[must_use]
    pub fn shows_quit_hint(&self) -> bool {
        matches!(
            self,
            Self::NoTips { .. } | Self::NoTipsForTopics { .. } | Self::NoTipsAvailable { .. }
        )
    }
}

/// "No tips found for topics: [a, b]"
#[must_use]
pub fn no_tips_for_topics(topics: &[String]) -> String {
    format!("No tips found for topics: [{}]", topics.join(", "))
}

/// Key binding hint shown under a tip
#[must_use]
pub fn control_hint(refresh_minutes: u64) -> String {
    format!("n:next | k:known | q:quit | refresh:{refresh_minutes}m")
}

/// Describe what the session should show
#[must_use]
pub fn render(state: &SessionState) -> Screen {
    if state.is_terminated() {
        return Screen::Terminated;
    }

    let Some(collection) = state.collection() else {
        return Screen::Loading;
    };

    let status = state.status_message().map(str::to_string);

    if collection.is_empty() {
        return Screen::NoTips { status };
    }

    match state.current_tip() {
        Some(tip) => Screen::Tip {
            topic: tip.topic.clone(),
            content: tip.content.clone(),
            refresh_minutes: state.refresh_minutes(),
            status,
        },
        None if state.topic_filter().is_empty() => Screen::NoTipsAvailable { status },
        None => Screen::NoTipsForTopics {
            topics: state.topic_filter().to_vec(),
            status,
        },
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminated => Ok(()),
            Self::Tip {
                topic,
                content,
                refresh_minutes,
                status,
            } => {
                writeln!(f, "[{topic}] {content}")?;
                write!(f, "{}", control_hint(*refresh_minutes))?;
                if let Some(status) = status {
                    write!(f, "\n{status}")?;
                }
                Ok(())
            }
            other => {
                if let Some(message) = other.message() {
                    f.write_str(&message)?;
                }
                if other.shows_quit_hint() {
                    write!(f, "\n\n{QUIT_HINT}")?;
                }
                if let Some(status) = other.status() {
                    write!(f, "\n{status}")?;
                }
                Ok(())
            }
        }
    }
}
