//! Non-Interactive Presenter
//!
//! Used when no terminal is attached or the interactive surface fails: load
//! once, pick one tip with the same policy as the session, print it and exit.

use std::io::{self, Write};

use rand::Rng;

use crate::render::{control_hint, no_tips_for_topics, NO_TIPS_AVAILABLE_MESSAGE, NO_TIPS_MESSAGE};
use crate::storage::TipStore;

/// Print one random tip to `out`
///
/// Storage failures are reported as a line of output, not as an error.
///
/// # Errors
///
/// Only I/O errors from `out` are returned.
pub fn run_fallback<S, W>(
    store: &S,
    topics: &[String],
    refresh_minutes: u64,
    out: &mut W,
) -> io::Result<()>
where
    S: TipStore + ?Sized,
    W: Write,
{
    run_fallback_with_rng(store, topics, refresh_minutes, out, &mut rand::thread_rng())
}

/// [`run_fallback`] with an explicit random source
///
/// # Errors
///
/// Only I/O errors from `out` are returned.
pub fn run_fallback_with_rng<S, W, R>(
    store: &S,
    topics: &[String],
    refresh_minutes: u64,
    out: &mut W,
    rng: &mut R,
) -> io::Result<()>
where
    S: TipStore + ?Sized,
    W: Write,
    R: Rng + ?Sized,
{
    let collection = match store.load() {
        Ok(collection) => collection,
        Err(e) => {
            tracing::warn!(error = %e, "Fallback presenter could not load tips");
            return writeln!(out, "Error loading tips: {e}");
        }
    };

    if collection.is_empty() {
        return writeln!(out, "{NO_TIPS_MESSAGE}");
    }

    let Some(tip) = collection.pick_random(topics, rng) else {
        if topics.is_empty() {
            return writeln!(out, "{NO_TIPS_AVAILABLE_MESSAGE}");
        }
        return writeln!(out, "{}", no_tips_for_topics(topics));
    };

    writeln!(out, "[{}] {}", tip.topic, tip.content)?;
    writeln!(out)?;
    writeln!(out, "{}", control_hint(refresh_minutes))?;
    out.flush()
}
