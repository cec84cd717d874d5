//! Tracing setup
//!
//! Logs go to a file when one is configured and to stderr otherwise. The stderr
//! layer is muted while the interactive session holds the terminal, since any
//! write there would land on top of the drawn frame. `RUST_LOG` wins over
//! `--log-level`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static STDERR_MUTED: AtomicBool = AtomicBool::new(false);

/// Keeps the stderr log layer silent until dropped
#[must_use = "stderr logging resumes as soon as the mute is dropped"]
#[derive(Debug)]
pub struct StderrMute {
    was_muted: bool,
}

impl Drop for StderrMute {
    fn drop(&mut self) {
        STDERR_MUTED.store(self.was_muted, Ordering::SeqCst);
    }
}

/// Silence stderr logging, e.g. while the alternate screen is active
pub fn mute_stderr() -> StderrMute {
    StderrMute {
        was_muted: STDERR_MUTED.swap(true, Ordering::SeqCst),
    }
}

/// Whether stderr logging is currently muted
#[must_use]
pub fn stderr_muted() -> bool {
    STDERR_MUTED.load(Ordering::SeqCst)
}

/// Filter used when `RUST_LOG` is unset
#[must_use]
pub fn default_filter(level: &str) -> String {
    format!("tips_core={level},tips_tui={level}")
}

/// Install the global subscriber
///
/// # Errors
///
/// Fails if the log file cannot be opened or a subscriber is already set.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let stderr_layer = log_file.is_none().then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr.with_filter(|_| !stderr_muted()))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}
