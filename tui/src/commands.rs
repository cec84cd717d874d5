//! Subcommand handlers
//!
//! Handlers write to caller-supplied writers so they can be tested without a
//! terminal; `main` passes stdout and stderr.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{bail, Context};
use tips_core::{
    run_fallback, JsonFileStore, SessionConfig, StoreError, TipGenerator, TipStore, TipsConfig,
};

use crate::app::{run_interactive, HostError};

/// The tips file named by the configuration
///
/// # Errors
///
/// Fails when no path is configured and the home directory is unknown.
pub fn open_store(config: &TipsConfig) -> anyhow::Result<JsonFileStore> {
    let path = config
        .tips_file
        .clone()
        .ok_or(StoreError::NoHomeDir)
        .context("Failed to locate tips file")?;
    Ok(JsonFileStore::new(path))
}

/// `tips show`: interactive session, or one printed tip without a terminal
///
/// # Errors
///
/// Only when neither the session nor the fallback output can be produced.
pub async fn show(config: &TipsConfig, topics: Vec<String>) -> anyhow::Result<()> {
    let store = Arc::new(open_store(config)?);
    let session = SessionConfig::new(topics, config.refresh_minutes);

    match run_interactive(&session, Arc::clone(&store)).await {
        Ok(()) => Ok(()),
        Err(e) => {
            match &e {
                HostError::NotATerminal => tracing::debug!("No terminal, printing one tip"),
                _ => tracing::warn!(error = %e, "Interactive display failed, printing one tip"),
            }
            let mut stdout = io::stdout().lock();
            run_fallback(
                store.as_ref(),
                &session.topics,
                session.refresh_minutes(),
                &mut stdout,
            )
            .context("Failed to write tip")
        }
    }
}

/// `tips generate`: ask the generator for tips on each topic and append them
///
/// A failing topic is reported on `err` and the next one is tried.
///
/// # Errors
///
/// Fails when no topic was given or a writer fails.
pub async fn generate<G, S, O, E>(
    generator: &G,
    store: &S,
    topics: &[String],
    count: u32,
    out: &mut O,
    err: &mut E,
) -> anyhow::Result<()>
where
    G: TipGenerator + ?Sized,
    S: TipStore + ?Sized,
    O: Write,
    E: Write,
{
    if topics.is_empty() {
        bail!("Please specify at least one topic using -t or --topic");
    }

    for topic in topics {
        let topic = topic.trim();
        if topic.is_empty() {
            writeln!(err, "Warning: Empty topic provided, skipping")?;
            continue;
        }

        writeln!(out, "Generating {count} tips for topic: {topic}...")?;
        out.flush()?;

        let tips = match generator.generate(topic, count).await {
            Ok(tips) => tips,
            Err(e) => {
                tracing::warn!(topic, error = %e, "Generation failed");
                writeln!(err, "Error generating tips for {topic}: {e}")?;
                continue;
            }
        };

        let mut collection = match store.load() {
            Ok(collection) => collection,
            Err(e) => {
                writeln!(err, "Error loading existing tips: {e}")?;
                continue;
            }
        };

        let added = tips
            .iter()
            .filter_map(|content| collection.add_tip(topic, content))
            .count();

        if let Err(e) = store.save(&collection) {
            writeln!(err, "Error saving tips: {e}")?;
            continue;
        }

        tracing::info!(topic, added, total = collection.len(), "Saved generated tips");
        writeln!(out, "Successfully generated and saved {added} tips for {topic}")?;
    }

    Ok(())
}

/// `tips clear`: delete the tips file
///
/// # Errors
///
/// Fails if the file exists but cannot be removed, or `out` fails.
pub fn clear<O: Write>(store: &JsonFileStore, out: &mut O) -> anyhow::Result<()> {
    let removed = store
        .clear()
        .with_context(|| format!("Error deleting tips file: {}", store.path().display()))?;

    if removed {
        writeln!(out, "Successfully deleted tips file: {}", store.path().display())?;
    } else {
        writeln!(out, "No tips file found - nothing to clear")?;
    }
    Ok(())
}
