//! Tips Entry Point
//!
//! Usage:
//!   tips [OPTIONS] [COMMAND]
//!
//! Commands:
//!   show      Display tips interactively (default)
//!   generate  Generate tips for the given topics
//!   clear     Delete the tips file

use std::io;

use anyhow::Context;
use clap::Parser;

use tips_core::config::default_config_path;
use tips_core::{load_config_from_path, LlmTipGenerator};
use tips_tui::{commands, logging, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(config_path).context("Failed to load configuration")?;
    cli.overrides().apply(&mut config);

    logging::init_logging(&cli.log_level, config.log_file.as_deref())?;
    tracing::debug!(source = %config.source(), command = ?cli.subcommand(), "Configuration loaded");

    match cli.subcommand() {
        Command::Show => commands::show(&config, cli.topics).await,
        Command::Generate => {
            if cli.topics.is_empty() {
                anyhow::bail!("Please specify at least one topic using -t or --topic");
            }
            let generator =
                LlmTipGenerator::from_config(&config).context("Failed to set up tip generation")?;
            let store = commands::open_store(&config)?;
            commands::generate(
                &generator,
                &store,
                &cli.topics,
                config.count.get(),
                &mut io::stdout(),
                &mut io::stderr(),
            )
            .await
        }
        Command::Clear => {
            let store = commands::open_store(&config)?;
            commands::clear(&store, &mut io::stdout())
        }
    }
}
