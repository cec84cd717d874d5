//! Command-Line Interface
//!
//! ```bash
//! # Random tips from every topic, refreshed hourly
//! tips
//!
//! # Only git and vim tips, every 15 minutes
//! tips -t git,vim -r 15
//!
//! # Ask the configured model for 10 new rust tips
//! tips generate -t rust -c 10
//!
//! # Delete the tips file
//! tips clear
//! ```

use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tips_core::ConfigOverrides;

/// Random cheatsheet tips in your terminal
#[derive(Parser, Debug)]
#[command(name = "tips")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Use 'n' to get next tip, 'k' to mark current tip as known, 'q' to quit.")]
pub struct Cli {
    /// Topics to show or generate (repeatable, or comma-separated)
    #[arg(short = 't', long = "topic", value_name = "TOPIC", value_delimiter = ',', global = true)]
    pub topics: Vec<String>,

    /// Refresh interval in minutes
    #[arg(short = 'r', long, value_name = "MINUTES", global = true)]
    pub refresh: Option<NonZeroU32>,

    /// Number of tips to generate per topic
    #[arg(short = 'c', long, value_name = "N", global = true)]
    pub count: Option<NonZeroU32>,

    /// Configuration file path
    #[arg(long, env = "TIPS_CONFIG", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Tips file path
    #[arg(long, value_name = "FILE", global = true)]
    pub tips_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "TIPS_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// What to do (defaults to `show`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Show random tips interactively
    Show,
    /// Generate tips for the given topics with an LLM
    Generate,
    /// Delete the tips file
    Clear,
}

impl Cli {
    /// The subcommand, with `show` as the default
    #[must_use]
    pub fn subcommand(&self) -> Command {
        self.command.unwrap_or(Command::Show)
    }

    /// CLI values that take precedence over config and environment
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(path) = &self.tips_file {
            overrides = overrides.with_tips_file(path.clone());
        }
        if let Some(minutes) = self.refresh {
            overrides = overrides.with_refresh_minutes(minutes);
        }
        if let Some(count) = self.count {
            overrides = overrides.with_count(count);
        }
        overrides
    }
}
