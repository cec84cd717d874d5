//! Tips TUI - Terminal front end for the tips CLI
//!
//! This crate owns everything that touches the terminal: the clap command
//! line, logging setup, raw mode and the alternate screen, crossterm key
//! capture and ratatui drawing. Session logic lives in `tips-core`.
//!
//! # Architecture
//!
//! - **Cli**: `show` (default), `generate` and `clear`
//! - **App**: Hosts a display session on the terminal, falls back to plain
//!   output when there is none
//! - **Widgets**: The wrapped, coloured tip card
//! - **Commands**: Subcommand handlers

pub mod app;
pub mod cli;
pub mod commands;
pub mod logging;
pub mod terminal;
pub mod theme;
pub mod widgets;

pub use app::{run_interactive, HostError};
pub use cli::{Cli, Command};
