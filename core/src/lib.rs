//! Tips Core - Headless Tip Storage, Generation and Display Sessions
//!
//! This crate holds everything the `tips` command does that is not drawing to
//! a terminal: the tip model and its JSON file, LLM-backed generation, the
//! configuration layer, and the event-driven display session that the
//! terminal host plugs into.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Terminal Host (tips-tui)                  │
//! │   crossterm key capture          ratatui drawing of Screen    │
//! └───────────┬────────────────────────────────▲─────────────────┘
//!             │ SessionEvent::Key               │ render(&SessionState)
//! ┌───────────┼────────────────────────────────┼─────────────────┐
//! │           ▼            TIPS CORE            │                 │
//! │   ┌──────────────┐  events   ┌──────────────┴──┐             │
//! │   │  mpsc queue  │──────────▶│  SessionRouter  │             │
//! │   └──────▲───────┘           └───┬─────────┬───┘             │
//! │          │ Tick /                 │ Effects │ save (dismiss)  │
//! │          │ ReloadCompleted        ▼         ▼                 │
//! │   ┌──────┴───────┐◀──────────────┘   ┌──────────────┐        │
//! │   │  Scheduler   │──── load ────────▶│   TipStore   │        │
//! │   └──────────────┘                   │ (JSON file)  │        │
//! │                                      └──────▲───────┘        │
//! │   ┌──────────────┐   tips for a topic        │ append         │
//! │   │ TipGenerator │───────────────────────────┘ (generate)     │
//! │   │    (LLM)     │                                            │
//! │   └──────────────┘                                            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`TipCollection`]: The ordered set of tips in the tips file
//! - [`JsonFileStore`]: [`TipStore`] over `~/.tips.json`
//! - [`SessionRouter`]: Synchronous state machine for a display session
//! - [`Scheduler`]: Turns router effects into timer and reload tasks
//! - [`Screen`]: What the session should display right now
//! - [`LlmTipGenerator`]: [`TipGenerator`] for OpenAI, Anthropic and Google
//!
//! # Module Overview
//!
//! - [`tip`]: Tip and collection model
//! - [`storage`]: Persistence of the tips file
//! - [`config`]: TOML and environment configuration
//! - [`session`]: Session settings and state
//! - [`events`]: Session events and router effects
//! - [`router`]: Event handling for a display session
//! - [`scheduler`]: Refresh timer, reloads and the session loop
//! - [`render`]: State to screen
//! - [`fallback`]: One-shot presenter for non-interactive output
//! - [`generator`]: LLM tip generation
//! - [`harness`]: Retry and budget helpers for live API tests
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod events;
pub mod fallback;
pub mod generator;
pub mod harness;
pub mod render;
pub mod router;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod tip;

// Re-exports for convenience
pub use config::{load_config_from_path, ConfigError, ConfigOverrides, ConfigSource, TipsConfig};
pub use events::{Effect, KeyAction, SessionEvent};
pub use fallback::run_fallback;
pub use generator::{GenerateError, LlmTipGenerator, ModelSpec, Provider, TipGenerator};
pub use render::{render, Screen};
pub use router::SessionRouter;
pub use scheduler::{event_channel, run_session, EventReceiver, EventSender, Scheduler};
pub use session::{SessionConfig, SessionState};
pub use storage::{JsonFileStore, StoreError, TipStore};
pub use tip::{Tip, TipCollection};
