//! Tip Generation
//!
//! Tips are produced by a hosted LLM through the [`TipGenerator`] trait, so
//! the `generate` command can be tested against a mock and the provider can be
//! swapped by configuration alone.
//!
//! # Available Providers
//!
//! - **openai**: chat completions API (`OPENAI_API_KEY`)
//! - **anthropic**: messages API (`ANTHROPIC_API_KEY`)
//! - **google**: Gemini `generateContent` (`GOOGLE_API_KEY`)
//!
//! # Usage
//!
//! ```ignore
//! use tips_core::generator::{LlmTipGenerator, TipGenerator};
//!
//! let generator = LlmTipGenerator::from_config(&config)?;
//! let tips = generator.generate("git", 20).await?;
//! ```

mod llm;
mod prompt;
mod traits;

pub use llm::LlmTipGenerator;
pub use prompt::{build_prompt, clean_response, parse_tips};
pub use traits::{classify_failure, GenerateError, ModelSpec, Provider, TipGenerator};
