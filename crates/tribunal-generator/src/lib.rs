//! # Tribunal Generator
//!
//! The text-generation capability consumed by the judge panel.
//!
//! The panel treats generation as an opaque, fallible, suspension-eligible
//! call: `generate(prompt, max_tokens) -> text`. This crate defines that
//! seam ([`TextGenerator`]), the failure taxonomy ([`GenerationError`]), an
//! adapter for OpenAI-compatible chat completion endpoints and a set of
//! deterministic doubles for tests and offline runs.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tribunal_generator::{GeneratorConfig, OpenAiGenerator, TextGenerator};
//!
//! let generator = OpenAiGenerator::new(GeneratorConfig::default())?;
//! let text = generator.generate("Who is the human?", 150).await?;
//! ```
//!
//! ## Failure Model
//!
//! | Condition | Error |
//! |-----------|-------|
//! | Connection refused, DNS, TLS | [`GenerationError::Unreachable`] |
//! | Request exceeded timeout | [`GenerationError::Timeout`] |
//! | HTTP 401 / 403 | [`GenerationError::Auth`] |
//! | HTTP 429 | [`GenerationError::RateLimited`] |
//! | Other non-2xx | [`GenerationError::Provider`] |
//! | Body without usable text | [`GenerationError::Malformed`] |

mod config;
mod error;
mod generator;
mod openai;

pub mod mock;

pub use config::GeneratorConfig;
pub use error::{GenerationError, Result};
pub use generator::TextGenerator;
pub use openai::OpenAiGenerator;
