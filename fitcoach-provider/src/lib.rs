//! # fitcoach-provider
//!
//! Provider implementations for the fitcoach generation pipeline.
//!
//! Both adapters are single-attempt: they request structured JSON output
//! from their service, translate service-level failures into the shared
//! error taxonomy, and leave retry decisions to their callers.

pub mod gemini;
pub mod openai;

// Re-exports
pub use gemini::{GeminiBuilder, GeminiProvider};
pub use openai::{OpenAiBuilder, OpenAiProvider};
