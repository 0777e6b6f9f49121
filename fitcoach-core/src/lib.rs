//! # fitcoach-core
//!
//! Core abstractions and the plan-generation pipeline for fitcoach.
//!
//! This crate defines the domain types (user profile, fitness plan), the
//! `Provider` trait implemented by external generation services, layer
//! composition for cross-cutting concerns, and the `PlanExecutor` that
//! orchestrates prompt construction, the provider call, response
//! normalization, and schema validation.

pub mod error;
pub mod layer;
pub mod normalize;
pub mod plan;
pub mod prompt;
pub mod provider;
pub mod runtime;
pub mod types;

// Re-exports
pub use error::PlanError;
pub use layer::{Layer, LayeredProvider};
pub use plan::{DietDay, Exercise, FitnessPlan, Meals, WorkoutDay};
pub use provider::Provider;
pub use runtime::PlanExecutor;
pub use types::*;

/// Result type alias for plan-generation operations
pub type Result<T> = std::result::Result<T, PlanError>;
