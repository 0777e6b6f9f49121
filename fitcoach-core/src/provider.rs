//! Provider trait and core abstractions.

use crate::error::PlanError;
use crate::types::{GenerationRequest, GenerationResponse, ProviderInfo};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// Core trait implemented by every external text-generation service.
///
/// An adapter makes exactly one attempt per call. Whatever retry policy a
/// deployment wants lives above this trait, never inside it; the error's
/// `is_retryable()` tells the caller which failures are worth repeating.
#[async_trait]
pub trait Provider: Send + Sync + Debug + 'static {
    /// Get provider information
    fn info(&self) -> Arc<ProviderInfo>;

    /// Send one generation request and return the raw model output.
    ///
    /// Adapters that support a structured-output mode must request it, and
    /// adapters that expose safety controls must relax the categories that
    /// would otherwise block benign fitness and diet content.
    async fn generate(&self, req: GenerationRequest) -> Result<GenerationResponse, PlanError>;
}
