//! Logging layer for provider operations.

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use fitcoach_core::error::PlanError;
use fitcoach_core::layer::{Layer, LayeredProvider};
use fitcoach_core::provider::Provider;
use fitcoach_core::types::{GenerationRequest, GenerationResponse, ProviderInfo};

/// Logging layer that logs provider operations.
#[derive(Debug, Clone, Default)]
pub struct LoggingLayer;

impl LoggingLayer {
    /// Create a new logging layer
    pub fn new() -> Self {
        Self
    }
}

impl<P: Provider> Layer<P> for LoggingLayer {
    type LayeredProvider = LoggingProvider<P>;

    fn layer(&self, inner: P) -> Self::LayeredProvider {
        LoggingProvider { inner }
    }
}

/// Provider wrapped with logging
#[derive(Debug)]
pub struct LoggingProvider<P> {
    inner: P,
}

#[async_trait]
impl<P: Provider> LayeredProvider for LoggingProvider<P> {
    type Inner = P;

    fn inner(&self) -> &Self::Inner {
        &self.inner
    }

    async fn layered_generate(
        &self,
        req: GenerationRequest,
    ) -> Result<GenerationResponse, PlanError> {
        let provider = self.inner.info();
        tracing::debug!(
            provider = %provider.id,
            prompt_chars = req.prompt.len(),
            "generation request"
        );

        let start = std::time::Instant::now();
        let result = self.inner.generate(req).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::debug!(
                    provider = %provider.id,
                    model = %response.model,
                    tokens = response.usage.map(|u| u.total_tokens).unwrap_or(0),
                    ?elapsed,
                    "generation success"
                );
            }
            Err(e) => {
                tracing::error!(
                    provider = %provider.id,
                    error = %e,
                    retryable = e.is_retryable(),
                    ?elapsed,
                    "generation error"
                );
            }
        }

        result
    }
}

#[async_trait]
impl<P: Provider> Provider for LoggingProvider<P> {
    fn info(&self) -> Arc<ProviderInfo> {
        LayeredProvider::layered_info(self)
    }

    async fn generate(&self, req: GenerationRequest) -> Result<GenerationResponse, PlanError> {
        LayeredProvider::layered_generate(self, req).await
    }
}
