//! PlanExecutor implementation.
//!
//! The executor is the single entry point for turning a user profile into a
//! validated plan: build prompt, call the selected provider under a
//! timeout, normalize, validate. It is built once at startup from the
//! providers the deployment has credentials for and is shared read-only
//! between requests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::PlanError;
use crate::normalize;
use crate::plan::FitnessPlan;
use crate::prompt;
use crate::provider::Provider;
use crate::types::{GenerationRequest, ProviderKind, RequestContext, UserProfile};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Builder for composing a `PlanExecutor` from provider adapters.
///
/// Providers are injected here rather than looked up as globals; an
/// unconfigured provider is simply absent from the registry.
pub struct PlanExecutorBuilder {
    providers: HashMap<ProviderKind, Arc<dyn Provider>>,
    timeout: Duration,
}

impl PlanExecutorBuilder {
    fn new() -> Self {
        Self {
            providers: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Register a provider adapter for a selector value.
    ///
    /// Layers are applied at the call site before registration, so the
    /// executor only ever sees the outermost provider.
    pub fn register<P: Provider>(mut self, kind: ProviderKind, provider: P) -> Self {
        self.providers.insert(kind, Arc::new(provider));
        self
    }

    /// Set the per-call deadline for the outbound provider request
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Finish building and create a `PlanExecutor`
    pub fn finish(self) -> PlanExecutor {
        PlanExecutor {
            providers: self.providers,
            timeout: self.timeout,
        }
    }
}

/// Orchestrates the generation pipeline for one request at a time.
///
/// Every call is independent and all-or-nothing: the caller receives either
/// a plan that passed validation in full, or a single typed error.
pub struct PlanExecutor {
    providers: HashMap<ProviderKind, Arc<dyn Provider>>,
    timeout: Duration,
}

impl PlanExecutor {
    /// Create a new builder
    pub fn builder() -> PlanExecutorBuilder {
        PlanExecutorBuilder::new()
    }

    /// Check whether a provider is registered
    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    /// The providers this executor can dispatch to
    pub fn configured(&self) -> Vec<ProviderKind> {
        self.providers.keys().copied().collect()
    }

    /// Generate a validated plan for a profile using the selected provider.
    ///
    /// Single attempt, no internal retry. The provider call runs under the
    /// configured deadline; expiry surfaces as a retryable provider-request
    /// failure.
    pub async fn generate_plan(
        &self,
        profile: &UserProfile,
        kind: ProviderKind,
    ) -> Result<FitnessPlan, PlanError> {
        let provider = self
            .providers
            .get(&kind)
            .ok_or_else(|| PlanError::provider_unavailable(kind.as_str()))?;

        let ctx = RequestContext::new(provider.info().id.clone());
        tracing::debug!(
            request_id = %ctx.request_id,
            provider = %ctx.provider_id,
            user = %profile.name,
            "dispatching plan generation"
        );

        let prompt = prompt::build(profile)?;
        let request = GenerationRequest::new(prompt);

        let response = tokio::time::timeout(self.timeout, provider.generate(request))
            .await
            .map_err(|_| {
                PlanError::provider_request(
                    kind.as_str(),
                    None,
                    format!("timed out after {}s", self.timeout.as_secs()),
                )
            })??;

        let value = normalize::parse(normalize::strip_fences(&response.text))?;
        let plan = FitnessPlan::validate(value)?;

        tracing::debug!(
            request_id = %ctx.request_id,
            provider = %ctx.provider_id,
            model = %response.model,
            workout_days = plan.weekly_workout.len(),
            "plan validated"
        );
        Ok(plan)
    }
}
