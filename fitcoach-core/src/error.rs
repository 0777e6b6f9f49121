//! Error types for plan generation.

/// The main error type for plan-generation operations.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The selected provider has no credentials configured
    #[error("provider not configured: {0}")]
    ProviderUnavailable(String),

    /// The underlying provider call failed (transport or remote error)
    #[error("provider request failed ({provider}): {message}")]
    ProviderRequest {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    /// The provider refused the request under its safety policy
    #[error("request blocked by safety policy: {0}")]
    ContentBlocked(String),

    /// The model emitted text that is not valid JSON
    #[error("model response is not valid JSON: {0}")]
    MalformedResponse(String),

    /// The parsed JSON does not match the plan contract
    #[error("plan schema violation: {0}")]
    SchemaViolation(String),

    /// Invalid startup or builder configuration
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl PlanError {
    /// Create a provider-unavailable error
    pub fn provider_unavailable(provider: impl Into<String>) -> Self {
        Self::ProviderUnavailable(provider.into())
    }

    /// Create a provider-request error
    pub fn provider_request(
        provider: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::ProviderRequest {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a content-blocked error
    pub fn content_blocked(msg: impl Into<String>) -> Self {
        Self::ContentBlocked(msg.into())
    }

    /// Create a malformed-response error
    pub fn malformed_response(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a schema-violation error
    pub fn schema_violation(msg: impl Into<String>) -> Self {
        Self::SchemaViolation(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Check if this error may succeed on a retry.
    ///
    /// Only transport/remote failures qualify; everything else fails
    /// identically on the next attempt with the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PlanError::ProviderRequest { .. })
    }
}
