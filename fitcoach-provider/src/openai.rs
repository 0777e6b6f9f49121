//! OpenAI provider implementation using the async-openai crate.
//!
//! Chat completions are requested in JSON mode (`response_format:
//! json_object`); the instruction prompt already carries the expected
//! schema, so no per-request schema registration is needed. OpenAI exposes
//! no safety-threshold controls, but a completion cut off by the content
//! filter is still reported as `ContentBlocked`.

use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, FinishReason as OpenAiFinishReason,
    ResponseFormat as OpenAiResponseFormat,
};
use async_openai::Client;
use async_trait::async_trait;
use std::sync::Arc;

use fitcoach_core::error::PlanError;
use fitcoach_core::provider::Provider;
use fitcoach_core::types::{GenerationRequest, GenerationResponse, ProviderInfo, Usage};

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI provider using async-openai
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
    info: Arc<ProviderInfo>,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("info", &self.info)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiProvider {
    /// Create a provider with the default model
    pub fn new(api_key: impl Into<String>) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);

        Self {
            client: Client::with_config(config),
            model: DEFAULT_MODEL.to_string(),
            info: Arc::new(ProviderInfo {
                id: "openai".to_string(),
                name: "OpenAI".to_string(),
            }),
        }
    }

    /// Create a builder for more configuration options
    pub fn builder() -> OpenAiBuilder {
        OpenAiBuilder::default()
    }

    fn map_error(&self, err: OpenAIError) -> PlanError {
        match err {
            OpenAIError::ApiError(api) => {
                PlanError::provider_request(&self.info.id, None, api.message)
            }
            other => PlanError::provider_request(&self.info.id, None, other.to_string()),
        }
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn info(&self) -> Arc<ProviderInfo> {
        self.info.clone()
    }

    async fn generate(&self, req: GenerationRequest) -> Result<GenerationResponse, PlanError> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(req.prompt.as_str())
            .build()
            .map_err(|e| {
                PlanError::provider_request(
                    &self.info.id,
                    None,
                    format!("failed to build message: {e}"),
                )
            })?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .messages(vec![ChatCompletionRequestMessage::User(message)])
            .response_format(OpenAiResponseFormat::JsonObject);
        if let Some(temperature) = req.temperature {
            builder.temperature(temperature);
        }
        if let Some(max_tokens) = req.max_tokens {
            builder.max_tokens(max_tokens);
        }
        let openai_req = builder.build().map_err(|e| {
            PlanError::provider_request(
                &self.info.id,
                None,
                format!("failed to build request: {e}"),
            )
        })?;

        let response = self
            .client
            .chat()
            .create(openai_req)
            .await
            .map_err(|e| self.map_error(e))?;

        let model = response.model.clone();
        let usage = response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            PlanError::provider_request(&self.info.id, None, "no choices in response")
        })?;

        if matches!(choice.finish_reason, Some(OpenAiFinishReason::ContentFilter)) {
            return Err(PlanError::content_blocked(
                "completion stopped by content filter",
            ));
        }

        let text = choice.message.content.unwrap_or_default();
        if text.is_empty() {
            return Err(PlanError::provider_request(
                &self.info.id,
                None,
                "empty completion content",
            ));
        }

        Ok(GenerationResponse { text, model, usage })
    }
}

/// Builder for the OpenAI provider
#[derive(Default)]
pub struct OpenAiBuilder {
    api_key: Option<String>,
    api_base: Option<String>,
    model: Option<String>,
}

impl OpenAiBuilder {
    /// Set API key (required)
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set API base URL (for OpenAI-compatible gateways and tests)
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set the model served by this provider
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Build the provider
    pub fn build(self) -> Result<OpenAiProvider, PlanError> {
        let api_key = self
            .api_key
            .ok_or_else(|| PlanError::configuration("API key is required"))?;

        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(api_base) = self.api_base {
            config = config.with_api_base(api_base);
        }

        Ok(OpenAiProvider {
            client: Client::with_config(config),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            info: Arc::new(ProviderInfo {
                id: "openai".to_string(),
                name: "OpenAI".to_string(),
            }),
        })
    }
}
