//! Google Gemini provider over the Generative Language REST API.
//!
//! The adapter always asks for `application/json` output and sets the four
//! harm categories to `BLOCK_NONE`. A block that still happens is surfaced
//! as `ContentBlocked`, distinct from transport errors.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use fitcoach_core::error::PlanError;
use fitcoach_core::provider::Provider;
use fitcoach_core::types::{GenerationRequest, GenerationResponse, ProviderInfo, Usage};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Gemini provider
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
    info: Arc<ProviderInfo>,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("info", &self.info)
            .field("model", &self.model)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

fn relaxed_safety_settings() -> Vec<SafetySetting> {
    [
        "HARM_CATEGORY_DANGEROUS_CONTENT",
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: "BLOCK_NONE",
    })
    .collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

impl GeminiProvider {
    /// Create a provider with default endpoint, model, and timeout
    pub fn new(api_key: impl Into<String>) -> Result<Self, PlanError> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a builder for more configuration options
    pub fn builder() -> GeminiBuilder {
        GeminiBuilder::default()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn info(&self) -> Arc<ProviderInfo> {
        self.info.clone()
    }

    async fn generate(&self, req: GenerationRequest) -> Result<GenerationResponse, PlanError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: &req.prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: req.temperature,
                max_output_tokens: req.max_tokens,
            },
            safety_settings: relaxed_safety_settings(),
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlanError::provider_request(&self.info.id, None, e.to_string()))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            PlanError::provider_request(&self.info.id, Some(status.as_u16()), e.to_string())
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            return Err(PlanError::provider_request(
                &self.info.id,
                Some(status.as_u16()),
                message,
            ));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            PlanError::provider_request(
                &self.info.id,
                Some(status.as_u16()),
                format!("unexpected response shape: {e}"),
            )
        })?;

        // A blocked prompt comes back 200 with feedback instead of candidates.
        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(PlanError::content_blocked(format!(
                "prompt blocked: {reason}"
            )));
        }

        let candidate = parsed.candidates.into_iter().next().ok_or_else(|| {
            PlanError::provider_request(&self.info.id, None, "empty candidate list")
        })?;

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(PlanError::content_blocked(
                "candidate stopped by safety filter",
            ));
        }

        let content = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if content.is_empty() {
            return Err(PlanError::provider_request(
                &self.info.id,
                None,
                "candidate has no text content",
            ));
        }

        let usage = parsed.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        Ok(GenerationResponse {
            text: content,
            model: parsed.model_version.unwrap_or_else(|| self.model.clone()),
            usage,
        })
    }
}

/// Builder for the Gemini provider
#[derive(Default)]
pub struct GeminiBuilder {
    api_key: Option<String>,
    api_base: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl GeminiBuilder {
    /// Set API key (required)
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set API base URL (for self-hosted gateways and tests)
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set the model served by this provider
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the HTTP client timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the provider
    pub fn build(self) -> Result<GeminiProvider, PlanError> {
        let api_key = self
            .api_key
            .ok_or_else(|| PlanError::configuration("API key is required"))?;

        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| PlanError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(GeminiProvider {
            client,
            api_key,
            api_base: self
                .api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            info: Arc::new(ProviderInfo {
                id: "gemini".to_string(),
                name: "Google Gemini".to_string(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_for(server: &mockito::ServerGuard) -> GeminiProvider {
        GeminiProvider::builder()
            .api_key("test-key")
            .api_base(server.url())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_success_returns_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"ok\":true}" }], "role": "model" },
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": 10,
                "candidatesTokenCount": 5,
                "totalTokenCount": 15
            },
            "modelVersion": "gemini-2.5-flash"
        });
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let provider = provider_for(&server);
        let response = provider
            .generate(GenerationRequest::new("make a plan"))
            .await
            .unwrap();

        assert_eq!(response.text, "{\"ok\":true}");
        assert_eq!(response.model, "gemini-2.5-flash");
        assert_eq!(response.usage.unwrap().total_tokens, 15);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_content_blocked() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::json!({
            "candidates": [],
            "promptFeedback": { "blockReason": "SAFETY" }
        });
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(GenerationRequest::new("make a plan"))
            .await
            .unwrap_err();

        match err {
            PlanError::ContentBlocked(msg) => assert!(msg.contains("SAFETY")),
            other => panic!("expected ContentBlocked, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_safety_finish_reason_is_content_blocked() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        });
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(GenerationRequest::new("make a plan"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::ContentBlocked(_)));
    }

    #[tokio::test]
    async fn test_server_error_carries_status_and_message() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::json!({
            "error": { "code": 500, "message": "internal failure", "status": "INTERNAL" }
        });
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(GenerationRequest::new("make a plan"))
            .await
            .unwrap_err();

        match err {
            PlanError::ProviderRequest {
                status, message, ..
            } => {
                assert_eq!(status, Some(500));
                assert!(message.contains("internal failure"));
            }
            other => panic!("expected ProviderRequest, got {other:?}"),
        }
        assert!(provider
            .generate(GenerationRequest::new("make a plan"))
            .await
            .unwrap_err()
            .is_retryable());
    }

    #[tokio::test]
    async fn test_request_asks_for_json_and_relaxed_safety() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::PartialJson(serde_json::json!({
                    "generationConfig": { "responseMimeType": "application/json" }
                })),
                mockito::Matcher::Regex("BLOCK_NONE".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "candidates": [{
                        "content": { "parts": [{ "text": "{}" }] },
                        "finishReason": "STOP"
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider = provider_for(&server);
        provider
            .generate(GenerationRequest::new("make a plan"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn test_builder_requires_api_key() {
        let err = GeminiProvider::builder().build().unwrap_err();
        assert!(matches!(err, PlanError::Configuration(_)));
    }
}
