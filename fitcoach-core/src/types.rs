//! Core types for plan generation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fitness goal selected by the user.
///
/// Wire values match the labels the original intake form submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    #[serde(rename = "Weight Loss")]
    WeightLoss,
    #[serde(rename = "Muscle Gain")]
    MuscleGain,
    Endurance,
    #[serde(rename = "General Fitness")]
    GeneralFitness,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "Weight Loss",
            Goal::MuscleGain => "Muscle Gain",
            Goal::Endurance => "Endurance",
            Goal::GeneralFitness => "General Fitness",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Experience level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dietary preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dietary {
    #[serde(rename = "Non-Veg")]
    NonVeg,
    Veg,
    Vegan,
    Keto,
}

impl Dietary {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dietary::NonVeg => "Non-Veg",
            Dietary::Veg => "Veg",
            Dietary::Vegan => "Vegan",
            Dietary::Keto => "Keto",
        }
    }
}

impl fmt::Display for Dietary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fitness profile submitted for one generation request.
///
/// Age, gender, weight, and location are free-form and optional; the intake
/// form submits them as strings when it submits them at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub goal: Goal,
    pub level: Level,
    pub dietary: Dietary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Which external generation service answers a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    #[serde(alias = "gpt")]
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single generation request handed to a provider adapter.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The full instruction prompt
    pub prompt: String,
    /// Sampling temperature, provider default when unset
    pub temperature: Option<f32>,
    /// Output token cap, provider default when unset
    pub max_tokens: Option<u32>,
}

impl GenerationRequest {
    /// Create a new generation request from a prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The raw outcome of one provider call.
///
/// `text` is opaque at this point: it may or may not be the JSON the prompt
/// asked for, and may be wrapped in markdown fences. Normalization and
/// validation happen downstream.
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    pub text: String,
    /// The model that actually served the request
    pub model: String,
    pub usage: Option<Usage>,
}

/// Provider information
#[derive(Debug, Clone)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
}

/// Per-call context used to tag logs and traces.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub provider_id: String,
}

impl RequestContext {
    /// Create a new request context with a fresh request id
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            provider_id: provider_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_wire_labels() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "name": "Ana",
            "goal": "Weight Loss",
            "level": "Beginner",
            "dietary": "Veg"
        }))
        .unwrap();

        assert_eq!(profile.goal, Goal::WeightLoss);
        assert_eq!(profile.level, Level::Beginner);
        assert_eq!(profile.dietary, Dietary::Veg);
        assert!(profile.age.is_none());
        assert!(profile.location.is_none());
    }

    #[test]
    fn test_provider_kind_wire_values() {
        let gemini: ProviderKind = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(gemini, ProviderKind::Gemini);

        let openai: ProviderKind = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(openai, ProviderKind::OpenAi);

        // Legacy alias from early form revisions
        let gpt: ProviderKind = serde_json::from_str("\"gpt\"").unwrap();
        assert_eq!(gpt, ProviderKind::OpenAi);
    }

    #[test]
    fn test_generation_request_builders() {
        let req = GenerationRequest::new("hello")
            .with_temperature(0.2)
            .with_max_tokens(512);
        assert_eq!(req.prompt, "hello");
        assert_eq!(req.temperature, Some(0.2));
        assert_eq!(req.max_tokens, Some(512));
    }
}
