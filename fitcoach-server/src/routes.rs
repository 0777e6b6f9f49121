//! HTTP routes and error mapping.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use fitcoach_core::{FitnessPlan, PlanError, PlanExecutor, ProviderKind, UserProfile};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

pub struct AppState {
    pub executor: PlanExecutor,
    pub default_provider: ProviderKind,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    /// Map a pipeline failure to the uniform error contract.
    ///
    /// Every generation failure is a 500 with an `{ "error": ... }` body.
    /// Blocked requests get their own message; everything else a generic
    /// one naming the provider tried.
    pub fn generation(provider: ProviderKind, err: &PlanError) -> Self {
        let message = match err {
            PlanError::ContentBlocked(_) => "Blocked by safety settings.".to_string(),
            _ => format!("Failed to generate plan ({provider})."),
        };
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request/response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Provider selector; server default when omitted
    #[serde(default)]
    pub model: Option<ProviderKind>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateImageResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/generate-plan", post(generate_plan))
        .route("/api/generate-image", post(generate_image))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn generate_plan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GeneratePlanRequest>,
) -> Result<Json<FitnessPlan>, AppError> {
    let provider = req.model.unwrap_or(state.default_provider);
    tracing::info!(
        user = %req.profile.name,
        goal = %req.profile.goal,
        %provider,
        "generating plan"
    );

    match state.executor.generate_plan(&req.profile, provider).await {
        Ok(plan) => Ok(Json(plan)),
        Err(err) => {
            tracing::error!(%provider, error = %err, "plan generation failed");
            Err(AppError::generation(provider, &err))
        }
    }
}

const IMAGE_PROMPT_SUFFIX: &str = " fitness gym realistic lighting";

/// Build an illustration URL for a plan section.
///
/// Pure passthrough: the image host renders on fetch, so no outbound call
/// happens here.
async fn generate_image(
    Json(req): Json<GenerateImageRequest>,
) -> Result<Json<GenerateImageResponse>, AppError> {
    let prompt = req
        .prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::bad_request("Prompt is required"))?;

    let full_prompt = format!("{prompt}{IMAGE_PROMPT_SUFFIX}");
    let image_url = format!(
        "https://image.pollinations.ai/prompt/{}",
        urlencoding::encode(&full_prompt)
    );

    Ok(Json(GenerateImageResponse { image_url }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
