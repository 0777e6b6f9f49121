//! fitcoach server binary.
//!
//! Reads configuration from the environment, constructs the provider
//! adapters the deployment has keys for, and serves the plan-generation
//! API until interrupted.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod config;
mod routes;

use config::ServerConfig;
use fitcoach_core::layer::Layer;
use fitcoach_core::{PlanExecutor, ProviderKind};
use fitcoach_layer::LoggingLayer;
use fitcoach_provider::{GeminiProvider, OpenAiProvider};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let mut builder = PlanExecutor::builder().timeout(config.request_timeout);

    if let Some(gemini) = &config.gemini {
        let mut provider_builder = GeminiProvider::builder()
            .api_key(&gemini.api_key)
            .timeout(config.request_timeout);
        if let Some(model) = &gemini.model {
            provider_builder = provider_builder.model(model);
        }
        let provider = provider_builder.build()?;
        builder = builder.register(ProviderKind::Gemini, LoggingLayer::new().layer(provider));
        tracing::info!("gemini provider configured");
    } else {
        tracing::warn!("GEMINI_API_KEY not set; gemini provider disabled");
    }

    if let Some(openai) = &config.openai {
        let mut provider_builder = OpenAiProvider::builder().api_key(&openai.api_key);
        if let Some(model) = &openai.model {
            provider_builder = provider_builder.model(model);
        }
        let provider = provider_builder.build()?;
        builder = builder.register(ProviderKind::OpenAi, LoggingLayer::new().layer(provider));
        tracing::info!("openai provider configured");
    } else {
        tracing::warn!("OPENAI_API_KEY not set; openai provider disabled");
    }

    let executor = builder.finish();
    if executor.configured().is_empty() {
        tracing::warn!("no generation providers configured; every plan request will fail");
    }

    let state = Arc::new(routes::AppState {
        executor,
        default_provider: config.default_provider,
    });
    let app = routes::build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port).parse()?;
    tracing::info!("fitcoach listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("fitcoach shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install ctrl-c handler");
    }
}
