//! Environment-based server configuration.
//!
//! Configuration is environment-only: keys, models, and listen address all
//! come from the process environment, read once at startup. A provider
//! without a key is simply not constructed.

use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use fitcoach_core::ProviderKind;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_BIND: &str = "0.0.0.0";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Credentials and model selection for one provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    /// Overrides the adapter's default model when set
    pub model: Option<String>,
}

/// Full server configuration, read from the environment once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub default_provider: ProviderKind,
    pub request_timeout: Duration,
    pub gemini: Option<ProviderConfig>,
    pub openai: Option<ProviderConfig>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let bind = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND.to_string());

        let port = match env::var("PORT") {
            Ok(v) => v.parse().context("PORT must be a number")?,
            Err(_) => DEFAULT_PORT,
        };

        let default_provider = match env::var("FITCOACH_DEFAULT_PROVIDER") {
            Ok(v) => parse_provider(&v)?,
            Err(_) => ProviderKind::Gemini,
        };

        let request_timeout = match env::var("FITCOACH_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(
                v.parse().context("FITCOACH_TIMEOUT_SECS must be a number")?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        // GOOGLE_API_KEY is the name the original deployment used; keep it
        // working alongside the explicit GEMINI_API_KEY.
        let gemini = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .ok()
            .map(|api_key| ProviderConfig {
                api_key,
                model: env::var("GEMINI_MODEL").ok(),
            });

        let openai = env::var("OPENAI_API_KEY").ok().map(|api_key| ProviderConfig {
            api_key,
            model: env::var("OPENAI_MODEL").ok(),
        });

        Ok(Self {
            bind,
            port,
            default_provider,
            request_timeout,
            gemini,
            openai,
        })
    }
}

fn parse_provider(value: &str) -> Result<ProviderKind> {
    match value.to_ascii_lowercase().as_str() {
        "gemini" => Ok(ProviderKind::Gemini),
        "openai" | "gpt" => Ok(ProviderKind::OpenAi),
        other => bail!("unknown provider '{other}' (expected 'gemini' or 'openai')"),
    }
}
