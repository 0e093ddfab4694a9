//! Environment-backed configuration
//!
//! All runtime settings come from the process environment (optionally via a
//! .env file loaded at startup). The AI settings are deliberately lenient: a
//! missing key is a valid state that routes every request to the fallback
//! planner instead of failing.

use std::env;
use url::Url;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_PORT: u16 = 8787;

/// ---------------------------------------------------------------------------
/// AI Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AiConfig {
  pub api_key: Option<String>,
  pub base_url: String,
  pub model: String,
}

impl AiConfig {
  /// Read AI settings from the environment. Never fails; a missing or blank
  /// GROQ_API_KEY selects the fallback planner downstream.
  pub fn from_env() -> Self {
    let api_key = env::var("GROQ_API_KEY")
      .ok()
      .filter(|key| !key.trim().is_empty());
    let base_url = env::var("GROQ_BASE_URL")
      .ok()
      .filter(|value| !value.trim().is_empty())
      .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
      .trim_end_matches('/')
      .to_string();
    let model = env::var("GROQ_MODEL")
      .ok()
      .filter(|value| !value.trim().is_empty())
      .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    Self {
      api_key,
      base_url,
      model,
    }
  }

  /// Label reported to clients as the workout source. Decided by the endpoint
  /// host, not the path, so Groq's /openai/v1 path still reads as "groq".
  pub fn provider_label(&self) -> &'static str {
    let openai_host = Url::parse(&self.base_url)
      .ok()
      .and_then(|url| url.host_str().map(|host| host.contains("openai")))
      .unwrap_or(false);
    if openai_host {
      "openai"
    } else {
      "groq"
    }
  }
}

/// Port for the HTTP listener, PORT env var or the default.
pub fn server_port() -> u16 {
  env::var("PORT")
    .ok()
    .and_then(|value| value.parse().ok())
    .unwrap_or(DEFAULT_PORT)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
