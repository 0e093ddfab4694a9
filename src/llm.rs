//! Chat-completion client for workout generation
//!
//! Talks to any OpenAI-compatible chat API (Groq by default) and turns the
//! assistant's reply into a WorkoutPlan. One shot, bounded by a timeout, no
//! retries: every failure class maps onto the caller's fallback policy.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::AiConfig;
use crate::workout::WorkoutPlan;

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Low-variance output keeps the JSON schema intact.
const TEMPERATURE: f32 = 0.4;

/// A hung model call degrades to the fallback planner instead of blocking
/// the request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum LlmError {
  #[error("Request timed out")]
  Timeout,

  #[error("Request failed: {0}")]
  Request(String),

  #[error("API error {status}: {message}")]
  Api { status: u16, message: String },

  #[error("Parse error: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Chat API Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest {
  model: String,
  messages: Vec<ChatMessage>,
  temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
  role: String,
  content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  #[serde(default)]
  choices: Vec<ChatChoice>,
  #[serde(default)]
  usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
  message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
  content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
  #[serde(default)]
  prompt_tokens: u32,
  #[serde(default)]
  completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatErrorResponse {
  error: ChatErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ChatErrorDetail {
  message: String,
}

/// ---------------------------------------------------------------------------
/// Chat Client
/// ---------------------------------------------------------------------------

pub struct ChatClient {
  client: Client,
  api_key: String,
  base_url: String,
  model: String,
}

impl ChatClient {
  /// Build a client from config. None when no API key is configured, which
  /// is the defined fallback trigger rather than an error.
  pub fn from_config(config: &AiConfig) -> Option<Self> {
    let api_key = config.api_key.clone()?;
    Some(Self {
      client: Client::new(),
      api_key,
      base_url: config.base_url.clone(),
      model: config.model.clone(),
    })
  }

  /// Single chat-completion round trip. Returns the raw assistant content;
  /// an empty string when the response carries no message text.
  pub async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, LlmError> {
    let request = ChatRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessage {
          role: "system".to_string(),
          content: system_prompt.to_string(),
        },
        ChatMessage {
          role: "user".to_string(),
          content: user_message.to_string(),
        },
      ],
      temperature: TEMPERATURE,
    };

    let response = self
      .client
      .post(format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH))
      .timeout(REQUEST_TIMEOUT)
      .bearer_auth(&self.api_key)
      .json(&request)
      .send()
      .await
      .map_err(|e| {
        if e.is_timeout() {
          LlmError::Timeout
        } else {
          LlmError::Request(e.to_string())
        }
      })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| {
      if e.is_timeout() {
        LlmError::Timeout
      } else {
        LlmError::Request(e.to_string())
      }
    })?;

    if !status.is_success() {
      // Surface the structured message when the API sends one, raw body otherwise
      let message = match serde_json::from_str::<ChatErrorResponse>(&body) {
        Ok(error_resp) => error_resp.error.message,
        Err(_) => body,
      };
      return Err(LlmError::Api {
        status: status.as_u16(),
        message,
      });
    }

    let chat_response: ChatResponse =
      serde_json::from_str(&body).map_err(|e| LlmError::Request(format!("invalid response body: {}", e)))?;

    if let Some(usage) = &chat_response.usage {
      debug!(
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        "chat completion usage"
      );
    }

    Ok(
      chat_response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default(),
    )
  }

  /// Full generation round trip: complete, extract, and parse a WorkoutPlan.
  pub async fn generate_workout_plan(
    &self,
    system_prompt: &str,
    user_prompt: &str,
  ) -> Result<WorkoutPlan, LlmError> {
    let content = self.complete(system_prompt, user_prompt).await?;
    parse_workout_plan(&content)
  }
}

/// Parse the assistant content into a WorkoutPlan.
pub fn parse_workout_plan(content: &str) -> Result<WorkoutPlan, LlmError> {
  let json_str = extract_json(content)?;
  serde_json::from_str(&json_str).map_err(|e| LlmError::Parse(e.to_string()))
}

/// Extract JSON from model output (tolerates markdown code fences)
fn extract_json(text: &str) -> Result<String, LlmError> {
  // Try direct parse first
  if text.trim().starts_with('{') {
    return Ok(text.trim().to_string());
  }

  // Look for JSON in code blocks
  if let Some(start) = text.find("```json") {
    let start = start + 7;
    if let Some(end) = text[start..].find("```") {
      return Ok(text[start..start + end].trim().to_string());
    }
  }

  // Look for plain code blocks
  if let Some(start) = text.find("```") {
    let start = start + 3;
    // Skip language identifier if present
    let content_start = text[start..]
      .find('\n')
      .map(|i| start + i + 1)
      .unwrap_or(start);
    if let Some(end) = text[content_start..].find("```") {
      return Ok(text[content_start..content_start + end].trim().to_string());
    }
  }

  // Last resort: find first { to last }
  if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
    return Ok(text[start..=end].to_string());
  }

  Err(LlmError::Parse("Could not extract JSON from response".to_string()))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
