//! API operations
//!
//! The three operations behind the HTTP surface: generate today's workout,
//! sync Strava history into a summary, and derive plan context. Generation
//! degrades to the deterministic fallback planner whenever the model is
//! unavailable or unusable; only genuine upstream API errors surface to the
//! client.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AiConfig;
use crate::llm::{ChatClient, LlmError};
use crate::planner::derive_fallback_plan;
use crate::prompt::{build_workout_prompt, SYSTEM_PROMPT};
use crate::sanitize::sanitize_plan;
use crate::schedule::{build_plan_context, PlanContext, PlanSettings};
use crate::strava::{fetch_activities, refresh_access_token, StravaConfig, StravaError};
use crate::summary::{summarize_activities, ActivitySummary};
use crate::workout::{QualityType, WorkoutPlan};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

/// History window for the weekly summary, six full weeks.
pub const HISTORY_LOOKBACK_DAYS: i64 = 42;

/// Upper bound on activities pulled per sync.
pub const HISTORY_MAX_ACTIVITIES: u32 = 60;

/// Source label for plans produced without the model.
pub const SOURCE_FALLBACK: &str = "fallback";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ApiError {
  #[error("Missing required inputs.")]
  MissingInputs,

  #[error("Missing Strava credentials.")]
  MissingCredentials,

  /// An upstream API answered with an error; its status and body pass
  /// through to the client unchanged.
  #[error("{message}")]
  Upstream { status: u16, message: String },

  #[error("{0}")]
  Internal(String),
}

impl ApiError {
  pub fn status_code(&self) -> u16 {
    match self {
      ApiError::MissingInputs => 400,
      ApiError::MissingCredentials => 500,
      ApiError::Upstream { status, .. } => *status,
      ApiError::Internal(_) => 500,
    }
  }
}

impl From<StravaError> for ApiError {
  fn from(e: StravaError) -> Self {
    match e {
      StravaError::MissingConfig(_) => ApiError::MissingCredentials,
      StravaError::Api { status, message } => ApiError::Upstream { status, message },
      other => ApiError::Internal(other.to_string()),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Wire Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
  #[serde(default)]
  pub goal: String,
  #[serde(default)]
  pub plan: String,
  #[serde(default)]
  pub preferences: String,
  pub summary: Option<ActivitySummary>,
  pub preferred_quality_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
  pub workout: WorkoutPlan,
  pub source: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
  pub summary: ActivitySummary,
  pub activities_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanContextRequest {
  pub settings: PlanSettings,
  pub summary: Option<ActivitySummary>,
  /// Override for deterministic context; defaults to the current date.
  pub today: Option<chrono::NaiveDate>,
}

/// ---------------------------------------------------------------------------
/// Workout Generation
/// ---------------------------------------------------------------------------

/// Generate today's easy and quality options. A missing API key, a timed-out
/// call, or unusable model output all produce the fallback plan with a 200;
/// an upstream error status passes through.
pub async fn generate_workout(
  ai: &AiConfig,
  request: GenerateRequest,
) -> Result<GenerateResponse, ApiError> {
  if request.goal.is_empty() || request.plan.is_empty() {
    return Err(ApiError::MissingInputs);
  }
  let summary = request.summary.ok_or(ApiError::MissingInputs)?;
  let preferred = QualityType::parse(request.preferred_quality_type.as_deref().unwrap_or_default());

  let Some(client) = ChatClient::from_config(ai) else {
    info!("no AI key configured, serving fallback plan");
    return Ok(GenerateResponse {
      workout: derive_fallback_plan(&summary, preferred),
      source: SOURCE_FALLBACK,
    });
  };

  let prompt = build_workout_prompt(
    &request.goal,
    &request.plan,
    &request.preferences,
    preferred,
    &summary,
  );

  match client.generate_workout_plan(SYSTEM_PROMPT, &prompt).await {
    Ok(plan) => Ok(GenerateResponse {
      workout: sanitize_plan(&plan),
      source: ai.provider_label(),
    }),
    Err(LlmError::Timeout) => {
      warn!("model call timed out, serving fallback plan");
      Ok(GenerateResponse {
        workout: derive_fallback_plan(&summary, preferred),
        source: SOURCE_FALLBACK,
      })
    }
    Err(LlmError::Parse(e)) => {
      warn!("model output unusable ({}), serving fallback plan", e);
      Ok(GenerateResponse {
        workout: derive_fallback_plan(&summary, preferred),
        source: SOURCE_FALLBACK,
      })
    }
    Err(LlmError::Api { status, message }) => Err(ApiError::Upstream { status, message }),
    Err(LlmError::Request(message)) => Err(ApiError::Internal(message)),
  }
}

/// ---------------------------------------------------------------------------
/// History Sync
/// ---------------------------------------------------------------------------

/// Refresh the Strava token, pull the recent window of activities, and fold
/// them into a training summary.
pub async fn sync_history(strava: Option<&StravaConfig>) -> Result<SyncResponse, ApiError> {
  let config = strava.ok_or(ApiError::MissingCredentials)?;

  let tokens = refresh_access_token(config).await?;
  let now = Utc::now();
  let after = (now - Duration::days(HISTORY_LOOKBACK_DAYS)).timestamp();
  let activities =
    fetch_activities(config, &tokens.access_token, Some(after), HISTORY_MAX_ACTIVITIES).await?;

  let summary = summarize_activities(&activities, now);
  info!(activities = activities.len(), "synced Strava history");

  Ok(SyncResponse {
    activities_count: activities.len(),
    summary,
  })
}

/// ---------------------------------------------------------------------------
/// Plan Context
/// ---------------------------------------------------------------------------

/// Derive the schedule context for today (or a supplied date).
pub fn plan_context(request: PlanContextRequest) -> PlanContext {
  let today = request.today.unwrap_or_else(|| Utc::now().date_naive());
  build_plan_context(&request.settings, request.summary.as_ref(), today)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
