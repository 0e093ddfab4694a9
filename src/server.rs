//! HTTP surface
//!
//! Thin axum layer over the handlers: three JSON routes and the error-to-
//! response mapping. All domain behavior lives in the handler functions, so
//! this module stays wiring only.

use axum::{
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{get, post},
  Json, Router,
};
use std::sync::Arc;

use crate::config::AiConfig;
use crate::handlers::{self, ApiError, GenerateRequest, PlanContextRequest};
use crate::strava::StravaConfig;

/// Shared state behind the routes. Strava credentials are optional; the
/// history route answers with an error when they are absent.
pub struct AppState {
  pub ai: AiConfig,
  pub strava: Option<StravaConfig>,
}

impl AppState {
  pub fn from_env() -> Self {
    let strava = match StravaConfig::from_env() {
      Ok(config) => Some(config),
      Err(e) => {
        tracing::warn!("Strava disabled: {}", e);
        None
      }
    };
    Self {
      ai: AiConfig::from_env(),
      strava,
    }
  }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/api/ai-workout", post(ai_workout))
    .route("/api/strava-history", get(strava_history))
    .route("/api/plan-context", post(plan_context))
    .with_state(state)
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status =
      StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = Json(serde_json::json!({ "error": self.to_string() }));
    (status, body).into_response()
  }
}

async fn ai_workout(
  State(state): State<Arc<AppState>>,
  Json(request): Json<GenerateRequest>,
) -> Result<Response, ApiError> {
  let response = handlers::generate_workout(&state.ai, request).await?;
  Ok((StatusCode::OK, Json(response)).into_response())
}

async fn strava_history(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
  let response = handlers::sync_history(state.strava.as_ref()).await?;
  Ok((StatusCode::OK, Json(response)).into_response())
}

async fn plan_context(Json(request): Json<PlanContextRequest>) -> Response {
  let context = handlers::plan_context(request);
  (StatusCode::OK, Json(context)).into_response()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use axum::body::{to_bytes, Body};
  use axum::http::{header, Method, Request};
  use tower::ServiceExt;

  fn test_state() -> Arc<AppState> {
    Arc::new(AppState {
      ai: AiConfig {
        api_key: None,
        base_url: "https://api.groq.com/openai/v1".to_string(),
        model: "llama-3.1-8b-instant".to_string(),
      },
      strava: None,
    })
  }

  async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
  ) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(value) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(value.to_string())
      }
      None => Body::empty(),
    };
    let request = builder.body(body).expect("request builds");

    let response = app.oneshot(request).await.expect("request executes");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
      .await
      .expect("body reads");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
  }

  fn generate_body() -> serde_json::Value {
    serde_json::json!({
      "goal": "Hilly trail marathon on 2024-05-31",
      "plan": "Week 13, day 4 (Monday) of a 16-week plan.",
      "preferences": "Terrain: mixed. Time available: 60 minutes",
      "preferredQualityType": "tempo",
      "summary": {
        "weeklyAverageKm": 42.0,
        "weeklyDistancesKm": [38.0, 44.0, 42.0],
        "recentRuns": 9,
        "qualityCount": 2,
        "lastQualityDays": 3,
        "totalElevationM": 540.0,
        "totalDistanceKm": 126.0
      }
    })
  }

  #[tokio::test]
  async fn test_ai_workout_serves_fallback_without_key() {
    let app = router(test_state());
    let (status, json) = send(app, Method::POST, "/api/ai-workout", Some(generate_body())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "fallback");
    assert_eq!(json["workout"]["easy_option"]["title"], "Easy aerobic run");
    assert_eq!(json["workout"]["quality_option"]["title"], "Tempo run");
  }

  #[tokio::test]
  async fn test_ai_workout_rejects_missing_inputs() {
    let app = router(test_state());
    let body = serde_json::json!({ "goal": "", "plan": "", "summary": null });
    let (status, json) = send(app, Method::POST, "/api/ai-workout", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing required inputs.");
  }

  #[tokio::test]
  async fn test_strava_history_without_credentials() {
    let app = router(test_state());
    let (status, json) = send(app, Method::GET, "/api/strava-history", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Missing Strava credentials.");
  }

  #[tokio::test]
  async fn test_plan_context_route() {
    let app = router(test_state());
    let body = serde_json::json!({
      "settings": {
        "goalType": "Hilly trail marathon",
        "raceDate": "2024-05-31",
        "planLengthWeeks": 16,
        "weeklyDistanceKm": 48.0,
        "trainingLoad": "moderate",
        "terrain": "mixed",
        "timeAvailableMin": 60,
        "lastQualityDays": 4,
        "intervalDays": "monday,tuesday,wednesday",
        "tempoDays": "wednesday,thursday,friday",
        "longRunDays": "saturday,sunday"
      },
      "today": "2024-05-06"
    });
    let (status, json) = send(app, Method::POST, "/api/plan-context", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["week"], 13);
    assert_eq!(json["dayName"], "Monday");
    assert_eq!(json["phase"], "Peak");
    assert_eq!(json["preferredQualityType"], "intervals");
  }

  #[tokio::test]
  async fn test_malformed_json_is_rejected() {
    let app = router(test_state());
    let request = Request::builder()
      .method(Method::POST)
      .uri("/api/ai-workout")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("not json"))
      .expect("request builds");

    let response = app.oneshot(request).await.expect("request executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  }
}
