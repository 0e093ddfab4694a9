//! Strava integration for activity history
//!
//! This service runs headless with a pre-authorized refresh token, so the
//! OAuth surface is the refresh grant only: mint a short-lived access token,
//! fetch recent activities, done. Nothing is stored between requests.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const STRAVA_TOKEN_URL: &str = "https://www.strava.com/api/v3/oauth/token";
pub const STRAVA_API_BASE: &str = "https://www.strava.com/api/v3";

/// Upstream calls are bounded; a hung fetch fails the sync request instead of
/// blocking it indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StravaConfig {
  pub client_id: String,
  pub client_secret: String,
  pub refresh_token: String,
  pub token_url: String,
  pub api_base: String,
}

impl StravaConfig {
  pub fn from_env() -> Result<Self, StravaError> {
    Ok(Self {
      client_id: std::env::var("STRAVA_CLIENT_ID")
        .map_err(|_| StravaError::MissingConfig("STRAVA_CLIENT_ID".into()))?,
      client_secret: std::env::var("STRAVA_CLIENT_SECRET")
        .map_err(|_| StravaError::MissingConfig("STRAVA_CLIENT_SECRET".into()))?,
      refresh_token: std::env::var("STRAVA_REFRESH_TOKEN")
        .map_err(|_| StravaError::MissingConfig("STRAVA_REFRESH_TOKEN".into()))?,
      token_url: STRAVA_TOKEN_URL.to_string(),
      api_base: STRAVA_API_BASE.to_string(),
    })
  }
}

/// Response from the Strava token endpoint
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
  #[serde(default)]
  pub expires_at: Option<i64>,
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StravaError {
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Strava token error: {0}")]
  Token(String),

  #[error("Strava API error {status}: {message}")]
  Api { status: u16, message: String },

  #[error("Failed to parse Strava response: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Activity Records
/// ---------------------------------------------------------------------------

/// Activity summary record from the Strava list endpoint. Only the fields the
/// summarizer reads; everything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StravaActivity {
  pub id: i64,
  pub name: String,
  /// Strava uses "type" for legacy and "sport_type" for newer activities
  #[serde(rename = "type", default)]
  pub activity_type: String,
  pub start_date: DateTime<Utc>,
  #[serde(default)]
  pub distance: Option<f64>,
  #[serde(default)]
  pub total_elevation_gain: Option<f64>,
  /// Meters per second over the whole activity.
  #[serde(default)]
  pub average_speed: Option<f64>,
  /// Strava marks structured hard runs with workout_type 1.
  #[serde(default)]
  pub workout_type: Option<i64>,
}

/// ---------------------------------------------------------------------------
/// Token Refresh
/// ---------------------------------------------------------------------------

/// Mint a fresh access token from the configured refresh token.
pub async fn refresh_access_token(config: &StravaConfig) -> Result<TokenResponse, StravaError> {
  let client = Client::new();

  let response = client
    .post(&config.token_url)
    .timeout(REQUEST_TIMEOUT)
    .form(&[
      ("client_id", config.client_id.as_str()),
      ("client_secret", config.client_secret.as_str()),
      ("refresh_token", config.refresh_token.as_str()),
      ("grant_type", "refresh_token"),
    ])
    .send()
    .await?;

  if !response.status().is_success() {
    let error_text = response.text().await.unwrap_or_default();
    return Err(StravaError::Token(error_text));
  }

  let tokens: TokenResponse = response.json().await?;

  if let Some(expires_at) = tokens.expires_at {
    let remaining = expires_at - Utc::now().timestamp();
    debug!(remaining_seconds = remaining, "refreshed Strava access token");
  }

  Ok(tokens)
}

/// ---------------------------------------------------------------------------
/// Activity Fetching
/// ---------------------------------------------------------------------------

/// Fetch recent activities, newest first, optionally bounded by an epoch
/// `after` timestamp.
pub async fn fetch_activities(
  config: &StravaConfig,
  access_token: &str,
  after: Option<i64>,
  per_page: u32,
) -> Result<Vec<StravaActivity>, StravaError> {
  let client = Client::new();

  let mut url = Url::parse(&format!("{}/athlete/activities", config.api_base))
    .map_err(|e| StravaError::Parse(e.to_string()))?;
  url
    .query_pairs_mut()
    .append_pair("per_page", &per_page.to_string());
  if let Some(after_timestamp) = after {
    url
      .query_pairs_mut()
      .append_pair("after", &after_timestamp.to_string());
  }

  let response = client
    .get(url)
    .timeout(REQUEST_TIMEOUT)
    .bearer_auth(access_token)
    .send()
    .await?;

  if !response.status().is_success() {
    let status = response.status().as_u16();
    let error_text = response.text().await.unwrap_or_default();
    return Err(StravaError::Api {
      status,
      message: error_text,
    });
  }

  // Get raw text first so parse failures can be diagnosed
  let response_text = response.text().await?;

  let activities: Vec<StravaActivity> = serde_json::from_str(&response_text).map_err(|e| {
    warn!(
      "failed to parse Strava activities: {} (first 500 chars: {})",
      e,
      &response_text[..response_text.len().min(500)]
    );
    StravaError::Parse(e.to_string())
  })?;

  debug!(count = activities.len(), "fetched Strava activities");

  Ok(activities)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  fn test_config(server_url: &str) -> StravaConfig {
    StravaConfig {
      client_id: "12345".to_string(),
      client_secret: "secret".to_string(),
      refresh_token: "refresh".to_string(),
      token_url: format!("{}/oauth/token", server_url),
      api_base: server_url.to_string(),
    }
  }

  #[tokio::test]
  async fn test_refresh_access_token_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/oauth/token")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"access_token": "fresh-token", "expires_at": 9999999999}"#)
      .create_async()
      .await;

    let config = test_config(&server.url());
    let tokens = refresh_access_token(&config)
      .await
      .expect("refresh should succeed");

    assert_eq!(tokens.access_token, "fresh-token");
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_refresh_access_token_failure_carries_body() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", "/oauth/token")
      .with_status(401)
      .with_body(r#"{"message": "invalid refresh token"}"#)
      .create_async()
      .await;

    let config = test_config(&server.url());
    let err = refresh_access_token(&config)
      .await
      .expect_err("refresh should fail");

    match err {
      StravaError::Token(message) => assert!(message.contains("invalid refresh token")),
      other => panic!("expected Token error, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_fetch_activities_builds_query_and_parses() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", "/athlete/activities")
      .match_query(mockito::Matcher::AllOf(vec![
        mockito::Matcher::UrlEncoded("per_page".into(), "60".into()),
        mockito::Matcher::UrlEncoded("after".into(), "1700000000".into()),
      ]))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(
        r#"[{
          "id": 101,
          "name": "Morning Run",
          "type": "Run",
          "start_date": "2026-08-20T06:30:00Z",
          "distance": 10000.0,
          "total_elevation_gain": 85.0,
          "average_speed": 3.2,
          "workout_type": 0
        }]"#,
      )
      .create_async()
      .await;

    let config = test_config(&server.url());
    let activities = fetch_activities(&config, "token", Some(1_700_000_000), 60)
      .await
      .expect("fetch should succeed");

    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].activity_type, "Run");
    assert_eq!(activities[0].distance, Some(10000.0));
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_fetch_activities_non_success_surfaces_status() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/athlete/activities")
      .match_query(mockito::Matcher::Any)
      .with_status(429)
      .with_body("Rate Limit Exceeded")
      .create_async()
      .await;

    let config = test_config(&server.url());
    let err = fetch_activities(&config, "token", None, 60)
      .await
      .expect_err("fetch should fail");

    match err {
      StravaError::Api { status, message } => {
        assert_eq!(status, 429);
        assert!(message.contains("Rate Limit"));
      }
      other => panic!("expected Api error, got {:?}", other),
    }
  }

  #[test]
  fn test_activity_tolerates_sparse_payload() {
    // Manual entries can miss speed, elevation, and workout_type entirely.
    let activity: StravaActivity = serde_json::from_str(
      r#"{"id": 7, "name": "Track session", "type": "Run", "start_date": "2026-08-18T18:00:00Z"}"#,
    )
    .expect("sparse activity should deserialize");

    assert!(activity.distance.is_none());
    assert!(activity.average_speed.is_none());
    assert!(activity.workout_type.is_none());
  }
}
