//! Activity summarizer
//!
//! Reduces a raw list of Strava activities to the aggregate training-load
//! signals the planner and prompt both consume: weekly distance buckets over
//! a trailing six-week window, quality-session counts, elevation, and pace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::strava::StravaActivity;

/// ---------------------------------------------------------------------------
/// Constants
/// ---------------------------------------------------------------------------

/// 3.8 m/s is roughly 4:23 min/km; a whole run averaging at or above this
/// counts as sustained tempo-or-faster effort. Fixed empirical constant.
pub const QUALITY_SPEED_THRESHOLD_MPS: f64 = 3.8;

/// Strava marks structured hard runs with workout_type 1.
const STRAVA_HARD_WORKOUT_FLAG: i64 = 1;

const WEEKLY_BUCKET_LIMIT: usize = 6;

/// ---------------------------------------------------------------------------
/// Summary Structure
/// ---------------------------------------------------------------------------

/// Aggregated training-load signals over the trailing six-week window.
/// Wire format is camelCase; every field tolerates being absent on input so
/// partially populated client summaries still parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivitySummary {
  pub weekly_average_km: f64,
  /// Oldest to newest; the last entry is the most recent week.
  pub weekly_distances_km: Vec<f64>,
  pub recent_runs: u32,
  pub quality_count: u32,
  /// None when no quality session exists in the window.
  #[serde(deserialize_with = "lenient_days")]
  pub last_quality_days: Option<i64>,
  pub total_elevation_m: f64,
  pub total_distance_km: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub average_pace_min_km: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fastest_pace_min_km: Option<f64>,
}

/// Accepts a number, a numeric string, or the legacy "N/A" sentinel.
fn lenient_days<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
  D: serde::Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Raw {
    Int(i64),
    Float(f64),
    Text(String),
  }

  let raw: Option<Raw> = Option::deserialize(deserializer)?;
  Ok(match raw {
    Some(Raw::Int(days)) => Some(days),
    Some(Raw::Float(days)) if days.is_finite() => Some(days as i64),
    Some(Raw::Text(text)) => text.trim().parse::<i64>().ok(),
    _ => None,
  })
}

/// ---------------------------------------------------------------------------
/// Summarization
/// ---------------------------------------------------------------------------

/// Build an ActivitySummary from raw activities. Zero runs is a valid input
/// and produces a zeroed summary, not an error.
pub fn summarize_activities(activities: &[StravaActivity], now: DateTime<Utc>) -> ActivitySummary {
  let runs: Vec<&StravaActivity> = activities
    .iter()
    .filter(|a| a.activity_type == "Run")
    .collect();

  let mut weekly_buckets: BTreeMap<i64, f64> = BTreeMap::new();
  let mut quality_count: u32 = 0;
  let mut last_quality_days: Option<i64> = None;
  let mut total_elevation = 0.0;
  let mut total_distance_m = 0.0;
  let mut pace_sum = 0.0;
  let mut pace_samples: u32 = 0;
  let mut fastest_pace: Option<f64> = None;

  for activity in &runs {
    let days_ago = (now - activity.start_date).num_days();
    let weeks_ago = days_ago.div_euclid(7);
    let distance = activity.distance.unwrap_or(0.0);

    *weekly_buckets.entry(weeks_ago).or_insert(0.0) += distance;
    total_distance_m += distance;
    total_elevation += activity.total_elevation_gain.unwrap_or(0.0);

    let speed = activity.average_speed.unwrap_or(0.0);
    if speed > 0.0 {
      let pace = mps_to_min_per_km(speed);
      pace_sum += pace;
      pace_samples += 1;
      fastest_pace = Some(match fastest_pace {
        Some(best) if best < pace => best,
        _ => pace,
      });
    }

    let is_quality =
      activity.workout_type == Some(STRAVA_HARD_WORKOUT_FLAG) || speed >= QUALITY_SPEED_THRESHOLD_MPS;
    if is_quality {
      quality_count += 1;
      last_quality_days = Some(match last_quality_days {
        Some(days) if days < days_ago => days,
        _ => days_ago,
      });
    }
  }

  // Buckets sort ascending by weeks-ago, so the first six are the most
  // recent; reverse to emit oldest -> newest.
  let mut weekly_distances_km: Vec<f64> = weekly_buckets
    .values()
    .take(WEEKLY_BUCKET_LIMIT)
    .map(|meters| meters / 1000.0)
    .collect();
  weekly_distances_km.reverse();

  let weekly_average_km = if weekly_distances_km.is_empty() {
    0.0
  } else {
    weekly_distances_km.iter().sum::<f64>() / weekly_distances_km.len() as f64
  };

  ActivitySummary {
    weekly_average_km: round1(weekly_average_km),
    weekly_distances_km: weekly_distances_km.into_iter().map(round1).collect(),
    recent_runs: runs.len() as u32,
    quality_count,
    last_quality_days,
    total_elevation_m: total_elevation.round(),
    total_distance_km: round1(total_distance_m / 1000.0),
    average_pace_min_km: (pace_samples > 0).then(|| round2(pace_sum / pace_samples as f64)),
    fastest_pace_min_km: fastest_pace.map(round2),
  }
}

pub fn mps_to_min_per_km(speed: f64) -> f64 {
  (1000.0 / speed) / 60.0
}

fn round1(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
