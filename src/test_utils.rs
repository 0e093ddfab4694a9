//! Test utilities and helpers
//!
//! Shared fixtures for the module tests: a deterministic clock, Strava
//! activity builders, and canned summaries and plans.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::strava::StravaActivity;
use crate::summary::ActivitySummary;
use crate::workout::{Segment, WorkoutOption, WorkoutPlan};

/// Fixed reference clock so day and week bucketing stays deterministic.
pub fn fixed_now() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap()
}

/// A plain run `days` before the fixed clock. No speed, flag, or elevation,
/// so it never counts as a quality session unless a test sets those fields.
pub fn run_days_ago(days: i64, distance_m: f64) -> StravaActivity {
  StravaActivity {
    id: 1000 + days,
    name: format!("Morning Run {}", days),
    activity_type: "Run".to_string(),
    start_date: fixed_now() - Duration::days(days),
    distance: Some(distance_m),
    total_elevation_gain: None,
    average_speed: None,
    workout_type: None,
  }
}

/// Summary for a steady six-week block: averages hold, two quality sessions,
/// the most recent three days ago.
pub fn mock_summary() -> ActivitySummary {
  ActivitySummary {
    weekly_average_km: 42.0,
    weekly_distances_km: vec![38.0, 44.0, 42.0],
    recent_runs: 9,
    quality_count: 2,
    last_quality_days: Some(3),
    total_elevation_m: 540.0,
    total_distance_km: 126.0,
    average_pace_min_km: Some(5.4),
    fastest_pace_min_km: Some(4.35),
  }
}

/// A well-formed two-option plan of the shape the model is asked to emit.
pub fn mock_plan() -> WorkoutPlan {
  WorkoutPlan {
    easy_option: WorkoutOption {
      title: "Easy aerobic run".to_string(),
      details: "Run 10 km at a relaxed, fully conversational effort.".to_string(),
      target_pace: None,
      rpe: None,
      segments: vec![],
    },
    quality_option: WorkoutOption {
      title: "Hill repeats".to_string(),
      details: "10 min warm up, 8 x 60s uphill strong with walking rest, 10 min cool down"
        .to_string(),
      target_pace: Some("4:40-4:55 min/km".to_string()),
      rpe: Some("8".to_string()),
      segments: vec![
        Segment::new(
          "Warm-up",
          "10 min easy jogging, building gradually to a steady rhythm.",
        )
        .with_rpe("2-3"),
        Segment::new(
          "Hill repeats",
          "60s strong uphill effort. Take walking rest between hard repetitions.",
        )
        .with_rpe("8")
        .with_repeat(8),
        Segment::new("Cool down", "10 min easy jogging to finish, fully conversational.")
          .with_rpe("2"),
      ],
    },
    reasoning: vec!["Hills build strength while keeping impact manageable.".to_string()],
    warnings: vec![],
  }
}

/// Float comparison with a tolerance, default 1e-6.
#[macro_export]
macro_rules! assert_approx_eq {
  ($a:expr, $b:expr) => {
    $crate::assert_approx_eq!($a, $b, 1e-6)
  };
  ($a:expr, $b:expr, $eps:expr) => {{
    let (a, b) = ($a, $b);
    assert!(
      (a - b).abs() < $eps,
      "values differ: left {} right {} (tolerance {})",
      a,
      b,
      $eps
    );
  }};
}
