//! Deterministic fallback planner
//!
//! Rule-based backup for the generative path. Sizes an easy day from the
//! trailing training load and pairs it with a canned quality template,
//! explaining each choice in plain language. Never fails.

use crate::summary::ActivitySummary;
use crate::templates::quality_template;
use crate::workout::{QualityType, WorkoutOption, WorkoutPlan};

/// ---------------------------------------------------------------------------
/// Sizing Constants
/// ---------------------------------------------------------------------------

/// An easy day nominally consumes about a quarter of weekly volume.
const EASY_VOLUME_FRACTION: f64 = 0.24;
const MIN_EASY_KM: f64 = 5.0;
const MAX_EASY_KM: f64 = 18.0;

/// Quality session within the last day: suppress volume while fatigue clears.
const RECOVERY_SUPPRESS_FACTOR: f64 = 0.85;
/// Four or more days since quality: room to absorb a little more.
const RECOVERY_ABSORB_FACTOR: f64 = 1.08;
const RECOVERY_SUPPRESS_MAX_DAYS: i64 = 1;
const RECOVERY_ABSORB_MIN_DAYS: i64 = 4;

/// Recent week spiked above trend: pull back. Dipped below: restore.
const TREND_SPIKE_RATIO: f64 = 1.15;
const TREND_DIP_RATIO: f64 = 0.9;
const TREND_SPIKE_FACTOR: f64 = 0.92;
const TREND_DIP_FACTOR: f64 = 1.05;

/// ---------------------------------------------------------------------------
/// Easy-Distance Computation
/// ---------------------------------------------------------------------------

struct TrendInputs {
  recent_week_km: f64,
  trend_ratio: f64,
}

fn trend_inputs(summary: &ActivitySummary) -> TrendInputs {
  let distances = &summary.weekly_distances_km;
  let recent_week_km = distances
    .last()
    .copied()
    .unwrap_or(summary.weekly_average_km);
  let prior_week_km = if distances.len() >= 2 {
    distances[distances.len() - 2]
  } else {
    recent_week_km
  };
  let trend_ratio = if prior_week_km > 0.0 {
    recent_week_km / prior_week_km
  } else {
    1.0
  };

  TrendInputs {
    recent_week_km,
    trend_ratio,
  }
}

fn recovery_adjustment(last_quality_days: Option<i64>) -> f64 {
  match last_quality_days {
    Some(days) if days <= RECOVERY_SUPPRESS_MAX_DAYS => RECOVERY_SUPPRESS_FACTOR,
    Some(days) if days >= RECOVERY_ABSORB_MIN_DAYS => RECOVERY_ABSORB_FACTOR,
    _ => 1.0,
  }
}

fn trend_adjustment(trend_ratio: f64) -> f64 {
  if trend_ratio >= TREND_SPIKE_RATIO {
    TREND_SPIKE_FACTOR
  } else if trend_ratio <= TREND_DIP_RATIO {
    TREND_DIP_FACTOR
  } else {
    1.0
  }
}

/// Easy-run distance from load signals: a quarter of weekly volume floored at
/// 5 km, adjusted for recovery timing and weekly trend, clamped to [5, 18] km
/// and rounded to the nearest 0.5.
pub fn compute_fallback_easy_distance_km(summary: &ActivitySummary) -> f64 {
  let trend = trend_inputs(summary);
  let base_distance_km = (summary.weekly_average_km * EASY_VOLUME_FRACTION).max(MIN_EASY_KM);

  let distance = base_distance_km
    * recovery_adjustment(summary.last_quality_days)
    * trend_adjustment(trend.trend_ratio);

  let clamped = distance.clamp(MIN_EASY_KM, MAX_EASY_KM);
  (clamped * 2.0).round() / 2.0
}

/// ---------------------------------------------------------------------------
/// Plan Derivation
/// ---------------------------------------------------------------------------

/// Build the full two-option fallback plan. The easy option follows the
/// strict schema: a single distance-and-effort sentence, no pace or RPE.
pub fn derive_fallback_plan(summary: &ActivitySummary, preferred: QualityType) -> WorkoutPlan {
  let distance_km = compute_fallback_easy_distance_km(summary);
  let trend = trend_inputs(summary);
  let quality = quality_template(preferred);

  let easy = WorkoutOption {
    title: "Easy aerobic run".to_string(),
    details: format!(
      "Run {} km at a relaxed, fully conversational effort.",
      format_km(distance_km)
    ),
    target_pace: None,
    rpe: None,
    segments: vec![],
  };

  let mut reasoning = vec![format!(
    "Weekly average is {} km with {} km in the most recent week, so an easy day of {} km fits the current load.",
    format_km(summary.weekly_average_km),
    format_km(trend.recent_week_km),
    format_km(distance_km)
  )];

  if trend.trend_ratio >= TREND_SPIKE_RATIO {
    reasoning.push(format!(
      "Volume spiked versus the prior week (ratio {:.2}), so the easy day is trimmed.",
      trend.trend_ratio
    ));
  } else if trend.trend_ratio <= TREND_DIP_RATIO {
    reasoning.push(format!(
      "Volume dipped versus the prior week (ratio {:.2}), so a little distance is restored.",
      trend.trend_ratio
    ));
  }

  reasoning.push(match summary.last_quality_days {
    Some(days) if days <= RECOVERY_SUPPRESS_MAX_DAYS => format!(
      "Last quality session was {} day(s) ago; easy volume is reduced while that load clears.",
      days
    ),
    Some(days) if days >= RECOVERY_ABSORB_MIN_DAYS => format!(
      "Last quality session was {} days ago, leaving room for a slightly longer easy day.",
      days
    ),
    Some(days) => format!("Last quality session was {} days ago; holding steady volume.", days),
    None => "No recent quality session on record; holding steady volume.".to_string(),
  });

  reasoning.push(format!(
    "Quality pick: {} ({}).",
    preferred, quality.title
  ));

  let warnings = if trend.trend_ratio >= TREND_SPIKE_RATIO {
    vec![format!(
      "Weekly distance jumped {:.0}% above the prior week; keep the quality session controlled.",
      (trend.trend_ratio - 1.0) * 100.0
    )]
  } else {
    vec![]
  };

  WorkoutPlan {
    easy_option: easy,
    quality_option: quality,
    reasoning,
    warnings,
  }
}

fn format_km(km: f64) -> String {
  if km.fract() == 0.0 {
    format!("{}", km as i64)
  } else {
    format!("{:.1}", km)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::mock_summary;

  fn summary_with(
    weekly_average_km: f64,
    weekly_distances_km: Vec<f64>,
    last_quality_days: Option<i64>,
  ) -> ActivitySummary {
    ActivitySummary {
      weekly_average_km,
      weekly_distances_km,
      last_quality_days,
      ..mock_summary()
    }
  }

  #[test]
  fn test_worked_example_exact_arithmetic() {
    // 48 * 0.24 = 11.52, recovery x1.08 = 12.4416, rounds to 12.5.
    let summary = summary_with(48.0, vec![50.0], Some(4));
    assert_eq!(compute_fallback_easy_distance_km(&summary), 12.5);
  }

  #[test]
  fn test_distance_always_within_bounds_and_half_km_steps() {
    let averages = [0.0, 3.0, 10.0, 21.0, 48.0, 75.0, 120.0];
    let distance_sets: [Vec<f64>; 4] =
      [vec![], vec![40.0], vec![40.0, 52.0], vec![52.0, 36.0]];
    let quality_days = [None, Some(0), Some(1), Some(2), Some(3), Some(4), Some(12)];

    for &avg in &averages {
      for distances in &distance_sets {
        for &days in &quality_days {
          let summary = summary_with(avg, distances.clone(), days);
          let km = compute_fallback_easy_distance_km(&summary);

          assert!((5.0..=18.0).contains(&km), "out of bounds: {}", km);
          assert_eq!((km * 2.0).fract(), 0.0, "not a half-km step: {}", km);
        }
      }
    }
  }

  #[test]
  fn test_recovery_suppression_is_monotonic() {
    // In the unclamped region, quality yesterday must yield strictly less
    // distance than quality two or three days ago.
    let fresh = summary_with(48.0, vec![48.0], Some(1));
    let mid = summary_with(48.0, vec![48.0], Some(2));

    assert!(
      compute_fallback_easy_distance_km(&fresh) < compute_fallback_easy_distance_km(&mid)
    );
  }

  #[test]
  fn test_unknown_last_quality_takes_neutral_branch() {
    let unknown = summary_with(48.0, vec![48.0], None);
    let mid = summary_with(48.0, vec![48.0], Some(2));

    assert_eq!(
      compute_fallback_easy_distance_km(&unknown),
      compute_fallback_easy_distance_km(&mid)
    );
  }

  #[test]
  fn test_spike_pulls_distance_back() {
    // Ratio 50/40 = 1.25: 40 * 0.24 * 0.92 = 8.832, rounds to 9.
    let summary = summary_with(40.0, vec![40.0, 50.0], Some(2));
    assert_eq!(compute_fallback_easy_distance_km(&summary), 9.0);
  }

  #[test]
  fn test_dip_restores_distance() {
    // Ratio 30/40 = 0.75: 40 * 0.24 * 1.05 = 10.08, rounds to 10.
    let summary = summary_with(40.0, vec![40.0, 30.0], Some(2));
    assert_eq!(compute_fallback_easy_distance_km(&summary), 10.0);
  }

  #[test]
  fn test_floor_and_ceiling_clamps() {
    let tiny = summary_with(8.0, vec![8.0], Some(2));
    assert_eq!(compute_fallback_easy_distance_km(&tiny), 5.0);

    let huge = summary_with(110.0, vec![110.0], Some(2));
    assert_eq!(compute_fallback_easy_distance_km(&huge), 18.0);
  }

  #[test]
  fn test_zero_prior_week_is_a_neutral_trend() {
    let summary = summary_with(30.0, vec![0.0, 24.0], Some(2));
    // 30 * 0.24 = 7.2, no trend adjustment applies.
    assert_eq!(compute_fallback_easy_distance_km(&summary), 7.0);
  }

  #[test]
  fn test_plan_is_always_structurally_valid() {
    let summary = summary_with(0.0, vec![], None);
    let plan = derive_fallback_plan(&summary, QualityType::Tempo);

    assert!(!plan.easy_option.details.is_empty());
    assert!(plan.easy_option.target_pace.is_none());
    assert!(plan.easy_option.rpe.is_none());
    assert!(!plan.quality_option.segments.is_empty());
    assert!(!plan.reasoning.is_empty());
  }

  #[test]
  fn test_unrecognized_preference_resolves_to_tempo() {
    let summary = summary_with(40.0, vec![40.0], Some(3));
    let plan = derive_fallback_plan(&summary, QualityType::parse("fartlek"));

    assert_eq!(plan.quality_option.title, "Tempo run");
  }

  #[test]
  fn test_reasoning_cites_computed_values() {
    let summary = summary_with(48.0, vec![50.0], Some(4));
    let plan = derive_fallback_plan(&summary, QualityType::Intervals);

    let joined = plan.reasoning.join(" ");
    assert!(joined.contains("48 km"), "cites weekly average: {}", joined);
    assert!(joined.contains("12.5 km"), "cites computed distance: {}", joined);
    assert!(joined.contains("4 days ago"), "cites recovery timing: {}", joined);
    assert!(joined.contains("intervals"), "cites selected category: {}", joined);
  }

  #[test]
  fn test_spike_emits_a_warning() {
    let spiked = summary_with(40.0, vec![40.0, 50.0], Some(2));
    let plan = derive_fallback_plan(&spiked, QualityType::Tempo);
    assert_eq!(plan.warnings.len(), 1);
    assert!(plan.warnings[0].contains("25%"));

    let steady = summary_with(40.0, vec![40.0, 41.0], Some(2));
    let plan = derive_fallback_plan(&steady, QualityType::Tempo);
    assert!(plan.warnings.is_empty());
  }
}
