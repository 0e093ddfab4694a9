//! Training-plan schedule context
//!
//! Places today inside the athlete's race build: plan week and day, training
//! phase, session focus, and the quality type preferred for this weekday.
//! When a Strava summary is available it overrides the manual training load
//! and last-quality inputs, so the context tracks what the athlete actually
//! did rather than what they planned.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::summary::ActivitySummary;
use crate::workout::QualityType;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

/// Latest week more than 15% above average reads as a load spike.
const LOAD_SPIKE_RATIO: f64 = 1.15;

/// Latest week under 75% of average reads as a lull.
const LOAD_DIP_RATIO: f64 = 0.75;

/// A quality session within the last two days keeps load classified high.
const FRESH_QUALITY_MAX_DAYS: i64 = 2;

/// Three or more quality sessions in the window is a high-load block.
const HIGH_QUALITY_COUNT: u32 = 3;

/// Three or fewer runs in the window is a low-load block.
const LOW_RECENT_RUNS: u32 = 3;

/// Days since the last quality session before another one is due.
const QUALITY_READY_MIN_DAYS: i64 = 5;

/// ---------------------------------------------------------------------------
/// Plan Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingLoad {
  Low,
  Moderate,
  High,
}

impl TrainingLoad {
  pub fn as_str(&self) -> &'static str {
    match self {
      TrainingLoad::Low => "low",
      TrainingLoad::Moderate => "moderate",
      TrainingLoad::High => "high",
    }
  }
}

impl fmt::Display for TrainingLoad {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Phase bands follow the default 16-week layout; weeks outside any band
/// read as Custom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
  Foundation,
  Build,
  Peak,
  Taper,
  Custom,
}

impl Phase {
  pub fn for_week(week: i64) -> Self {
    match week {
      1..=4 => Phase::Foundation,
      5..=10 => Phase::Build,
      11..=14 => Phase::Peak,
      15..=16 => Phase::Taper,
      _ => Phase::Custom,
    }
  }
}

/// Athlete-entered plan settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSettings {
  pub goal_type: String,
  pub race_date: NaiveDate,
  pub plan_length_weeks: u32,
  pub weekly_distance_km: f64,
  pub training_load: TrainingLoad,
  pub terrain: String,
  pub time_available_min: u32,
  pub last_quality_days: i64,
  /// Comma-separated weekday names, e.g. "monday,tuesday".
  pub interval_days: String,
  pub tempo_days: String,
  pub long_run_days: String,
}

/// Derived context for one day of the plan, including the composed request
/// strings the workout generator consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanContext {
  pub days_to_race: i64,
  pub week: i64,
  pub day: i64,
  pub day_name: String,
  pub phase: Phase,
  pub focus: String,
  pub training_load: TrainingLoad,
  pub last_quality_days: i64,
  pub preferred_quality_type: QualityType,
  pub goal: String,
  pub plan: String,
  pub preferences: String,
}

/// ---------------------------------------------------------------------------
/// Training Load Derivation
/// ---------------------------------------------------------------------------

/// Classify training load from the Strava summary. The latest weekly bucket
/// is the last entry of the oldest-to-newest distance series.
pub fn derive_training_load(summary: &ActivitySummary) -> TrainingLoad {
  let latest_week = summary.weekly_distances_km.last().copied().unwrap_or(0.0);
  let average_week = summary.weekly_average_km;
  let fresh_quality = summary
    .last_quality_days
    .map_or(false, |days| days <= FRESH_QUALITY_MAX_DAYS);

  if (average_week > 0.0 && latest_week > average_week * LOAD_SPIKE_RATIO)
    || fresh_quality
    || summary.quality_count >= HIGH_QUALITY_COUNT
  {
    return TrainingLoad::High;
  }

  if (average_week > 0.0 && latest_week < average_week * LOAD_DIP_RATIO)
    || summary.recent_runs <= LOW_RECENT_RUNS
  {
    return TrainingLoad::Low;
  }

  TrainingLoad::Moderate
}

/// ---------------------------------------------------------------------------
/// Day Preferences
/// ---------------------------------------------------------------------------

fn parse_day_preference(value: &str) -> Vec<String> {
  value
    .split(',')
    .map(|day| day.trim().to_lowercase())
    .filter(|day| !day.is_empty())
    .collect()
}

/// Quality type preferred for the given weekday name. Long runs take
/// precedence over tempo, tempo over intervals; unmapped days default to
/// tempo.
pub fn preferred_quality_type(settings: &PlanSettings, weekday: &str) -> QualityType {
  let day = weekday.to_lowercase();

  if parse_day_preference(&settings.long_run_days).contains(&day) {
    return QualityType::LongRun;
  }
  if parse_day_preference(&settings.tempo_days).contains(&day) {
    return QualityType::Tempo;
  }
  if parse_day_preference(&settings.interval_days).contains(&day) {
    return QualityType::Intervals;
  }

  QualityType::Tempo
}

fn focus_for(load: TrainingLoad, last_quality_days: i64) -> &'static str {
  if load == TrainingLoad::High {
    return "Recovery emphasis";
  }
  if last_quality_days >= QUALITY_READY_MIN_DAYS {
    return "Quality session ready";
  }
  "Aerobic development"
}

/// ---------------------------------------------------------------------------
/// Context Assembly
/// ---------------------------------------------------------------------------

/// Build the full plan context for `today`. A present summary overrides the
/// manual training load and last-quality inputs.
pub fn build_plan_context(
  settings: &PlanSettings,
  summary: Option<&ActivitySummary>,
  today: NaiveDate,
) -> PlanContext {
  let training_load = summary
    .map(derive_training_load)
    .unwrap_or(settings.training_load);
  let last_quality_days = summary
    .and_then(|s| s.last_quality_days)
    .unwrap_or(settings.last_quality_days);

  let days_to_race = (settings.race_date - today).num_days().max(0);
  let weeks_to_race = (days_to_race + 6) / 7;
  let plan_length = i64::from(settings.plan_length_weeks);
  let week = (plan_length - weeks_to_race + 1).max(1);
  // Day number bottoms out at zero when today is before the plan window.
  let day = (plan_length * 7 - days_to_race) % 7 + 1;
  let day_name = today.format("%A").to_string();
  let phase = Phase::for_week(week);
  let focus = focus_for(training_load, last_quality_days).to_string();
  let preferred = preferred_quality_type(settings, &day_name);

  let goal = format!("{} on {}", settings.goal_type, settings.race_date);
  let plan = format!(
    "Week {}, day {} ({}) of a {}-week plan.",
    week, day, day_name, settings.plan_length_weeks
  );
  let preferences = [
    format!("Terrain: {}", settings.terrain),
    format!("Time available: {} minutes", settings.time_available_min),
    format!("Effective load: {}", training_load),
    format!("Last quality: {} day(s) ago", last_quality_days),
    format!("Preferred quality type today: {}", preferred),
    format!(
      "Day mapping -> intervals: {}; tempo: {}; long run: {}",
      settings.interval_days, settings.tempo_days, settings.long_run_days
    ),
  ]
  .join(". ");

  PlanContext {
    days_to_race,
    week,
    day,
    day_name,
    phase,
    focus,
    training_load,
    last_quality_days,
    preferred_quality_type: preferred,
    goal,
    plan,
    preferences,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
