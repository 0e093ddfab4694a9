//! Workout plan wire types
//!
//! The two-option daily plan (easy + quality) exchanged with the model API
//! and returned to clients. Field names are the wire contract: snake_case
//! throughout, optional fields omitted when absent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ---------------------------------------------------------------------------
/// Quality Session Categories
/// ---------------------------------------------------------------------------

/// The three quality-session archetypes the template library knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityType {
  #[serde(rename = "intervals")]
  Intervals,
  #[serde(rename = "tempo")]
  Tempo,
  #[serde(rename = "long run")]
  LongRun,
}

impl QualityType {
  /// Total parse: anything unrecognized resolves to tempo.
  pub fn parse(value: &str) -> Self {
    match value.trim().to_lowercase().as_str() {
      "intervals" => QualityType::Intervals,
      "long run" => QualityType::LongRun,
      _ => QualityType::Tempo,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      QualityType::Intervals => "intervals",
      QualityType::Tempo => "tempo",
      QualityType::LongRun => "long run",
    }
  }
}

impl fmt::Display for QualityType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// ---------------------------------------------------------------------------
/// Plan Structures
/// ---------------------------------------------------------------------------

/// One named block of a structured session (warm-up, main set, cool-down).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
  pub name: String,
  pub instruction: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub target_pace: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rpe: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub repeat: Option<u32>,
  #[serde(default = "default_workout_type")]
  pub workout_type: String,
}

fn default_workout_type() -> String {
  "RUN".to_string()
}

impl Segment {
  pub fn new(name: &str, instruction: &str) -> Self {
    Self {
      name: name.to_string(),
      instruction: instruction.to_string(),
      target_pace: None,
      rpe: None,
      repeat: None,
      workout_type: default_workout_type(),
    }
  }

  pub fn with_pace(mut self, pace: &str) -> Self {
    self.target_pace = Some(pace.to_string());
    self
  }

  pub fn with_rpe(mut self, rpe: &str) -> Self {
    self.rpe = Some(rpe.to_string());
    self
  }

  pub fn with_repeat(mut self, count: u32) -> Self {
    self.repeat = Some(count);
    self
  }
}

/// One prescribed session. Easy options carry a single-sentence `details`
/// and no pace or RPE strings; quality options carry all of it plus segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutOption {
  pub title: String,
  pub details: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub target_pace: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rpe: Option<String>,
  #[serde(default)]
  pub segments: Vec<Segment>,
}

/// Top-level generation result: the two options plus coach commentary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
  pub easy_option: WorkoutOption,
  pub quality_option: WorkoutOption,
  #[serde(default)]
  pub reasoning: Vec<String>,
  #[serde(default)]
  pub warnings: Vec<String>,
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
