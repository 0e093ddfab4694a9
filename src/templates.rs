//! Workout template library
//!
//! Static catalog of quality-session archetypes. Each template is a fully
//! structured warm-up / main-set / cool-down sequence with pace ranges and
//! effort ratings for a reasonably trained recreational runner. This catalog
//! is the deterministic source of truth whenever the generative path is
//! unavailable.

use crate::workout::{QualityType, Segment, WorkoutOption};

/// Look up the canned quality session for a category. Total by construction:
/// `QualityType::parse` already maps unknown categories to tempo.
pub fn quality_template(kind: QualityType) -> WorkoutOption {
  match kind {
    QualityType::Intervals => intervals_template(),
    QualityType::Tempo => tempo_template(),
    QualityType::LongRun => long_run_template(),
  }
}

/// Convenience lookup from a free-text category name.
pub fn template_for(name: &str) -> WorkoutOption {
  quality_template(QualityType::parse(name))
}

fn intervals_template() -> WorkoutOption {
  WorkoutOption {
    title: "VO2max intervals".to_string(),
    details: "6 x 3 min at 5K effort with walking rest between repetitions.".to_string(),
    target_pace: Some("4:25-4:40 min/km".to_string()),
    rpe: Some("8-9".to_string()),
    segments: vec![
      Segment::new("Warm-up", "15 min easy jogging, loosening up gradually.")
        .with_pace("5:45-6:10 min/km")
        .with_rpe("2-3"),
      Segment::new("Strides", "20 s relaxed strides with full recovery walk back.")
        .with_rpe("5")
        .with_repeat(4),
      Segment::new("Intervals", "3 min at 5K effort. Walking rest for 90 s between repetitions.")
        .with_pace("4:25-4:40 min/km")
        .with_rpe("8-9")
        .with_repeat(6),
      Segment::new("Cool down", "10 min easy jogging, fully conversational.")
        .with_pace("5:50-6:20 min/km")
        .with_rpe("2"),
    ],
  }
}

fn tempo_template() -> WorkoutOption {
  WorkoutOption {
    title: "Tempo run".to_string(),
    details: "20 min comfortably hard running bracketed by easy jogging.".to_string(),
    target_pace: Some("4:55-5:10 min/km".to_string()),
    rpe: Some("6-7".to_string()),
    segments: vec![
      Segment::new("Warm-up", "15 min easy jogging, building to steady by the end.")
        .with_pace("5:45-6:10 min/km")
        .with_rpe("2-3"),
      Segment::new("Tempo", "20 min continuous at a comfortably hard, controlled effort.")
        .with_pace("4:55-5:10 min/km")
        .with_rpe("6-7"),
      Segment::new("Cool down", "10 min easy jogging, fully conversational.")
        .with_pace("5:50-6:20 min/km")
        .with_rpe("2"),
    ],
  }
}

fn long_run_template() -> WorkoutOption {
  WorkoutOption {
    title: "Long run with steady finish".to_string(),
    details: "Relaxed long run, lifting to a steady effort over the final 15 minutes.".to_string(),
    target_pace: Some("5:35-6:00 min/km".to_string()),
    rpe: Some("3-5".to_string()),
    segments: vec![
      Segment::new("Warm-up", "First 15 min very easy while the legs settle in.")
        .with_pace("6:00-6:20 min/km")
        .with_rpe("2"),
      Segment::new("Steady miles", "Relaxed aerobic running, conversational throughout.")
        .with_pace("5:35-6:00 min/km")
        .with_rpe("3-4"),
      Segment::new("Steady finish", "Final 15 min at a steady, purposeful effort.")
        .with_pace("5:10-5:25 min/km")
        .with_rpe("5"),
      Segment::new("Cool down", "5 min easy jogging to finish, fully conversational.")
        .with_rpe("2"),
    ],
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
