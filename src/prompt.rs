//! Prompt composer
//!
//! Builds the instruction block for the chat-completion call: athlete goal
//! and plan timing, the Strava summary, pace guidance, a strict output
//! schema, and worked examples. The schema is deliberately asymmetric: the
//! easy option is one conversational sentence with no pace or reps, the
//! quality option is always fully structured with paces and efforts.

use crate::summary::ActivitySummary;
use crate::workout::QualityType;

pub const SYSTEM_PROMPT: &str = "You are a running coach and exercise scientist.";

const PACE_GUIDANCE: &str = "\
Pace guidance rules:
- Easy pace should usually be ~8-18% slower than average pace and feel conversational (RPE 2-4).
- Tempo/threshold reps should usually be between average pace and up to 8% faster, based on fatigue.
- Faster interval reps can be up to ~12-20% faster than average pace, but only if load is manageable.
- If weekly load is high or the last quality session was <2 days ago, reduce intensity and volume.
- Hard repetitions (RPE 7+) recover with walking rest, not jogging.";

const STRUCTURE_RULES: &str = "\
Structure rules:
- The easy option is a single conversational sentence: distance and effort only. Never give it a pace target, reps, or segments.
- The quality option always has explicit segments: a Warm-up first, the main work, a Cool down last, each with a pace range and an RPE.";

const OUTPUT_SCHEMA: &str = r#"Output JSON only, no markdown, using exactly this schema:
{
  "easy_option": {
    "title": "...",
    "details": "One sentence: distance and conversational effort.",
    "segments": []
  },
  "quality_option": {
    "title": "...",
    "target_pace": "... min/km or range",
    "rpe": "6-9",
    "details": "One-line summary of the session",
    "segments": [
      {"name": "Warm-up", "instruction": "...", "target_pace": "... min/km", "rpe": "2-3", "workout_type": "RUN"},
      {"name": "Intervals", "instruction": "...", "target_pace": "... min/km", "rpe": "8-9", "repeat": 6, "workout_type": "RUN"},
      {"name": "Cool down", "instruction": "...", "target_pace": "... min/km", "rpe": "2", "workout_type": "RUN"}
    ]
  },
  "reasoning": ["...", "...", "..."],
  "warnings": ["..."]
}"#;

const QUALITY_EXAMPLES: &str = r#"Good quality examples:
1) Easy progression:
"10 min warm up, 35 min easy @ 5:35-5:55/km (RPE 3), 4 x 20s relaxed strides, 8 min cool down"
2) Hill quality:
"2 km warm up, 10 x 60s uphill @ RPE 8 (walking rest recovery), 10 min cool down"
3) Tempo quality:
"15 min warm up, 4 x 8 min @ 4:55-5:05/km (walking rest between reps), 10 min cool down""#;

/// Compose the full user prompt for a generation request.
pub fn build_workout_prompt(
  goal: &str,
  plan: &str,
  preferences: &str,
  preferred_quality_type: QualityType,
  summary: &ActivitySummary,
) -> String {
  format!(
    "You are an elite distance running coach writing workouts in a Runna-like style.\n\
     Create two options for today: an easy option and a quality option.\n\
     Use evidence-based training progression, avoid unsafe load spikes, and match the session to time availability.\n\
     \n\
     Goal: {goal}\n\
     Plan timing: {plan}\n\
     Preferences: {preferences}\n\
     Preferred quality type today: {preferred_quality_type}\n\
     \n\
     {summary_block}\n\
     \n\
     {PACE_GUIDANCE}\n\
     \n\
     {STRUCTURE_RULES}\n\
     \n\
     {OUTPUT_SCHEMA}\n\
     \n\
     {QUALITY_EXAMPLES}",
    summary_block = summary_block(summary),
  )
}

fn summary_block(summary: &ActivitySummary) -> String {
  let weekly_distances = summary
    .weekly_distances_km
    .iter()
    .map(|km| km.to_string())
    .collect::<Vec<_>>()
    .join(", ");

  format!(
    "Recent training summary from Strava:\n\
     - Weekly average: {} km\n\
     - Recent runs: {}\n\
     - Quality sessions: {} (last {} days ago)\n\
     - Elevation in last 6 weeks: {} m\n\
     - Weekly distances: {} km\n\
     - Average pace over 6 weeks: {} min/km\n\
     - Fastest recent pace: {} min/km",
    summary.weekly_average_km,
    summary.recent_runs,
    summary.quality_count,
    days_or_na(summary.last_quality_days),
    summary.total_elevation_m,
    weekly_distances,
    pace_or_na(summary.average_pace_min_km),
    pace_or_na(summary.fastest_pace_min_km),
  )
}

fn days_or_na(days: Option<i64>) -> String {
  days.map_or_else(|| "N/A".to_string(), |d| d.to_string())
}

fn pace_or_na(pace: Option<f64>) -> String {
  pace.map_or_else(|| "N/A".to_string(), |p| p.to_string())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
