//! AI response sanitizer
//!
//! The model returns structurally valid JSON more often than it returns a
//! complete workout: bookend segments go missing, and hard sessions come
//! back with jogging recoveries instead of walking rest. This module
//! rewrites the quality option's segment list to restore those invariants.
//! Every rule is idempotent and all other plan fields pass through verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::workout::{Segment, WorkoutOption, WorkoutPlan};

/// ---------------------------------------------------------------------------
/// Pattern Sets
/// ---------------------------------------------------------------------------

/// Matches: Warm-up, warm up, Warmup
static WARM_UP_NAME: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)warm[\s-]?up").expect("warm-up pattern compiles"));

/// Matches: Cool-down, cool down, Cooldown
static COOL_DOWN_NAME: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)cool[\s-]?down").expect("cool-down pattern compiles"));

/// Word list for hard-session detection. Prefix matching covers the plural
/// and derived forms (intervals, hills, repeats, repetitions, maximal).
static HARD_SESSION_WORDS: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?i)\b(interval|hill|rep|repetition|vo2|max|speed)")
    .expect("hard-session pattern compiles")
});

/// Numeric tokens inside an RPE string ("8", "8-9", "7.5/10").
static RPE_NUMBER: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("rpe pattern compiles"));

/// Matches: rest, rests, recover, recovery, recoveries
static REST_MENTION: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)\b(rest|recover)").expect("rest pattern compiles"));

static WALKING_REST: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)walking rest").expect("walking-rest pattern compiles"));

/// "easy jog recovery" or "jog recovery", replaced wholesale.
static JOG_RECOVERY: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)(?:easy\s+)?jog\s+recovery").expect("jog-recovery pattern compiles"));

/// An RPE token at or above 7 marks the session as genuinely hard.
const HARD_RPE_THRESHOLD: f64 = 7.0;

/// ---------------------------------------------------------------------------
/// Default Bookends
/// ---------------------------------------------------------------------------

fn default_warm_up() -> Segment {
  Segment::new("Warm-up", "10 min easy jogging, building gradually to a steady rhythm.")
    .with_rpe("2-3")
}

fn default_cool_down() -> Segment {
  Segment::new("Cool down", "10 min easy jogging to finish, fully conversational.").with_rpe("2")
}

/// ---------------------------------------------------------------------------
/// Classification
/// ---------------------------------------------------------------------------

fn rpe_reaches_hard(rpe: Option<&str>) -> bool {
  let Some(text) = rpe else {
    return false;
  };
  RPE_NUMBER
    .find_iter(text)
    .any(|token| token.as_str().parse::<f64>().map_or(false, |v| v >= HARD_RPE_THRESHOLD))
}

fn is_hard_session(option: &WorkoutOption) -> bool {
  rpe_reaches_hard(option.rpe.as_deref())
    || HARD_SESSION_WORDS.is_match(&option.title)
    || HARD_SESSION_WORDS.is_match(&option.details)
}

fn is_bookend(segment: &Segment) -> bool {
  WARM_UP_NAME.is_match(&segment.name) || COOL_DOWN_NAME.is_match(&segment.name)
}

/// ---------------------------------------------------------------------------
/// Sanitization
/// ---------------------------------------------------------------------------

/// Produce a sanitized copy of a plan. Only the quality option's segment list
/// changes; the input is left untouched.
pub fn sanitize_plan(plan: &WorkoutPlan) -> WorkoutPlan {
  let mut sanitized = plan.clone();
  sanitized.quality_option.segments = sanitize_quality_segments(&plan.quality_option);
  sanitized
}

fn sanitize_quality_segments(option: &WorkoutOption) -> Vec<Segment> {
  let mut segments = option.segments.clone();

  // A prose-only quality option (details but no structure) seeds one main
  // segment so the bookends wrap something.
  if segments.is_empty() && !option.details.trim().is_empty() {
    let mut seed = Segment::new("Session", option.details.trim());
    seed.target_pace = option.target_pace.clone();
    seed.rpe = option.rpe.clone();
    segments.push(seed);
  }

  if !segments.iter().any(|s| WARM_UP_NAME.is_match(&s.name)) {
    segments.insert(0, default_warm_up());
  }
  if !segments.iter().any(|s| COOL_DOWN_NAME.is_match(&s.name)) {
    segments.push(default_cool_down());
  }

  let hard = is_hard_session(option);

  for segment in &mut segments {
    // Hard sessions recover at a walk, never a jog.
    if hard
      && REST_MENTION.is_match(&segment.instruction)
      && !WALKING_REST.is_match(&segment.instruction)
    {
      if JOG_RECOVERY.is_match(&segment.instruction) {
        segment.instruction = JOG_RECOVERY
          .replace_all(&segment.instruction, "walking rest recovery")
          .into_owned();
      } else {
        segment.instruction = format!(
          "{} Take walking rest between hard repetitions.",
          segment.instruction.trim_end()
        );
      }
    }

    // Bookend segments must carry easy effort language.
    let lower = segment.instruction.to_lowercase();
    if is_bookend(segment) && !lower.contains("easy") && !lower.contains("conversational") {
      segment.instruction = format!(
        "{} Keep the effort easy and conversational.",
        segment.instruction.trim_end()
      );
    }
  }

  segments
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
