//! run-coach: daily training-run planner
//!
//! Syncs recent Strava history into a training summary, asks a chat model for
//! today's easy and quality session, and falls back to a deterministic coach
//! when the model is missing, slow, or off-script.

pub mod config;
pub mod handlers;
pub mod llm;
pub mod planner;
pub mod prompt;
pub mod sanitize;
pub mod schedule;
pub mod server;
pub mod strava;
pub mod summary;
pub mod templates;
pub mod workout;

#[cfg(test)]
pub mod test_utils;
