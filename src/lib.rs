//! Autoregulation and recovery analytics over logged strength-training sets
//!
//! Every analysis is a pure function of the log (plus an explicit `now` for
//! the windowed ones). Too little data yields `None` rather than an error.

pub mod analysis;
pub mod config;
pub mod deload_plan;
pub mod error;
pub mod fatigue;
pub mod injury;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod progression;
pub mod rotation;
pub mod volume;

#[cfg(test)]
mod test_utils;

pub use analysis::{CoachingReport, ExerciseReport};
pub use config::EngineSettings;
pub use deload_plan::{generate_deload_week, DeloadWeekPlan};
pub use error::{ConfigError, ParseError};
pub use fatigue::{compute_fatigue_index, recommend_deload, FatigueWindow};
pub use injury::{assess_injury_risk, scan_injury_risks, suggest_substitutes};
pub use metrics::PerformanceMetrics;
pub use models::{Confidence, Exercise, ExercisePrescription, Microcycle, MuscleGroup, SetRecord};
pub use progression::recommend_progression;
pub use rotation::{classify_movement, find_substitutes, rotation_advice};
pub use volume::recommend_sets;
