//! Deload week generation
//!
//! Derives a reduced-volume microcycle from the one that just finished. Reps
//! and RIR targets stay as prescribed; only set counts drop.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{ExercisePrescription, Microcycle};

/// Share of the original sets kept during a deload week
pub const DEFAULT_DELOAD_SET_FACTOR: f64 = 0.5;

const DELOAD_WEEK_DAYS: i64 = 7;

/// Week to be created after the source microcycle; not yet persisted, so no id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicrocycleDraft {
  pub mesocycle_id: String,
  pub week_number: u32,
  pub start_date: NaiveDate,
  pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeloadExercise {
  pub exercise_id: String,
  pub original_sets: u32,
  pub deload_sets: u32,
  pub percent_reduction: f64,
  pub target_reps: u32,
  pub target_rir: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeloadWeekPlan {
  pub source_microcycle_id: String,
  pub new_microcycle: MicrocycleDraft,
  pub exercises: Vec<DeloadExercise>,
  /// Over summed sets, not the mean of per-exercise percentages
  pub total_volume_reduction_pct: f64,
}

/// Build the deload week following `microcycle`
pub fn generate_deload_week(
  microcycle: &Microcycle,
  prescriptions: &[ExercisePrescription],
  set_factor: f64,
) -> DeloadWeekPlan {
  let start_date = microcycle.end_date + Duration::days(1);

  let exercises: Vec<DeloadExercise> = prescriptions
    .iter()
    .map(|p| {
      let deload_sets = deload_set_count(p.target_sets, set_factor);
      DeloadExercise {
        exercise_id: p.exercise_id.clone(),
        original_sets: p.target_sets,
        deload_sets,
        percent_reduction: reduction_pct(p.target_sets, deload_sets),
        target_reps: p.target_reps,
        target_rir: p.target_rir,
      }
    })
    .collect();

  let original_total: u32 = exercises.iter().map(|e| e.original_sets).sum();
  let deload_total: u32 = exercises.iter().map(|e| e.deload_sets).sum();
  let total_volume_reduction_pct = reduction_pct(original_total, deload_total);

  info!(
    source = %microcycle.id,
    exercises = exercises.len(),
    reduction_pct = total_volume_reduction_pct,
    "deload week generated"
  );

  DeloadWeekPlan {
    source_microcycle_id: microcycle.id.clone(),
    new_microcycle: MicrocycleDraft {
      mesocycle_id: microcycle.mesocycle_id.clone(),
      week_number: microcycle.week_number + 1,
      start_date,
      end_date: start_date + Duration::days(DELOAD_WEEK_DAYS),
    },
    exercises,
    total_volume_reduction_pct,
  }
}

/// round(original * factor), at least 1; an exercise with no sets stays at 0
fn deload_set_count(original: u32, factor: f64) -> u32 {
  if original == 0 {
    return 0;
  }
  let scaled = (f64::from(original) * factor).round();
  scaled.max(1.0) as u32
}

fn reduction_pct(original: u32, reduced: u32) -> f64 {
  if original == 0 {
    return 0.0;
  }
  (f64::from(original) - f64::from(reduced)) / f64::from(original) * 100.0
}
