use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single training week inside a mesocycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Microcycle {
  pub id: String,
  pub mesocycle_id: String,
  pub week_number: u32,
  pub start_date: NaiveDate,
  pub end_date: NaiveDate,
}

/// What the plan asks for on one exercise during a microcycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePrescription {
  pub exercise_id: String,
  pub target_sets: u32,
  pub target_reps: u32,
  pub target_rir: f64,
}
