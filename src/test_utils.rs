//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Mock data factories for set records, metrics and catalogs
//! - A fixed reference clock so windowed analyses are deterministic
//! - Helper assertions

use crate::metrics::PerformanceMetrics;
use crate::models::{Exercise, Feedback, MuscleGroup, SetRecord};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Fixed "now" used by every windowed test
pub fn reference_now() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Create a DateTime N days before the reference clock
pub fn datetime_days_ago(days: i64) -> DateTime<Utc> {
  reference_now() - Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Create a single logged set without feedback
pub fn mock_set(
  exercise_id: &str,
  session_id: &str,
  weight: f64,
  reps: u32,
  rir: f64,
  target_rir: f64,
  days_ago: i64,
) -> SetRecord {
  SetRecord::new(
    exercise_id,
    session_id,
    0,
    weight,
    reps,
    rir,
    target_rir,
    datetime_days_ago(days_ago),
  )
}

/// Attach a feedback triple to a record
pub fn with_feedback(
  record: SetRecord,
  soreness: Option<u8>,
  pump: Option<u8>,
  joint_pain: Option<u8>,
) -> SetRecord {
  record.attach_feedback(Feedback {
    soreness,
    pump,
    joint_pain,
  })
}

/// Create `sets` identical sets for one session, a minute apart
pub fn mock_session(
  exercise_id: &str,
  session_id: &str,
  days_ago: i64,
  sets: u32,
  weight: f64,
  reps: u32,
  rir: f64,
  target_rir: f64,
) -> Vec<SetRecord> {
  (0..sets)
    .map(|i| {
      let mut record = mock_set(exercise_id, session_id, weight, reps, rir, target_rir, days_ago);
      record.set_index = i;
      record.performed_at = record.performed_at + Duration::minutes(i64::from(i));
      record
    })
    .collect()
}

/// Build metrics directly, keeping the deviation consistent with the averages
pub fn mock_metrics(
  avg_rir: f64,
  avg_target_rir: f64,
  avg_soreness: f64,
  avg_pump: f64,
  avg_joint_pain: f64,
  sessions_analyzed: usize,
) -> PerformanceMetrics {
  PerformanceMetrics {
    avg_rir,
    avg_target_rir,
    rir_deviation: avg_rir - avg_target_rir,
    avg_soreness,
    avg_pump,
    avg_joint_pain,
    sessions_analyzed,
  }
}

/// Small catalog covering compound and isolation movements
pub fn mock_catalog() -> Vec<Exercise> {
  vec![
    Exercise::new("barbell_squat", "Barbell Back Squat", MuscleGroup::Quadriceps),
    Exercise::new("leg_press", "Machine Leg Press", MuscleGroup::Quadriceps),
    Exercise::new("leg_extension", "Leg Extension", MuscleGroup::Quadriceps),
    Exercise::new("goblet_squat", "Dumbbell Goblet Squat", MuscleGroup::Quadriceps),
    Exercise::new("walking_lunge", "Walking Lunge", MuscleGroup::Quadriceps),
    Exercise::new("sissy_squat", "Sissy Squat", MuscleGroup::Quadriceps),
    Exercise::new("hack_squat", "Hack Squat", MuscleGroup::Quadriceps),
    Exercise::new("bench_press", "Barbell Bench Press", MuscleGroup::Chest),
    Exercise::new("cable_fly", "Cable Fly", MuscleGroup::Chest),
    Exercise::new("db_press", "Dumbbell Press", MuscleGroup::Chest),
    Exercise::new("push_up", "Push-Up", MuscleGroup::Chest),
    Exercise::new("barbell_curl", "Barbell Curl", MuscleGroup::Biceps),
  ]
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mock_session_creates_ordered_sets() {
    let sets = mock_session("squat", "s1", 2, 3, 100.0, 8, 2.0, 2.0);
    assert_eq!(sets.len(), 3);
    assert_eq!(sets[2].set_index, 2);
    assert!(sets[2].performed_at > sets[0].performed_at);
    assert!(sets.iter().all(|s| s.session_id == "s1"));
  }

  #[test]
  fn test_datetime_helpers_produce_correct_dates() {
    let diff = reference_now() - datetime_days_ago(7);
    assert_eq!(diff.num_days(), 7);
  }

  #[test]
  fn test_mock_metrics_keeps_deviation_consistent() {
    let metrics = mock_metrics(0.5, 2.0, 2.0, 4.0, 1.0, 3);
    assert_eq!(metrics.rir_deviation, -1.5);
  }
}
