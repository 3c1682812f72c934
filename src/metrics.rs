//! Deterministic aggregation of logged sets
//!
//! Reduces a sample of set records for one exercise into the summary
//! statistics every decision function downstream works from.

use serde::{Deserialize, Serialize};

use crate::models::set_record::{distinct_sessions, mean_present};
use crate::models::SetRecord;

/// ---------------------------------------------------------------------------
/// Performance Metrics
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
  pub avg_rir: f64,
  pub avg_target_rir: f64,

  /// avg_rir - avg_target_rir. Negative: sets ended closer to failure than prescribed
  pub rir_deviation: f64,

  /// Feedback averages over the records carrying that field, 0 when none do
  pub avg_soreness: f64,
  pub avg_pump: f64,
  pub avg_joint_pain: f64,

  /// Distinct session ids in the sample
  pub sessions_analyzed: usize,
}

impl PerformanceMetrics {
  /// Aggregate a sample of records. `None` for an empty sample.
  pub fn compute(records: &[SetRecord]) -> Option<Self> {
    if records.is_empty() {
      return None;
    }

    let n = records.len() as f64;
    let avg_rir = records.iter().map(|r| r.rir).sum::<f64>() / n;
    let avg_target_rir = records.iter().map(|r| r.target_rir).sum::<f64>() / n;

    let avg_soreness = mean_present(records.iter().map(SetRecord::soreness)).unwrap_or(0.0);
    let avg_pump = mean_present(records.iter().map(SetRecord::pump)).unwrap_or(0.0);
    let avg_joint_pain = mean_present(records.iter().map(SetRecord::joint_pain)).unwrap_or(0.0);

    Some(Self {
      avg_rir,
      avg_target_rir,
      rir_deviation: avg_rir - avg_target_rir,
      avg_soreness,
      avg_pump,
      avg_joint_pain,
      sessions_analyzed: distinct_sessions(records),
    })
  }

  /// Aggregate only the records of one exercise out of a mixed log
  pub fn for_exercise(records: &[SetRecord], exercise_id: &str) -> Option<Self> {
    let filtered: Vec<SetRecord> = records
      .iter()
      .filter(|r| r.exercise_id == exercise_id)
      .cloned()
      .collect();
    Self::compute(&filtered)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
