//! Set-volume autoregulation
//!
//! Decides how many working sets to prescribe next for an exercise from its
//! aggregated performance metrics. Rules are evaluated top to bottom and the
//! first rule whose guard matches decides; later rules assume earlier guards
//! failed, so the table order is part of the contract.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::metrics::PerformanceMetrics;
use crate::models::{Confidence, SetRecord};

/// Never add more than this many sets in one recommendation
pub const MAX_SET_INCREASE: i32 = 2;

/// Sessions needed before volume is adjusted at all
pub const MIN_SESSIONS: usize = 2;

/// ---------------------------------------------------------------------------
/// Set Recommendation
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecommendation {
  pub current_sets: u32,
  /// Always at least 1
  pub recommended_sets: u32,
  /// recommended_sets - current_sets
  pub change: i32,
  pub rationale: String,
  pub confidence: Confidence,
}

/// Recovery signals derived from the metrics
#[derive(Debug, Clone, Copy)]
struct Signals<'a> {
  metrics: &'a PerformanceMetrics,
  weeks_since_last_increase: u32,
  has_recovery_issues: bool,
  has_good_recovery: bool,
  has_good_pump: bool,
}

impl<'a> Signals<'a> {
  fn new(metrics: &'a PerformanceMetrics, weeks_since_last_increase: u32) -> Self {
    Self {
      metrics,
      weeks_since_last_increase,
      has_recovery_issues: metrics.avg_soreness >= 4.0 || metrics.avg_joint_pain >= 3.0,
      has_good_recovery: metrics.avg_soreness <= 2.0 && metrics.avg_joint_pain <= 1.0,
      has_good_pump: metrics.avg_pump >= 4.0,
    }
  }
}

struct Outcome {
  change: i32,
  confidence: Confidence,
  rationale: String,
}

impl Outcome {
  fn new(change: i32, confidence: Confidence, rationale: impl Into<String>) -> Self {
    Self {
      change,
      confidence,
      rationale: rationale.into(),
    }
  }
}

struct VolumeRule {
  name: &'static str,
  guard: fn(&Signals) -> bool,
  decide: fn(&Signals) -> Outcome,
}

/// ---------------------------------------------------------------------------
/// Decision Table
/// ---------------------------------------------------------------------------

const VOLUME_RULES: &[VolumeRule] = &[
  VolumeRule {
    name: "insufficient_data",
    guard: |s| s.metrics.sessions_analyzed < MIN_SESSIONS,
    decide: |_| {
      Outcome::new(
        0,
        Confidence::Low,
        "Insufficient data: need at least 2 sessions before adjusting volume",
      )
    },
  },
  VolumeRule {
    name: "recovery_issues",
    guard: |s| s.has_recovery_issues,
    decide: |s| {
      if s.metrics.avg_joint_pain >= 4.0 {
        Outcome::new(
          -1,
          Confidence::High,
          format!(
            "Joint pain averaging {:.1}/5 - reduce volume to protect the joint",
            s.metrics.avg_joint_pain
          ),
        )
      } else {
        Outcome::new(
          0,
          Confidence::High,
          format!(
            "Recovery is lagging (soreness {:.1}, joint pain {:.1}) - hold volume until it improves",
            s.metrics.avg_soreness, s.metrics.avg_joint_pain
          ),
        )
      }
    },
  },
  VolumeRule {
    name: "strong_headroom",
    guard: |s| s.metrics.rir_deviation <= -1.5 && s.has_good_recovery && s.has_good_pump,
    decide: |_| {
      Outcome::new(
        1,
        Confidence::High,
        "Recovering well with a strong pump and plenty of tolerance - add a set",
      )
    },
  },
  VolumeRule {
    name: "moderate_headroom",
    guard: |s| s.metrics.rir_deviation <= -1.0 && s.has_good_recovery,
    decide: |_| Outcome::new(1, Confidence::Medium, "Recovering well - room for one more set"),
  },
  VolumeRule {
    name: "overreaching",
    guard: |s| s.metrics.rir_deviation >= 1.5,
    decide: |s| {
      if s.metrics.avg_soreness >= 3.0 {
        Outcome::new(
          -1,
          Confidence::High,
          "Sets are landing closer to failure than prescribed and soreness is elevated - drop a set",
        )
      } else {
        Outcome::new(
          0,
          Confidence::Medium,
          "Sets are landing closer to failure than prescribed - hold volume",
        )
      }
    },
  },
  VolumeRule {
    name: "stagnation_override",
    guard: |s| s.weeks_since_last_increase >= 3 && !s.has_recovery_issues && s.metrics.avg_pump >= 3.0,
    decide: |s| {
      Outcome::new(
        1,
        Confidence::Medium,
        format!(
          "No volume increase in {} weeks and recovery is stable - add a set",
          s.weeks_since_last_increase
        ),
      )
    },
  },
];

/// ---------------------------------------------------------------------------
/// Recommendation
/// ---------------------------------------------------------------------------

/// Recommend the next set count for an exercise
///
/// `weeks_since_last_increase` is 0 when the caller does not track it.
pub fn recommend_sets(
  current_sets: u32,
  metrics: &PerformanceMetrics,
  weeks_since_last_increase: u32,
) -> SetRecommendation {
  let signals = Signals::new(metrics, weeks_since_last_increase);

  let (rule_name, outcome) = VOLUME_RULES
    .iter()
    .find(|rule| (rule.guard)(&signals))
    .map(|rule| (rule.name, (rule.decide)(&signals)))
    .unwrap_or_else(|| {
      (
        "maintain",
        Outcome::new(0, Confidence::Medium, "Performance and recovery are on target - maintain volume"),
      )
    });

  debug!(
    rule = rule_name,
    current_sets,
    change = outcome.change,
    "set volume rule matched"
  );

  let current = i64::from(current_sets);
  let capped = (current + i64::from(outcome.change)).min(current + i64::from(MAX_SET_INCREASE));
  let recommended_sets = u32::try_from(capped.clamp(1, i64::from(u32::MAX))).unwrap_or(u32::MAX);

  SetRecommendation {
    current_sets,
    recommended_sets,
    change: (i64::from(recommended_sets) - current) as i32,
    rationale: outcome.rationale,
    confidence: outcome.confidence,
  }
}

/// ---------------------------------------------------------------------------
/// Set History
/// ---------------------------------------------------------------------------

/// Per-session set counts of one exercise, oldest session first
fn session_set_counts(records: &[SetRecord], exercise_id: &str) -> Vec<(DateTime<Utc>, u32)> {
  let mut sessions: HashMap<&str, (DateTime<Utc>, u32)> = HashMap::new();
  for record in records.iter().filter(|r| r.exercise_id == exercise_id) {
    let entry = sessions
      .entry(record.session_id.as_str())
      .or_insert((record.performed_at, 0));
    entry.0 = entry.0.min(record.performed_at);
    entry.1 += 1;
  }

  let mut ordered: Vec<(DateTime<Utc>, u32)> = sessions.into_values().collect();
  ordered.sort_by_key(|(started_at, _)| *started_at);
  ordered
}

/// Sets logged in the most recent session of the exercise; 0 with no history
pub fn latest_session_sets(records: &[SetRecord], exercise_id: &str) -> u32 {
  session_set_counts(records, exercise_id)
    .last()
    .map(|(_, sets)| *sets)
    .unwrap_or(0)
}

/// Whole weeks since a session last logged more sets than the one before it
///
/// Counts from the first session when volume never went up; 0 with no history.
pub fn weeks_since_set_increase(records: &[SetRecord], exercise_id: &str, now: DateTime<Utc>) -> u32 {
  let sessions = session_set_counts(records, exercise_id);

  let since = sessions
    .windows(2)
    .filter(|pair| pair[1].1 > pair[0].1)
    .map(|pair| pair[1].0)
    .last()
    .or_else(|| sessions.first().map(|(started_at, _)| *started_at));

  since
    .map(|at| ((now - at).num_days().max(0) / 7) as u32)
    .unwrap_or(0)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{mock_metrics, mock_session, reference_now};

  #[test]
  fn test_headroom_with_good_pump_adds_set_high_confidence() {
    let metrics = mock_metrics(0.5, 2.0, 2.0, 4.0, 1.0, 3);
    let rec = recommend_sets(3, &metrics, 0);

    assert_eq!(rec.recommended_sets, 4);
    assert_eq!(rec.change, 1);
    assert_eq!(rec.confidence, Confidence::High);
  }

  #[test]
  fn test_high_joint_pain_drops_a_set() {
    let metrics = mock_metrics(2.0, 2.0, 2.0, 4.0, 4.0, 3);
    let rec = recommend_sets(3, &metrics, 0);

    assert_eq!(rec.recommended_sets, 2);
    assert_eq!(rec.change, -1);
    assert_eq!(rec.confidence, Confidence::High);
  }

  #[test]
  fn test_recovery_issues_without_severe_pain_hold() {
    let metrics = mock_metrics(0.0, 2.0, 4.5, 5.0, 1.0, 4);
    let rec = recommend_sets(4, &metrics, 5);

    assert_eq!(rec.change, 0);
    assert_eq!(rec.recommended_sets, 4);
    assert_eq!(rec.confidence, Confidence::High);
  }

  #[test]
  fn test_single_session_is_low_confidence_hold() {
    let metrics = mock_metrics(0.0, 3.0, 1.0, 5.0, 0.0, 1);
    let rec = recommend_sets(3, &metrics, 10);

    assert_eq!(rec.change, 0);
    assert_eq!(rec.recommended_sets, 3);
    assert_eq!(rec.confidence, Confidence::Low);
  }

  #[test]
  fn test_moderate_headroom_adds_set_medium_confidence() {
    let metrics = mock_metrics(1.0, 2.0, 1.0, 3.0, 0.0, 3);
    let rec = recommend_sets(3, &metrics, 0);

    assert_eq!(rec.change, 1);
    assert_eq!(rec.confidence, Confidence::Medium);
  }

  #[test]
  fn test_overreaching_with_soreness_drops_set() {
    let metrics = mock_metrics(3.5, 2.0, 3.0, 3.0, 1.0, 3);
    let rec = recommend_sets(4, &metrics, 0);

    assert_eq!(rec.recommended_sets, 3);
    assert_eq!(rec.change, -1);
    assert_eq!(rec.confidence, Confidence::High);

    let fresh = mock_metrics(3.5, 2.0, 2.0, 3.0, 1.0, 3);
    let rec = recommend_sets(4, &fresh, 0);
    assert_eq!(rec.change, 0);
    assert_eq!(rec.confidence, Confidence::Medium);
  }

  #[test]
  fn test_stagnation_override_after_three_weeks() {
    let metrics = mock_metrics(2.0, 2.0, 3.0, 3.0, 1.0, 3);
    let rec = recommend_sets(3, &metrics, 3);

    assert_eq!(rec.recommended_sets, 4);
    assert_eq!(rec.change, 1);
    assert_eq!(rec.confidence, Confidence::Medium);

    // Two weeks is not enough
    let rec = recommend_sets(3, &metrics, 2);
    assert_eq!(rec.change, 0);
  }

  #[test]
  fn test_reduction_never_goes_below_one_set() {
    let metrics = mock_metrics(2.0, 2.0, 1.0, 3.0, 5.0, 3);
    let rec = recommend_sets(1, &metrics, 0);

    assert_eq!(rec.recommended_sets, 1);
    assert_eq!(rec.change, 0);
  }

  #[test]
  fn test_rule_order_recovery_beats_headroom() {
    // Big deviation and great pump, but soreness is high: recovery rule wins
    let metrics = mock_metrics(0.0, 3.0, 4.0, 5.0, 0.0, 5);
    let rec = recommend_sets(3, &metrics, 0);

    assert_eq!(rec.change, 0);
    assert_eq!(rec.confidence, Confidence::High);
  }

  #[test]
  fn test_bounds_hold_across_inputs() {
    for current in (1..8u32).chain([u32::MAX - 1, u32::MAX]) {
      for sessions in 0..4usize {
        for weeks in 0..5u32 {
          for rir in [0.0, 1.0, 2.0, 3.5, 5.0] {
            for pain in [0.0, 1.0, 3.0, 4.5] {
              let metrics = mock_metrics(rir, 2.0, 2.0, 4.0, pain, sessions);
              let rec = recommend_sets(current, &metrics, weeks);
              assert!(rec.recommended_sets >= 1);
              assert!(i64::from(rec.recommended_sets) <= i64::from(current) + 2);
              assert_eq!(
                i64::from(rec.recommended_sets),
                i64::from(current) + i64::from(rec.change)
              );
            }
          }
        }
      }
    }
  }

  #[test]
  fn test_set_count_saturates_at_max() {
    let metrics = mock_metrics(1.0, 2.0, 1.0, 3.0, 0.0, 3);
    let rec = recommend_sets(u32::MAX, &metrics, 0);
    assert_eq!(rec.recommended_sets, u32::MAX);
    assert_eq!(rec.change, 0);
    assert_eq!(rec.confidence, Confidence::Medium);
  }

  #[test]
  fn test_weeks_since_set_increase() {
    let mut records = mock_session("squat", "s1", 40, 3, 100.0, 5, 2.0, 2.0);
    records.extend(mock_session("squat", "s2", 30, 4, 100.0, 5, 2.0, 2.0));
    records.extend(mock_session("squat", "s3", 10, 4, 100.0, 5, 2.0, 2.0));
    records.extend(mock_session("squat", "s4", 2, 3, 100.0, 5, 2.0, 2.0));

    // Last increase was 3 -> 4 sets, 30 days ago
    assert_eq!(weeks_since_set_increase(&records, "squat", reference_now()), 4);
    assert_eq!(latest_session_sets(&records, "squat"), 3);
  }

  #[test]
  fn test_weeks_since_set_increase_without_increase() {
    let mut records = mock_session("bench", "s1", 22, 4, 80.0, 8, 2.0, 2.0);
    records.extend(mock_session("bench", "s2", 1, 4, 80.0, 8, 2.0, 2.0));

    assert_eq!(weeks_since_set_increase(&records, "bench", reference_now()), 3);
    assert_eq!(weeks_since_set_increase(&records, "row", reference_now()), 0);
    assert_eq!(latest_session_sets(&records, "row"), 0);
  }
}
