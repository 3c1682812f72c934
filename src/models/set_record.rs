use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subjective feedback attached to a set, each value on a 1-5 scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
  pub soreness: Option<u8>,
  pub pump: Option<u8>,
  pub joint_pain: Option<u8>,
}

/// One completed set as logged by the trainee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
  pub exercise_id: String,
  pub session_id: String,
  pub set_index: u32,
  pub weight: f64,
  pub reps: u32,
  /// Reps in reserve actually achieved (0 = failure)
  pub rir: f64,
  pub target_rir: f64,
  /// Derived from weight/reps, see [`estimate_one_rep_max`]
  pub estimated_1rm: Option<f64>,
  pub performed_at: DateTime<Utc>,
  #[serde(default)]
  pub feedback: Feedback,
}

impl SetRecord {
  /// Create a record with the derived e1RM filled in and no feedback
  pub fn new(
    exercise_id: &str,
    session_id: &str,
    set_index: u32,
    weight: f64,
    reps: u32,
    rir: f64,
    target_rir: f64,
    performed_at: DateTime<Utc>,
  ) -> Self {
    Self {
      exercise_id: exercise_id.to_string(),
      session_id: session_id.to_string(),
      set_index,
      weight,
      reps,
      rir,
      target_rir,
      estimated_1rm: estimate_one_rep_max(weight, reps),
      performed_at,
      feedback: Feedback::default(),
    }
  }

  /// Late attachment of soreness/pump/joint-pain feedback
  pub fn attach_feedback(mut self, feedback: Feedback) -> Self {
    self.feedback = feedback;
    self
  }

  /// Edit weight and reps; the e1RM is recalculated to stay consistent
  pub fn with_load(mut self, weight: f64, reps: u32) -> Self {
    self.weight = weight;
    self.reps = reps;
    self.estimated_1rm = estimate_one_rep_max(weight, reps);
    self
  }

  pub fn soreness(&self) -> Option<f64> {
    self.feedback.soreness.map(f64::from)
  }

  pub fn pump(&self) -> Option<f64> {
    self.feedback.pump.map(f64::from)
  }

  pub fn joint_pain(&self) -> Option<f64> {
    self.feedback.joint_pain.map(f64::from)
  }
}

/// Epley estimate: weight * (1 + reps / 30)
///
/// A single rep is the max itself. No estimate for zero reps or no load.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> Option<f64> {
  if reps == 0 || weight <= 0.0 {
    return None;
  }
  if reps == 1 {
    return Some(weight);
  }
  Some(weight * (1.0 + f64::from(reps) / 30.0))
}

/// Mean of the values that are present; `None` when nothing is present
pub(crate) fn mean_present<I>(values: I) -> Option<f64>
where
  I: IntoIterator<Item = Option<f64>>,
{
  let (sum, count) = values
    .into_iter()
    .flatten()
    .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
  if count == 0 {
    None
  } else {
    Some(sum / count as f64)
  }
}

/// Number of distinct sessions among the given records
pub(crate) fn distinct_sessions<'a, I>(records: I) -> usize
where
  I: IntoIterator<Item = &'a SetRecord>,
{
  let mut ids: Vec<&str> = records.into_iter().map(|r| r.session_id.as_str()).collect();
  ids.sort_unstable();
  ids.dedup();
  ids.len()
}

/// Performed at most `days - 1` whole days before `now`, and not after it
pub(crate) fn within_days(now: DateTime<Utc>, performed_at: DateTime<Utc>, days: i64) -> bool {
  (0..days).contains(&(now - performed_at).num_days())
}

/// Records sorted newest first, truncated to `limit`
pub(crate) fn most_recent(records: &[&SetRecord], limit: usize) -> Vec<SetRecord> {
  let mut sorted: Vec<SetRecord> = records.iter().map(|r| (*r).clone()).collect();
  sorted.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));
  sorted.truncate(limit);
  sorted
}
