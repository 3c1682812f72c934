//! Exercise rotation and substitution
//!
//! Movement classification by name keywords, same-muscle substitutes ranked by
//! similarity, and a time-based staleness advisory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Exercise, SetRecord};

const COMPOUND_KEYWORDS: &[&str] = &[
  "squat", "deadlift", "press", "row", "pull-up", "chin-up", "lunge", "dip", "clean", "snatch",
  "push-up",
];

const MAX_SUBSTITUTES: usize = 5;
const HIGH_URGENCY_WEEKS: u32 = 8;
const MEDIUM_URGENCY_WEEKS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
  Compound,
  Isolation,
}

/// Compound when the name contains any compound keyword (case-insensitive)
pub fn classify_movement(name: &str) -> MovementType {
  let lower = name.to_lowercase();
  if COMPOUND_KEYWORDS.iter().any(|k| lower.contains(k)) {
    MovementType::Compound
  } else {
    MovementType::Isolation
  }
}

/// ---------------------------------------------------------------------------
/// Substitution
/// ---------------------------------------------------------------------------

/// Ordered so that sorting ascending puts the closest match first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Similarity {
  High,
  Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstituteCandidate {
  pub exercise: Exercise,
  pub movement_type: MovementType,
  pub similarity: Similarity,
}

/// Same-muscle-group alternatives, best match first, at most 5
pub fn find_substitutes(exercise: &Exercise, catalog: &[Exercise]) -> Vec<SubstituteCandidate> {
  let own_type = classify_movement(&exercise.name);

  let mut candidates: Vec<SubstituteCandidate> = catalog
    .iter()
    .filter(|c| c.muscle_group == exercise.muscle_group && c.id != exercise.id)
    .map(|c| {
      let movement_type = classify_movement(&c.name);
      SubstituteCandidate {
        exercise: c.clone(),
        movement_type,
        similarity: if movement_type == own_type {
          Similarity::High
        } else {
          Similarity::Medium
        },
      }
    })
    .collect();

  // Stable: catalog order breaks ties
  candidates.sort_by_key(|c| c.similarity);
  candidates.truncate(MAX_SUBSTITUTES);
  candidates
}

/// ---------------------------------------------------------------------------
/// Staleness
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationUrgency {
  None,
  Medium,
  High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationAdvice {
  pub weeks_used: u32,
  pub should_rotate: bool,
  pub urgency: RotationUrgency,
  pub message: String,
}

pub fn rotation_advice(weeks_used: u32) -> RotationAdvice {
  let (should_rotate, urgency, message) = if weeks_used >= HIGH_URGENCY_WEEKS {
    (
      true,
      RotationUrgency::High,
      format!(
        "Used for {} weeks - rotate to a new variation to restore the stimulus",
        weeks_used
      ),
    )
  } else if weeks_used >= MEDIUM_URGENCY_WEEKS {
    (
      false,
      RotationUrgency::Medium,
      format!(
        "Used for {} weeks - plan a rotation within the next couple of weeks",
        weeks_used
      ),
    )
  } else {
    (
      false,
      RotationUrgency::None,
      "No rotation needed".to_string(),
    )
  };

  RotationAdvice {
    weeks_used,
    should_rotate,
    urgency,
    message,
  }
}

/// Whole weeks since the oldest logged set of the exercise; 0 with no history
pub fn weeks_in_use(records: &[SetRecord], exercise_id: &str, now: DateTime<Utc>) -> u32 {
  records
    .iter()
    .filter(|r| r.exercise_id == exercise_id)
    .map(|r| r.performed_at)
    .min()
    .map(|first| ((now - first).num_days().max(0) / 7) as u32)
    .unwrap_or(0)
}
