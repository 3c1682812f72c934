//! Joint-pain trend scanning per exercise
//!
//! The sample is the 9 most recent sets. With the usual three working sets per
//! session this covers roughly the last three sessions; it is a set count, not
//! a session boundary, so sessions with more or fewer sets shift the coverage.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::set_record::{distinct_sessions, mean_present, most_recent};
use crate::models::{Exercise, SetRecord};

const SAMPLE_SIZE: usize = 9;
const MIN_SAMPLE: usize = 3;
const MAX_SUGGESTIONS: usize = 3;

/// Lower-stress equipment and single-joint movements
const JOINT_FRIENDLY_KEYWORDS: &[&str] = &[
  "machine", "cable", "dumbbell", "isolation", "fly", "raise", "curl", "extension",
];
/// Heavy axial loading or long lever barbell work
const HIGH_STRESS_KEYWORDS: &[&str] = &["barbell", "squat", "deadlift", "press"];

/// Ordered so that sorting ascending lists the most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
  High,
  Medium,
  Low,
}

impl RiskLevel {
  fn from_joint_pain(avg: f64) -> Option<Self> {
    match avg {
      p if p >= 3.5 => Some(RiskLevel::High),
      p if p >= 2.5 => Some(RiskLevel::Medium),
      p if p >= 1.5 => Some(RiskLevel::Low),
      _ => None,
    }
  }

  fn advisory(&self, avg_joint_pain: f64) -> String {
    match self {
      RiskLevel::High => format!(
        "Joint pain averaging {:.1}/5 over recent sessions. Stop this exercise and switch to a joint-friendly alternative.",
        avg_joint_pain
      ),
      RiskLevel::Medium => format!(
        "Joint pain averaging {:.1}/5. Reduce the load or consider a substitute exercise.",
        avg_joint_pain
      ),
      RiskLevel::Low => format!(
        "Mild joint discomfort ({:.1}/5). Monitor closely and prioritize technique.",
        avg_joint_pain
      ),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryRisk {
  pub exercise_id: String,
  pub exercise_name: String,
  pub risk_level: RiskLevel,
  pub avg_joint_pain: f64,
  pub sessions_sampled: usize,
  pub recommendation: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub alternatives: Option<Vec<Exercise>>,
}

/// Assess one exercise from the log
///
/// `None` with fewer than 3 sets or when the joint pain average is below the
/// lowest risk tier.
pub fn assess_injury_risk(exercise: &Exercise, records: &[SetRecord]) -> Option<InjuryRisk> {
  assess_by_id(&exercise.id, &exercise.name, records)
}

fn assess_by_id(exercise_id: &str, exercise_name: &str, records: &[SetRecord]) -> Option<InjuryRisk> {
  let own: Vec<&SetRecord> = records
    .iter()
    .filter(|r| r.exercise_id == exercise_id)
    .collect();
  let sample = most_recent(&own, SAMPLE_SIZE);

  if sample.len() < MIN_SAMPLE {
    return None;
  }

  let avg_joint_pain = mean_present(sample.iter().map(SetRecord::joint_pain))?;
  let risk_level = RiskLevel::from_joint_pain(avg_joint_pain)?;

  debug!(
    exercise = exercise_id,
    avg_joint_pain,
    risk = ?risk_level,
    "injury risk detected"
  );

  Some(InjuryRisk {
    exercise_id: exercise_id.to_string(),
    exercise_name: exercise_name.to_string(),
    risk_level,
    avg_joint_pain,
    sessions_sampled: distinct_sessions(&sample),
    recommendation: risk_level.advisory(avg_joint_pain),
    alternatives: None,
  })
}

/// Run the assessment for every exercise present in the log
///
/// Exercises missing from the catalog are reported under their id. High and
/// medium risks carry joint-friendly alternatives from the catalog.
pub fn scan_injury_risks(catalog: &[Exercise], records: &[SetRecord]) -> Vec<InjuryRisk> {
  let exercise_ids: BTreeSet<&str> = records.iter().map(|r| r.exercise_id.as_str()).collect();

  let mut risks: Vec<InjuryRisk> = exercise_ids
    .into_iter()
    .filter_map(|id| match catalog.iter().find(|e| e.id == id) {
      Some(exercise) => assess_injury_risk(exercise, records).map(|mut risk| {
        if risk.risk_level != RiskLevel::Low {
          risk.alternatives = Some(suggest_substitutes(exercise, catalog));
        }
        risk
      }),
      None => assess_by_id(id, id, records),
    })
    .collect();

  risks.sort_by_key(|r| r.risk_level);

  info!(flagged = risks.len(), "injury risk scan complete");
  risks
}

/// Joint-friendly alternatives for the same muscle group, best first, at most 3
pub fn suggest_substitutes(exercise: &Exercise, catalog: &[Exercise]) -> Vec<Exercise> {
  let mut scored: Vec<(u8, &Exercise)> = catalog
    .iter()
    .filter(|c| c.muscle_group == exercise.muscle_group && c.id != exercise.id)
    .map(|c| (joint_stress_score(&c.name), c))
    .collect();

  scored.sort_by(|a, b| b.0.cmp(&a.0));

  scored
    .into_iter()
    .take(MAX_SUGGESTIONS)
    .map(|(_, e)| e.clone())
    .collect()
}

/// 2 for joint-friendly movements, 0 for high-stress ones, 1 otherwise
fn joint_stress_score(name: &str) -> u8 {
  let lower = name.to_lowercase();
  if JOINT_FRIENDLY_KEYWORDS.iter().any(|k| lower.contains(k)) {
    2
  } else if HIGH_STRESS_KEYWORDS.iter().any(|k| lower.contains(k)) {
    0
  } else {
    1
  }
}
