//! Load Progression Advisor
//!
//! Decides whether the working weight of an exercise should go up, and by how
//! much, from the RIR and rep performance of its most recent sets.
//!
//! Key principles:
//! - Performance-driven: only sets that were clearly easy earn a load increase
//! - Technique first: grinding low-rep sets never progress
//! - Increases are rounded up to the next 2.5 plate increment

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::set_record::{mean_present, most_recent};
use crate::models::{Confidence, MuscleGroup, SetRecord};

/// Newest sets considered, roughly three sessions of three sets
const SAMPLE_SIZE: usize = 9;
const MIN_SAMPLE: usize = 3;

const EASY_SET_SHARE: f64 = 0.7;
const TARGET_REPS: f64 = 8.0;
const LOW_RIR: f64 = 1.0;
const LOW_REPS: f64 = 6.0;
const JOINT_PAIN_GATE: f64 = 3.0;

const LOWER_BODY_INCREASE_PCT: f64 = 5.0;
const UPPER_BODY_INCREASE_PCT: f64 = 2.5;
const PLATE_INCREMENT: f64 = 2.5;

// ---------------------------------------------------------------------------
/// Decision: which branch produced the recommendation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionDecision {
    ProgressEasy,          // Most sets ended well above target RIR
    ProgressHeadroom,      // Average RIR at least 2 above target
    HoldJointPain,         // Joint pain while already overreaching
    HoldTechnique,         // Grinding low-rep sets
    HoldOverreaching,      // Sets ending below target RIR
    Hold,                  // No clear signal
}

impl ProgressionDecision {
    pub fn progresses(&self) -> bool {
        matches!(self, Self::ProgressEasy | Self::ProgressHeadroom)
    }
}

impl std::fmt::Display for ProgressionDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProgressEasy => write!(f, "progress_easy"),
            Self::ProgressHeadroom => write!(f, "progress_headroom"),
            Self::HoldJointPain => write!(f, "hold_joint_pain"),
            Self::HoldTechnique => write!(f, "hold_technique"),
            Self::HoldOverreaching => write!(f, "hold_overreaching"),
            Self::Hold => write!(f, "hold"),
        }
    }
}

// ---------------------------------------------------------------------------
/// Performance Flags: derived from the recent sample
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionFlags {
    pub avg_rir: f64,
    pub avg_reps: f64,
    pub target_rir: f64,
    pub avg_joint_pain: Option<f64>,
    pub consistently_easy: bool,
    pub hitting_target_reps: bool,
    pub low_rir: bool,
}

impl ProgressionFlags {
    /// `sample` is newest first and non-empty
    fn compute(sample: &[SetRecord]) -> Self {
        let n = sample.len() as f64;
        let target_rir = sample[0].target_rir;

        let avg_rir = sample.iter().map(|r| r.rir).sum::<f64>() / n;
        let avg_reps = sample.iter().map(|r| f64::from(r.reps)).sum::<f64>() / n;
        let easy_sets = sample.iter().filter(|r| r.rir >= target_rir + 1.0).count() as f64;

        Self {
            avg_rir,
            avg_reps,
            target_rir,
            avg_joint_pain: mean_present(sample.iter().map(SetRecord::joint_pain)),
            consistently_easy: easy_sets / n >= EASY_SET_SHARE,
            hitting_target_reps: avg_reps >= TARGET_REPS,
            low_rir: avg_rir <= LOW_RIR,
        }
    }

    fn decide(&self) -> (ProgressionDecision, Confidence, String) {
        let joint_pain = self.avg_joint_pain.unwrap_or(0.0);

        if self.consistently_easy && self.hitting_target_reps {
            (
                ProgressionDecision::ProgressEasy,
                Confidence::High,
                format!(
                    "Most recent sets finished at least 1 RIR above target ({:.1} avg RIR, {:.1} avg reps)",
                    self.avg_rir, self.avg_reps
                ),
            )
        } else if self.avg_rir >= self.target_rir + 2.0 && self.hitting_target_reps {
            (
                ProgressionDecision::ProgressHeadroom,
                Confidence::Medium,
                format!(
                    "Average RIR {:.1} is well above target {:.1}",
                    self.avg_rir, self.target_rir
                ),
            )
        } else if joint_pain >= JOINT_PAIN_GATE && self.avg_rir < self.target_rir {
            (
                ProgressionDecision::HoldJointPain,
                Confidence::High,
                format!(
                    "Joint pain averaging {:.1}/5 while sets end below target RIR - hold the load",
                    joint_pain
                ),
            )
        } else if self.low_rir && self.avg_reps < LOW_REPS {
            (
                ProgressionDecision::HoldTechnique,
                Confidence::High,
                format!(
                    "Grinding sets ({:.1} avg RIR, {:.1} avg reps) - own the current load first",
                    self.avg_rir, self.avg_reps
                ),
            )
        } else if self.avg_rir < self.target_rir {
            (
                ProgressionDecision::HoldOverreaching,
                Confidence::High,
                format!(
                    "Sets are ending below target RIR ({:.1} vs {:.1}) - hold the load",
                    self.avg_rir, self.target_rir
                ),
            )
        } else {
            (
                ProgressionDecision::Hold,
                Confidence::Low,
                "On target - keep the current load".to_string(),
            )
        }
    }
}

// ---------------------------------------------------------------------------
/// Progression Recommendation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionRecommendation {
    pub should_progress: bool,
    pub recommended_weight: f64,
    pub current_weight: f64,
    pub confidence: Confidence,
    pub rationale: String,
    /// Target percentage applied; 0 when holding
    pub percentage_increase: f64,
    pub decision: ProgressionDecision,
}

/// Recommend the next working weight from the records of one exercise
///
/// `None` with fewer than 3 records. Current weight and target RIR come from
/// the newest record.
pub fn recommend_progression(
    records: &[SetRecord],
    muscle_group: MuscleGroup,
) -> Option<ProgressionRecommendation> {
    if records.len() < MIN_SAMPLE {
        return None;
    }

    let all: Vec<&SetRecord> = records.iter().collect();
    let sample = most_recent(&all, SAMPLE_SIZE);
    let current_weight = sample.first()?.weight;

    let flags = ProgressionFlags::compute(&sample);
    let (decision, confidence, rationale) = flags.decide();

    debug!(
        decision = %decision,
        avg_rir = flags.avg_rir,
        avg_reps = flags.avg_reps,
        "progression decision"
    );

    let (recommended_weight, percentage_increase) = if decision.progresses() {
        let pct = target_increase_pct(muscle_group);
        (current_weight + rounded_increase(current_weight, pct), pct)
    } else {
        (current_weight, 0.0)
    };

    Some(ProgressionRecommendation {
        should_progress: decision.progresses(),
        recommended_weight,
        current_weight,
        confidence,
        rationale,
        percentage_increase,
        decision,
    })
}

/// 5% for lower-body groups, 2.5% otherwise
pub fn target_increase_pct(muscle_group: MuscleGroup) -> f64 {
    if muscle_group.is_lower_body() {
        LOWER_BODY_INCREASE_PCT
    } else {
        UPPER_BODY_INCREASE_PCT
    }
}

/// Raw percentage increase rounded up to the next plate increment
fn rounded_increase(weight: f64, pct: f64) -> f64 {
    let raw = weight * pct / 100.0;
    // Absorb float noise so exact multiples stay put
    ((raw / PLATE_INCREMENT) - 1e-9).ceil() * PLATE_INCREMENT
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_session, with_feedback};

    fn three_sessions(weight: f64, reps: u32, rir: f64, target_rir: f64) -> Vec<SetRecord> {
        let mut records = Vec::new();
        for (i, days_ago) in [7, 4, 1].iter().enumerate() {
            records.extend(mock_session(
                "squat",
                &format!("s{}", i),
                *days_ago,
                3,
                weight,
                reps,
                rir,
                target_rir,
            ));
        }
        records
    }

    #[test]
    fn test_needs_three_records() {
        let records = mock_session("squat", "s1", 1, 2, 100.0, 10, 4.0, 2.0);
        assert!(recommend_progression(&records, MuscleGroup::Quadriceps).is_none());
        assert!(recommend_progression(&[], MuscleGroup::Quadriceps).is_none());
    }

    #[test]
    fn test_lower_body_progresses_five_percent() {
        let records = three_sessions(100.0, 10, 3.0, 2.0);
        let rec = recommend_progression(&records, MuscleGroup::Quadriceps).unwrap();

        assert!(rec.should_progress);
        assert_eq!(rec.decision, ProgressionDecision::ProgressEasy);
        assert_eq!(rec.confidence, Confidence::High);
        assert_eq!(rec.current_weight, 100.0);
        assert_eq!(rec.recommended_weight, 105.0);
        assert_eq!(rec.percentage_increase, 5.0);
    }

    #[test]
    fn test_upper_body_rounds_up_to_plate_increment() {
        // 2.5% of 60 = 1.5, rounded up to 2.5
        let records = three_sessions(60.0, 10, 3.0, 2.0);
        let rec = recommend_progression(&records, MuscleGroup::Chest).unwrap();

        assert_eq!(rec.recommended_weight, 62.5);
        assert_eq!(rec.percentage_increase, 2.5);
    }

    #[test]
    fn test_exact_multiple_is_not_bumped() {
        assert_eq!(rounded_increase(100.0, 5.0), 5.0);
        assert_eq!(rounded_increase(100.0, 2.5), 2.5);
        assert_eq!(rounded_increase(140.0, 5.0), 7.5);
    }

    #[test]
    fn test_headroom_without_consistent_easy_sets() {
        // Two sessions at RIR 2 and one at RIR 9: only 3 of 9 sets are easy
        let mut records = mock_session("bench", "s1", 7, 3, 80.0, 8, 2.0, 2.0);
        records.extend(mock_session("bench", "s2", 4, 3, 80.0, 8, 2.0, 2.0));
        records.extend(mock_session("bench", "s3", 1, 3, 80.0, 8, 8.0, 2.0));

        let rec = recommend_progression(&records, MuscleGroup::Chest).unwrap();

        assert!(rec.should_progress);
        assert_eq!(rec.decision, ProgressionDecision::ProgressHeadroom);
        assert_eq!(rec.confidence, Confidence::Medium);
    }

    #[test]
    fn test_grinding_low_reps_holds() {
        let records = three_sessions(140.0, 4, 0.5, 2.0);
        let rec = recommend_progression(&records, MuscleGroup::Hamstrings).unwrap();

        assert!(!rec.should_progress);
        assert_eq!(rec.decision, ProgressionDecision::HoldTechnique);
        assert_eq!(rec.confidence, Confidence::High);
        assert_eq!(rec.recommended_weight, 140.0);
        assert_eq!(rec.percentage_increase, 0.0);
    }

    #[test]
    fn test_below_target_rir_holds() {
        let records = three_sessions(100.0, 8, 1.5, 3.0);
        let rec = recommend_progression(&records, MuscleGroup::Back).unwrap();

        assert_eq!(rec.decision, ProgressionDecision::HoldOverreaching);
        assert_eq!(rec.confidence, Confidence::High);
    }

    #[test]
    fn test_on_target_is_low_confidence_hold() {
        let records = three_sessions(100.0, 8, 2.0, 2.0);
        let rec = recommend_progression(&records, MuscleGroup::Back).unwrap();

        assert!(!rec.should_progress);
        assert_eq!(rec.decision, ProgressionDecision::Hold);
        assert_eq!(rec.confidence, Confidence::Low);
    }

    #[test]
    fn test_joint_pain_while_overreaching_holds() {
        let records: Vec<SetRecord> = three_sessions(100.0, 10, 1.5, 2.0)
            .into_iter()
            .map(|r| with_feedback(r, None, None, Some(4)))
            .collect();

        let rec = recommend_progression(&records, MuscleGroup::Quadriceps).unwrap();

        assert!(!rec.should_progress);
        assert_eq!(rec.decision, ProgressionDecision::HoldJointPain);
        assert_eq!(rec.confidence, Confidence::High);
    }

    #[test]
    fn test_easy_majority_progresses_despite_joint_pain() {
        // 7 of 9 sets easy, but two grinders pull the average below target
        let mut records = mock_session("squat", "s0", 7, 3, 100.0, 10, 5.0, 4.0);
        records.extend(mock_session("squat", "s1", 4, 3, 100.0, 10, 5.0, 4.0));
        records.extend(mock_session("squat", "s2", 1, 1, 100.0, 10, 5.0, 4.0));
        records.extend(mock_session("squat", "s2", 1, 2, 100.0, 10, 0.0, 4.0));
        let records: Vec<SetRecord> = records
            .into_iter()
            .map(|r| with_feedback(r, None, None, Some(4)))
            .collect();

        let rec = recommend_progression(&records, MuscleGroup::Quadriceps).unwrap();

        assert!(rec.should_progress);
        assert_eq!(rec.decision, ProgressionDecision::ProgressEasy);
        assert_eq!(rec.confidence, Confidence::High);
        assert_eq!(rec.recommended_weight, 105.0);
    }

    #[test]
    fn test_uses_newest_record_for_weight_and_target() {
        let mut records = mock_session("squat", "old", 10, 3, 90.0, 10, 5.0, 4.0);
        records.extend(three_sessions(100.0, 10, 3.0, 2.0));

        let rec = recommend_progression(&records, MuscleGroup::Quadriceps).unwrap();

        // Only the 9 newest sets count, so the old session is ignored
        assert_eq!(rec.current_weight, 100.0);
        assert_eq!(rec.decision, ProgressionDecision::ProgressEasy);
    }
}
