//! Coaching report
//!
//! Per-exercise recommendations bundled with the whole-log deload verdict and
//! fatigue index, plus a prioritized alert list for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineSettings;
use crate::deload_plan::{generate_deload_week, DeloadWeekPlan};
use crate::fatigue::{
  compute_fatigue_index_over, recommend_deload, weekly_volume_series, DeloadRecommendation,
  FatigueLevel, FatigueMetrics, FatigueWindow,
};
use crate::injury::{assess_injury_risk, suggest_substitutes, InjuryRisk, RiskLevel};
use crate::metrics::PerformanceMetrics;
use crate::models::set_record::within_days;
use crate::models::{Exercise, ExercisePrescription, Microcycle, SetRecord};
use crate::progression::{recommend_progression, ProgressionRecommendation};
use crate::rotation::{rotation_advice, weeks_in_use, RotationAdvice, RotationUrgency};
use crate::volume::{latest_session_sets, recommend_sets, weeks_since_set_increase, SetRecommendation};

/// ---------------------------------------------------------------------------
/// Tier 1: Per-Exercise Report
/// ---------------------------------------------------------------------------

/// Everything the engine can say about one exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseReport {
  pub exercise: Exercise,

  /// Over the fatigue lookback window; None without recent sets
  pub metrics: Option<PerformanceMetrics>,
  pub set_recommendation: Option<SetRecommendation>,

  pub progression: Option<ProgressionRecommendation>,
  pub injury_risk: Option<InjuryRisk>,
  pub rotation: RotationAdvice,
}

impl ExerciseReport {
  /// Build the report for `exercise` from a mixed log
  ///
  /// `current_sets` is the set count the volume recommendation starts from.
  pub fn build(
    exercise: &Exercise,
    catalog: &[Exercise],
    records: &[SetRecord],
    current_sets: u32,
    settings: &EngineSettings,
    now: DateTime<Utc>,
  ) -> Self {
    let own: Vec<SetRecord> = records
      .iter()
      .filter(|r| r.exercise_id == exercise.id)
      .cloned()
      .collect();

    let recent: Vec<SetRecord> = own
      .iter()
      .filter(|r| within_days(now, r.performed_at, settings.fatigue_lookback_days))
      .cloned()
      .collect();

    let metrics = PerformanceMetrics::compute(&recent);
    let set_recommendation = metrics.as_ref().map(|m| {
      recommend_sets(
        current_sets,
        m,
        weeks_since_set_increase(&own, &exercise.id, now),
      )
    });

    let injury_risk = assess_injury_risk(exercise, &own).map(|mut risk| {
      if risk.risk_level != RiskLevel::Low {
        risk.alternatives = Some(suggest_substitutes(exercise, catalog));
      }
      risk
    });

    debug!(
      exercise = %exercise.id,
      records = own.len(),
      recent = recent.len(),
      "exercise report built"
    );

    Self {
      exercise: exercise.clone(),
      metrics,
      set_recommendation,
      progression: recommend_progression(&own, exercise.muscle_group),
      injury_risk,
      rotation: rotation_advice(weeks_in_use(&own, &exercise.id, now)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tier 2: Coaching Report
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachingReport {
  pub generated_at: DateTime<Utc>,

  /// None when the lookback window holds fewer than 3 sets
  pub deload: Option<DeloadRecommendation>,
  pub fatigue: FatigueMetrics,

  /// Completed sets per week, oldest first
  pub weekly_volumes: Vec<f64>,

  /// Catalog exercises with at least one logged set, in catalog order
  pub exercises: Vec<ExerciseReport>,
}

impl CoachingReport {
  /// Analyze the whole log
  ///
  /// Set counts come from the matching prescription, or the latest logged
  /// session when the exercise has none.
  pub fn build(
    catalog: &[Exercise],
    records: &[SetRecord],
    prescriptions: &[ExercisePrescription],
    settings: &EngineSettings,
    now: DateTime<Utc>,
  ) -> Self {
    let deload = FatigueWindow::compute(records, now, settings.fatigue_lookback_days)
      .map(|window| recommend_deload(&window));

    let weekly_volumes = weekly_volume_series(records, now, settings.volume_trend_weeks);
    let fatigue = compute_fatigue_index_over(
      records,
      &weekly_volumes,
      now,
      settings.fatigue_index_sample_days,
    );

    let exercises: Vec<ExerciseReport> = catalog
      .iter()
      .filter(|e| records.iter().any(|r| r.exercise_id == e.id))
      .map(|e| {
        let current_sets = prescriptions
          .iter()
          .find(|p| p.exercise_id == e.id)
          .map(|p| p.target_sets)
          .unwrap_or_else(|| latest_session_sets(records, &e.id));
        ExerciseReport::build(e, catalog, records, current_sets, settings, now)
      })
      .collect();

    info!(
      exercises = exercises.len(),
      fatigue_index = fatigue.fatigue_index,
      needs_deload = deload.as_ref().is_some_and(|d| d.needs_deload),
      "coaching report built"
    );

    Self {
      generated_at: now,
      deload,
      fatigue,
      weekly_volumes,
      exercises,
    }
  }

  pub fn needs_deload(&self) -> bool {
    self.deload.as_ref().is_some_and(|d| d.needs_deload)
  }

  /// Deload week after `microcycle`, only when the verdict calls for one
  pub fn plan_deload(
    &self,
    microcycle: &Microcycle,
    prescriptions: &[ExercisePrescription],
    settings: &EngineSettings,
  ) -> Option<DeloadWeekPlan> {
    self
      .needs_deload()
      .then(|| generate_deload_week(microcycle, prescriptions, settings.deload_set_factor))
  }

  /// Convert the report to a prioritized list with (alert_name, priority, description)
  /// Priority: 1 = highest, 5 = lowest
  pub fn to_prioritized_list(&self) -> Vec<(String, u8, String)> {
    let mut alerts = Vec::new();

    if let Some(deload) = self.deload.as_ref().filter(|d| d.needs_deload) {
      alerts.push(("deload_needed".to_string(), 1, deload.reason.clone()));
    }

    match self.fatigue.level {
      FatigueLevel::Severe => alerts.push((
        "severe_fatigue".to_string(),
        1,
        format!("Fatigue index {:.0}/100", self.fatigue.fatigue_index),
      )),
      FatigueLevel::High => alerts.push((
        "high_fatigue".to_string(),
        2,
        format!("Fatigue index {:.0}/100", self.fatigue.fatigue_index),
      )),
      FatigueLevel::Moderate | FatigueLevel::Low => {}
    }

    for report in &self.exercises {
      let id = &report.exercise.id;

      if let Some(risk) = &report.injury_risk {
        let priority = match risk.risk_level {
          RiskLevel::High => 1,
          RiskLevel::Medium => 2,
          RiskLevel::Low => 5,
        };
        alerts.push((format!("injury_risk:{}", id), priority, risk.recommendation.clone()));
      }

      if let Some(rec) = report.set_recommendation.as_ref().filter(|r| r.change < 0) {
        alerts.push((format!("reduce_volume:{}", id), 3, rec.rationale.clone()));
      }

      match report.rotation.urgency {
        RotationUrgency::High => {
          alerts.push((format!("rotate:{}", id), 3, report.rotation.message.clone()))
        }
        RotationUrgency::Medium => {
          alerts.push((format!("rotate:{}", id), 5, report.rotation.message.clone()))
        }
        RotationUrgency::None => {}
      }

      if let Some(prog) = report.progression.as_ref().filter(|p| p.should_progress) {
        alerts.push((
          format!("progress_load:{}", id),
          4,
          format!(
            "{} -> {} ({})",
            prog.current_weight, prog.recommended_weight, prog.rationale
          ),
        ));
      }

      if let Some(rec) = report.set_recommendation.as_ref().filter(|r| r.change > 0) {
        alerts.push((format!("add_volume:{}", id), 4, rec.rationale.clone()));
      }
    }

    // Sort by priority (lowest number = highest priority), stable within a tier
    alerts.sort_by_key(|(_, priority, _)| *priority);
    alerts
  }

  /// Serialize to pretty JSON for the calling surface
  pub fn to_json(&self) -> String {
    serde_json::to_string_pretty(self).unwrap_or_default()
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
