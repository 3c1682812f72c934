//! Fatigue and deload analysis
//!
//! Two cooperating pieces:
//! - a windowed recovery summary (default 14 days) feeding the deload verdict
//! - a long-horizon fatigue index (0-100) from a 2-week feedback sample and
//!   the weekly volume trend
//!
//! The two treat missing feedback differently: the window and the
//! verdict ignore absent values, the fatigue index counts them as 0.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::set_record::{distinct_sessions, mean_present, within_days};
use crate::models::{Confidence, SetRecord};

pub const DEFAULT_LOOKBACK_DAYS: i64 = 14;
pub const FATIGUE_INDEX_SAMPLE_DAYS: i64 = 14;
pub const DEFAULT_TREND_WEEKS: usize = 4;

/// Records needed in the window before anything is said
const MIN_WINDOW_RECORDS: usize = 3;
const MIN_VERDICT_SESSIONS: usize = 3;

/// Second-half e1RM below this share of the first half counts as a decline
const DECLINE_RATIO: f64 = 0.95;
const STREAK_FOR_DELOAD: usize = 3;

/// ---------------------------------------------------------------------------
/// Fatigue Window
/// ---------------------------------------------------------------------------

/// Recovery summary over a rolling window of recent sets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueWindow {
  pub avg_soreness: Option<f64>,
  pub avg_joint_pain: Option<f64>,
  pub avg_pump: Option<f64>,
  pub avg_rir: f64,

  /// Mean e1RM of the later half fell below 95% of the earlier half
  pub performance_decline: bool,

  /// Consecutive high-fatigue records counted back from the most recent one
  pub fatigue_streak: usize,

  pub records_analyzed: usize,
  pub sessions_analyzed: usize,
}

impl FatigueWindow {
  /// Summarize the records performed within `lookback_days` of `now`
  ///
  /// `None` when fewer than 3 records fall in the window.
  pub fn compute(records: &[SetRecord], now: DateTime<Utc>, lookback_days: i64) -> Option<Self> {
    let mut window: Vec<&SetRecord> = records
      .iter()
      .filter(|r| within_days(now, r.performed_at, lookback_days))
      .collect();

    if window.len() < MIN_WINDOW_RECORDS {
      debug!(records = window.len(), "fatigue window has insufficient data");
      return None;
    }

    window.sort_by(|a, b| a.performed_at.cmp(&b.performed_at));

    let avg_rir = window.iter().map(|r| r.rir).sum::<f64>() / window.len() as f64;

    Some(Self {
      avg_soreness: mean_present(window.iter().map(|r| r.soreness())),
      avg_joint_pain: mean_present(window.iter().map(|r| r.joint_pain())),
      avg_pump: mean_present(window.iter().map(|r| r.pump())),
      avg_rir,
      performance_decline: Self::detect_decline(&window),
      fatigue_streak: Self::count_fatigue_streak(&window),
      records_analyzed: window.len(),
      sessions_analyzed: distinct_sessions(window.iter().copied()),
    })
  }

  /// True when any exercise declined across its own chronological halves
  fn detect_decline(chronological: &[&SetRecord]) -> bool {
    let mut by_exercise: BTreeMap<&str, Vec<&SetRecord>> = BTreeMap::new();
    for &record in chronological {
      by_exercise
        .entry(record.exercise_id.as_str())
        .or_default()
        .push(record);
    }

    by_exercise.values().any(|records| halves_declined(records))
  }

  fn count_fatigue_streak(chronological: &[&SetRecord]) -> usize {
    chronological
      .iter()
      .rev()
      .take_while(|r| is_high_fatigue(r))
      .count()
  }
}

/// Mean e1RM of the later half below 95% of the earlier; skipped when a half has none
fn halves_declined(chronological: &[&SetRecord]) -> bool {
  let mid = chronological.len() / 2;
  let (first, second) = chronological.split_at(mid);

  let first_avg = mean_present(first.iter().map(|r| r.estimated_1rm));
  let second_avg = mean_present(second.iter().map(|r| r.estimated_1rm));

  match (first_avg, second_avg) {
    (Some(before), Some(after)) => after < before * DECLINE_RATIO,
    _ => false,
  }
}

fn is_high_fatigue(record: &SetRecord) -> bool {
  record.soreness().is_some_and(|s| s >= 4.0) || record.joint_pain().is_some_and(|p| p >= 3.0)
}

/// ---------------------------------------------------------------------------
/// Deload Verdict
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeloadSeverity {
  None,
  Mild,
  Moderate,
  High,
}

impl std::fmt::Display for DeloadSeverity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::None => write!(f, "none"),
      Self::Mild => write!(f, "mild"),
      Self::Moderate => write!(f, "moderate"),
      Self::High => write!(f, "high"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeloadRecommendation {
  pub needs_deload: bool,
  pub severity: DeloadSeverity,
  pub reason: String,
  pub indicators: Vec<String>,
  pub confidence: Confidence,
}

/// Decide whether a deload week is warranted from the recovery window
pub fn recommend_deload(window: &FatigueWindow) -> DeloadRecommendation {
  if window.sessions_analyzed < MIN_VERDICT_SESSIONS {
    return DeloadRecommendation {
      needs_deload: false,
      severity: DeloadSeverity::None,
      reason: format!(
        "Insufficient data: {} session(s) in window, need {}",
        window.sessions_analyzed, MIN_VERDICT_SESSIONS
      ),
      indicators: Vec::new(),
      confidence: Confidence::Low,
    };
  }

  let mut severity = DeloadSeverity::None;
  let mut indicators = Vec::new();

  if let Some(soreness) = window.avg_soreness.filter(|s| *s >= 4.0) {
    indicators.push(format!("High average soreness ({:.1}/5)", soreness));
    severity = severity.max(DeloadSeverity::Moderate);
  }

  if let Some(pain) = window.avg_joint_pain.filter(|p| *p >= 3.0) {
    indicators.push(format!("Elevated joint pain ({:.1}/5)", pain));
    severity = if severity >= DeloadSeverity::Moderate {
      DeloadSeverity::High
    } else {
      DeloadSeverity::Moderate
    };
  }

  if let Some(pump) = window.avg_pump.filter(|p| *p <= 2.0) {
    indicators.push(format!("Poor pump quality ({:.1}/5)", pump));
  }

  if window.performance_decline {
    indicators.push("Estimated 1RM dropped more than 5% across the window".to_string());
    severity = if severity == DeloadSeverity::None {
      DeloadSeverity::Mild
    } else {
      DeloadSeverity::High
    };
  }

  if window.fatigue_streak >= STREAK_FOR_DELOAD {
    indicators.push(format!(
      "{} consecutive high-fatigue sets",
      window.fatigue_streak
    ));
    severity = DeloadSeverity::High;
  }

  if window.avg_rir < 1.0 {
    indicators.push(format!(
      "Training very close to failure (average RIR {:.1})",
      window.avg_rir
    ));
  }

  let (needs_deload, confidence) = match severity {
    DeloadSeverity::High => (true, Confidence::High),
    DeloadSeverity::Moderate if indicators.len() >= 2 => (true, Confidence::Medium),
    DeloadSeverity::Mild if indicators.len() >= 3 => (true, Confidence::Medium),
    _ => (false, Confidence::Medium),
  };

  let reason = if needs_deload {
    format!("Deload recommended ({} fatigue): {}", severity, indicators.join("; "))
  } else if indicators.is_empty() {
    "No meaningful fatigue signals - continue training as planned".to_string()
  } else {
    format!(
      "Some fatigue signals but below deload threshold: {}",
      indicators.join("; ")
    )
  };

  info!(
    needs_deload,
    severity = %severity,
    indicators = indicators.len(),
    "deload verdict"
  );

  DeloadRecommendation {
    needs_deload,
    severity,
    reason,
    indicators,
    confidence,
  }
}

/// ---------------------------------------------------------------------------
/// Fatigue Index
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatigueLevel {
  Low,
  Moderate,
  High,
  Severe,
}

impl FatigueLevel {
  pub fn from_index(index: f64) -> Self {
    match index {
      i if i < 30.0 => FatigueLevel::Low,
      i if i < 50.0 => FatigueLevel::Moderate,
      i if i < 70.0 => FatigueLevel::High,
      _ => FatigueLevel::Severe,
    }
  }

  pub fn recommendation(&self) -> &'static str {
    match self {
      FatigueLevel::Low => "Fatigue is low - keep progressing as planned",
      FatigueLevel::Moderate => "Moderate fatigue - prioritize sleep and nutrition, hold volume steady",
      FatigueLevel::High => "High fatigue - reduce volume this week and monitor recovery",
      FatigueLevel::Severe => "Severe fatigue - take a deload week before continuing",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTrend {
  Improving,
  Stable,
  Declining,
}

impl PerformanceTrend {
  /// Contribution to the fatigue index
  fn fatigue_points(&self) -> f64 {
    match self {
      PerformanceTrend::Improving => 0.0,
      PerformanceTrend::Stable => 10.0,
      PerformanceTrend::Declining => 20.0,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueMetrics {
  /// Composite 0-100
  pub fatigue_index: f64,
  pub level: FatigueLevel,
  pub avg_soreness: f64,
  pub avg_joint_pain: f64,
  pub performance_trend: PerformanceTrend,
  pub recommendation: String,
}

/// Compute the composite fatigue index
///
/// `weekly_volumes` is ordered oldest first (see [`weekly_volume_series`]).
/// Soreness and joint pain come from the last 14 days, absent feedback counts as 0.
pub fn compute_fatigue_index(
  records: &[SetRecord],
  weekly_volumes: &[f64],
  now: DateTime<Utc>,
) -> FatigueMetrics {
  compute_fatigue_index_over(records, weekly_volumes, now, FATIGUE_INDEX_SAMPLE_DAYS)
}

/// Same as [`compute_fatigue_index`] with a custom feedback sample window
pub fn compute_fatigue_index_over(
  records: &[SetRecord],
  weekly_volumes: &[f64],
  now: DateTime<Utc>,
  sample_days: i64,
) -> FatigueMetrics {
  let sample: Vec<&SetRecord> = records
    .iter()
    .filter(|r| within_days(now, r.performed_at, sample_days))
    .collect();

  let (avg_soreness, avg_joint_pain) = if sample.is_empty() {
    (0.0, 0.0)
  } else {
    let n = sample.len() as f64;
    (
      sample.iter().map(|r| r.soreness().unwrap_or(0.0)).sum::<f64>() / n,
      sample.iter().map(|r| r.joint_pain().unwrap_or(0.0)).sum::<f64>() / n,
    )
  };

  let soreness_points = avg_soreness / 5.0 * 30.0;
  let joint_pain_points = avg_joint_pain / 5.0 * 30.0;
  let volume_points = volume_increase_points(weekly_volumes);
  let performance_trend = classify_trend(weekly_volumes);

  let fatigue_index =
    (soreness_points + joint_pain_points + volume_points + performance_trend.fatigue_points())
      .clamp(0.0, 100.0);
  let level = FatigueLevel::from_index(fatigue_index);

  debug!(
    fatigue_index,
    soreness_points, joint_pain_points, volume_points, "fatigue index computed"
  );

  FatigueMetrics {
    fatigue_index,
    level,
    avg_soreness,
    avg_joint_pain,
    performance_trend,
    recommendation: level.recommendation().to_string(),
  }
}

/// Up to 20 points for a week-over-week volume increase
fn volume_increase_points(weekly_volumes: &[f64]) -> f64 {
  match weekly_volumes {
    [.., previous, last] if *previous > 0.0 => {
      let ratio = (last - previous) / previous;
      (ratio * 20.0).clamp(0.0, 20.0)
    }
    _ => 0.0,
  }
}

/// Classify the weekly volume trend (oldest first)
///
/// Mean of the last two weeks against the mean of the earliest two, or just the
/// earliest week when only three are available. Fewer than three weeks is stable.
pub fn classify_trend(weekly_volumes: &[f64]) -> PerformanceTrend {
  let n = weekly_volumes.len();
  if n < 3 {
    return PerformanceTrend::Stable;
  }

  let recent = (weekly_volumes[n - 1] + weekly_volumes[n - 2]) / 2.0;
  let early = if n == 3 {
    weekly_volumes[0]
  } else {
    (weekly_volumes[0] + weekly_volumes[1]) / 2.0
  };

  if early <= 0.0 {
    return PerformanceTrend::Stable;
  }

  let change = (recent - early) / early;
  if change > 0.10 {
    PerformanceTrend::Improving
  } else if change < -0.10 {
    PerformanceTrend::Declining
  } else {
    PerformanceTrend::Stable
  }
}

/// Completed-set counts per 7-day bucket ending at `now`, oldest bucket first
pub fn weekly_volume_series(records: &[SetRecord], now: DateTime<Utc>, weeks: usize) -> Vec<f64> {
  let mut series = vec![0.0; weeks];

  for record in records {
    let age_days = (now - record.performed_at).num_days();
    if age_days < 0 {
      continue;
    }
    let weeks_ago = (age_days / 7) as usize;
    if weeks_ago < weeks {
      series[weeks - 1 - weeks_ago] += 1.0;
    }
  }

  series
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
