//! Engine tunables
//!
//! Defaults match the documented contract values. Host applications can
//! override the windowing and deload knobs through the environment (or a
//! `.env` file).

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::deload_plan::DEFAULT_DELOAD_SET_FACTOR;
use crate::error::ConfigError;
use crate::fatigue::{DEFAULT_LOOKBACK_DAYS, DEFAULT_TREND_WEEKS, FATIGUE_INDEX_SAMPLE_DAYS};

/// ---------------------------------------------------------------------------
/// Environment Keys
/// ---------------------------------------------------------------------------

pub const ENV_FATIGUE_LOOKBACK_DAYS: &str = "LIFT_LOG_FATIGUE_LOOKBACK_DAYS";
pub const ENV_VOLUME_TREND_WEEKS: &str = "LIFT_LOG_VOLUME_TREND_WEEKS";
pub const ENV_DELOAD_SET_FACTOR: &str = "LIFT_LOG_DELOAD_SET_FACTOR";

/// ---------------------------------------------------------------------------
/// Settings
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
  /// Window for the deload verdict
  pub fatigue_lookback_days: i64,
  /// Window for the fatigue index feedback averages
  pub fatigue_index_sample_days: i64,
  /// Weekly buckets fed to the volume trend
  pub volume_trend_weeks: usize,
  /// Share of sets kept in a deload week, in (0, 1]
  pub deload_set_factor: f64,
}

impl Default for EngineSettings {
  fn default() -> Self {
    Self {
      fatigue_lookback_days: DEFAULT_LOOKBACK_DAYS,
      fatigue_index_sample_days: FATIGUE_INDEX_SAMPLE_DAYS,
      volume_trend_weeks: DEFAULT_TREND_WEEKS,
      deload_set_factor: DEFAULT_DELOAD_SET_FACTOR,
    }
  }
}

impl EngineSettings {
  /// Defaults overridden by any `LIFT_LOG_*` variables that are set
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();

    let defaults = Self::default();

    let fatigue_lookback_days =
      read_var(ENV_FATIGUE_LOOKBACK_DAYS)?.unwrap_or(defaults.fatigue_lookback_days);
    if fatigue_lookback_days < 1 {
      return Err(ConfigError::OutOfRange(
        ENV_FATIGUE_LOOKBACK_DAYS.into(),
        fatigue_lookback_days.to_string(),
      ));
    }

    let volume_trend_weeks = read_var(ENV_VOLUME_TREND_WEEKS)?.unwrap_or(defaults.volume_trend_weeks);
    if volume_trend_weeks < 2 {
      return Err(ConfigError::OutOfRange(
        ENV_VOLUME_TREND_WEEKS.into(),
        volume_trend_weeks.to_string(),
      ));
    }

    let deload_set_factor: f64 =
      read_var(ENV_DELOAD_SET_FACTOR)?.unwrap_or(defaults.deload_set_factor);
    if !(deload_set_factor > 0.0 && deload_set_factor <= 1.0) {
      return Err(ConfigError::OutOfRange(
        ENV_DELOAD_SET_FACTOR.into(),
        deload_set_factor.to_string(),
      ));
    }

    let settings = Self {
      fatigue_lookback_days,
      volume_trend_weeks,
      deload_set_factor,
      ..defaults
    };
    debug!(?settings, "engine settings loaded");
    Ok(settings)
  }
}

/// `Ok(None)` when unset or blank
fn read_var<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
  match env::var(key) {
    Ok(raw) if raw.trim().is_empty() => Ok(None),
    Ok(raw) => raw
      .trim()
      .parse()
      .map(Some)
      .map_err(|_| ConfigError::InvalidValue(key.into(), raw)),
    Err(_) => Ok(None),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
