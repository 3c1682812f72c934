//! Tracing subscriber setup for host applications
//!
//! The engine itself only emits `tracing` events. Hosts that do not install
//! their own subscriber can call [`init`] once at startup.

use std::env;

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
  /// Filter directive, e.g. `info` or `lift_log=debug`
  pub level: String,
  pub with_target: bool,
  pub ansi: bool,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: DEFAULT_LEVEL.to_string(),
      with_target: true,
      ansi: true,
    }
  }
}

impl LoggingConfig {
  /// `RUST_LOG` for the filter, `NO_COLOR` disables ANSI output
  pub fn from_env() -> Self {
    Self {
      level: env::var("RUST_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
      ansi: env::var("NO_COLOR").is_err(),
      ..Self::default()
    }
  }

  fn filter(&self) -> EnvFilter {
    EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
  }

  /// Install the global fmt subscriber
  ///
  /// Returns `false` when a subscriber was already installed, in which case
  /// the existing one is left untouched.
  pub fn init(&self) -> bool {
    fmt()
      .with_env_filter(self.filter())
      .with_target(self.with_target)
      .with_ansi(self.ansi)
      .try_init()
      .is_ok()
  }
}

/// Install a subscriber configured from the environment; later calls are no-ops
pub fn init() -> bool {
  LoggingConfig::from_env().init()
}

/// Install a subscriber with an explicit filter directive
pub fn init_with_level(level: &str) -> bool {
  LoggingConfig {
    level: level.to_string(),
    ..LoggingConfig::from_env()
  }
  .init()
}
