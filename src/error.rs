//! Error types for the fallible edges of the engine
//!
//! The analysis functions themselves never fail: too little data is reported
//! as `None`. Errors only come from parsing tags and reading configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unknown tag while parsing one of the closed enums (muscle group, confidence, ...)
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("Unknown {kind}: {value}")]
pub struct ParseError {
  pub kind: String,
  pub value: String,
}

impl ParseError {
  pub fn new(kind: &str, value: &str) -> Self {
    Self {
      kind: kind.to_string(),
      value: value.to_string(),
    }
  }
}

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ConfigError {
  #[error("Invalid value for {0}: {1}")]
  InvalidValue(String, String),

  #[error("Out of range for {0}: {1}")]
  OutOfRange(String, String),
}
