use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// How much weight the caller should put on a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
  High,
  Medium,
  Low,
}

impl std::fmt::Display for Confidence {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::High => write!(f, "high"),
      Self::Medium => write!(f, "medium"),
      Self::Low => write!(f, "low"),
    }
  }
}

impl std::str::FromStr for Confidence {
  type Err = ParseError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "high" => Ok(Self::High),
      "medium" => Ok(Self::Medium),
      "low" => Ok(Self::Low),
      _ => Err(ParseError::new("confidence", s)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_confidence_parse_roundtrip() {
    for c in [Confidence::High, Confidence::Medium, Confidence::Low] {
      assert_eq!(c.to_string().parse::<Confidence>(), Ok(c));
    }
    assert!("certain".parse::<Confidence>().is_err());
  }
}
