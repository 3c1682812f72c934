use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Primary muscle group an exercise is programmed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
  Chest,
  Back,
  Shoulders,
  Biceps,
  Triceps,
  Forearms,
  Traps,
  Quadriceps,
  Hamstrings,
  Glutes,
  Calves,
  Abs,
}

impl MuscleGroup {
  /// Lower-body groups progress load in bigger jumps
  pub fn is_lower_body(&self) -> bool {
    matches!(
      self,
      MuscleGroup::Quadriceps | MuscleGroup::Hamstrings | MuscleGroup::Glutes | MuscleGroup::Calves
    )
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      MuscleGroup::Chest => "chest",
      MuscleGroup::Back => "back",
      MuscleGroup::Shoulders => "shoulders",
      MuscleGroup::Biceps => "biceps",
      MuscleGroup::Triceps => "triceps",
      MuscleGroup::Forearms => "forearms",
      MuscleGroup::Traps => "traps",
      MuscleGroup::Quadriceps => "quadriceps",
      MuscleGroup::Hamstrings => "hamstrings",
      MuscleGroup::Glutes => "glutes",
      MuscleGroup::Calves => "calves",
      MuscleGroup::Abs => "abs",
    }
  }
}

impl std::fmt::Display for MuscleGroup {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for MuscleGroup {
  type Err = ParseError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "chest" => Ok(Self::Chest),
      "back" => Ok(Self::Back),
      "shoulders" => Ok(Self::Shoulders),
      "biceps" => Ok(Self::Biceps),
      "triceps" => Ok(Self::Triceps),
      "forearms" => Ok(Self::Forearms),
      "traps" => Ok(Self::Traps),
      "quadriceps" | "quads" => Ok(Self::Quadriceps),
      "hamstrings" => Ok(Self::Hamstrings),
      "glutes" => Ok(Self::Glutes),
      "calves" => Ok(Self::Calves),
      "abs" => Ok(Self::Abs),
      _ => Err(ParseError::new("muscle group", s)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
  pub id: String,
  pub name: String,
  pub muscle_group: MuscleGroup,
}

impl Exercise {
  pub fn new(id: &str, name: &str, muscle_group: MuscleGroup) -> Self {
    Self {
      id: id.to_string(),
      name: name.to_string(),
      muscle_group,
    }
  }
}
