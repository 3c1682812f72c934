pub mod confidence;
pub mod exercise;
pub mod plan;
pub mod set_record;

pub use confidence::Confidence;
pub use exercise::{Exercise, MuscleGroup};
pub use plan::{ExercisePrescription, Microcycle};
pub use set_record::{estimate_one_rep_max, Feedback, SetRecord};
