//! Exercise roster and completed-exercise records.
//!
//! The roster is a JSON array loaded once at startup:
//!
//! ```json
//! [{ "name": "Chair Dips", "anim_row": 3, "reps": "10 reps" }]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::animation::AnimationKind;
use crate::error::{ConfigError, Result, ValidationError};

/// One exercise the character can lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseConfig {
    pub name: String,
    /// Spritesheet row of the exercise animation.
    pub anim_row: usize,
    /// Human description of the work, e.g. "10 reps".
    pub reps: String,
}

impl ExerciseConfig {
    pub fn new(name: impl Into<String>, animation: AnimationKind, reps: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            anim_row: animation.row(),
            reps: reps.into(),
        }
    }

    pub fn animation(&self) -> Option<AnimationKind> {
        AnimationKind::from_row(self.anim_row)
    }

    /// Speech bubble shown while the exercise plays.
    pub fn bubble_text(&self) -> String {
        format!("Let's do {}!\n{}", self.name, self.reps)
    }
}

/// An exercise that ran long enough to be credited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedExercise {
    pub name: String,
    pub reps: String,
    pub duration_secs: f32,
}

/// Read and validate a roster file.
///
/// # Errors
/// Fails if the file cannot be read or parsed, is empty, or names a row
/// that is not an exercise animation.
pub fn load_roster(path: &Path) -> Result<Vec<ExerciseConfig>> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let roster: Vec<ExerciseConfig> = serde_json::from_str(&content)
        .map_err(|e| ConfigError::ParseFailed(format!("{}: {e}", path.display())))?;

    if roster.is_empty() {
        return Err(ValidationError::EmptyCollection(format!(
            "no exercises found in {}",
            path.display()
        ))
        .into());
    }

    for (i, exercise) in roster.iter().enumerate() {
        match exercise.animation() {
            Some(kind) if kind.is_exercise() => {}
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: format!("[{i}].anim_row"),
                    message: format!(
                        "row {} is not an exercise animation ({})",
                        exercise.anim_row, exercise.name
                    ),
                }
                .into())
            }
        }
    }

    Ok(roster)
}

/// Load the roster at `path`, or fall back to the built-in one.
pub fn load_roster_or_default(path: Option<&Path>) -> Vec<ExerciseConfig> {
    let Some(path) = path else {
        return default_roster();
    };
    match load_roster(path) {
        Ok(roster) => roster,
        Err(e) => {
            warn!("{e} (using built-in exercises)");
            default_roster()
        }
    }
}

/// Built-in roster, one entry per exercise animation.
pub fn default_roster() -> Vec<ExerciseConfig> {
    use AnimationKind::*;
    vec![
        ExerciseConfig::new("Chair Dips", ChairDips, "10 reps"),
        ExerciseConfig::new("Arm Circles", ArmCircles, "20 forward + 20 backward"),
        ExerciseConfig::new("Knee Raises", KneeRaises, "15 each leg"),
        ExerciseConfig::new("Spinal Twist", SpinalTwist, "5 each side"),
        ExerciseConfig::new("Glute Squeeze", GluteSqueeze, "15 reps, hold 3s"),
        ExerciseConfig::new("Shoulder Rolls", ShoulderRolls, "10 forward + 10 backward"),
        ExerciseConfig::new("Leg Extensions", LegExtensions, "12 each leg"),
        ExerciseConfig::new("Neck Stretch", NeckStretch, "20s each side"),
        ExerciseConfig::new("Desk Push-Ups", DeskPushUps, "12 reps"),
        ExerciseConfig::new("Squats", Squats, "15 reps"),
        ExerciseConfig::new("Calf Raises", CalfRaises, "20 reps"),
        ExerciseConfig::new("Wall Sit", WallSit, "30 seconds"),
        ExerciseConfig::new("Torso Rotation", TorsoRotation, "10 each side"),
        ExerciseConfig::new("Reverse Lunges", ReverseLunges, "8 each leg"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn roster_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_valid_roster() {
        let file = roster_file(
            r#"[{"name":"Chair Dips","anim_row":3,"reps":"10 reps"},
                {"name":"Squats","anim_row":13,"reps":"15 reps"}]"#,
        );
        let roster = load_roster(file.path()).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[1].animation(), Some(AnimationKind::Squats));
    }

    #[test]
    fn rejects_empty_roster() {
        let file = roster_file("[]");
        let err = load_roster(file.path()).unwrap_err();
        assert!(err.to_string().contains("no exercises"));
    }

    #[test]
    fn rejects_non_exercise_rows() {
        let file = roster_file(r#"[{"name":"Wave","anim_row":1,"reps":"-"}]"#);
        assert!(load_roster(file.path()).is_err());
        let file = roster_file(r#"[{"name":"Ghost","anim_row":42,"reps":"-"}]"#);
        assert!(load_roster(file.path()).is_err());
    }

    #[test]
    fn falls_back_to_built_in_roster() {
        let file = roster_file("not json");
        assert_eq!(load_roster_or_default(Some(file.path())), default_roster());
        assert_eq!(load_roster_or_default(None), default_roster());
    }

    #[test]
    fn built_in_roster_only_uses_exercise_rows() {
        for exercise in default_roster() {
            assert!(exercise.animation().is_some_and(|k| k.is_exercise()));
        }
    }

    #[test]
    fn bubble_text_names_the_exercise() {
        let ex = ExerciseConfig::new("Squats", AnimationKind::Squats, "15 reps");
        assert_eq!(ex.bubble_text(), "Let's do Squats!\n15 reps");
    }
}
