use serde::{Deserialize, Serialize};

use crate::controller::Mode;

/// Every observable change of the mode controller produces an Event.
/// The renderer polls for events; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ModeChanged {
        from: Mode,
        to: Mode,
    },
    /// The character started waving for attention.
    PromptRaised,
    /// The prompt went away. `cooldown` is true only for an explicit refusal.
    PromptDismissed {
        cooldown: bool,
    },
    ExerciseSelected {
        index: usize,
        name: String,
    },
    /// An exercise ran long enough to be credited.
    ExerciseRecorded {
        name: String,
        reps: String,
        duration_secs: f32,
    },
    /// An exercise ended too early to be credited.
    ExerciseSkipped {
        name: String,
        elapsed_secs: f32,
    },
    /// The exercise log could not be written. The round still holds the entry.
    PersistFailed {
        message: String,
    },
    CatAlertRaised {
        text: String,
    },
    CatAlertCleared,
    LogCleared,
    RoundFinished {
        exercises: usize,
        total_duration_secs: f32,
    },
}
