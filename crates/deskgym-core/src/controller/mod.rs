//! Application mode state machine.
//!
//! Decides what the character is doing at any instant: idling, prompting
//! the user, leading an exercise session, or showing the exercise log.

mod engine;
mod input;
mod mode;
mod selection;
mod transitions;

pub use engine::{ControllerSettings, ModeController, MIN_CREDIT_SECS};
pub use input::{Key, Keys};
pub use mode::{
    CatAlert, Countdown, LogBrowser, LogView, MenuOption, MenuState, Mode, ModeState, Origin,
    Resume, Round, RoundSummary, CAT_DONE_TEXT, CAT_NEEDS_YOU_TEXT, COUNTDOWN_START,
};
pub use selection::{ExercisePicker, RECENT_MEMORY};
pub use transitions::{key_priority, transition, Action, Trigger};
