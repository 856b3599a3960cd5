//! The mode transition graph as data.
//!
//! `transition` maps the current mode and a trigger to the action the
//! controller performs. Anything not listed is ignored. Keys are checked in
//! the order given by `key_priority`, first match wins.

use serde::{Deserialize, Serialize};

use super::input::Key;
use super::mode::Mode;

/// Something that can move the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Key(Key),
    /// An activity event qualified for a prompt and the cooldown has passed.
    PromptQualified,
    /// Activity that needs the user back in the assistant session.
    AttentionNeeded,
    CountdownFinished,
    ExerciseTimeUp,
    /// The armed pump-up animation played to its end.
    AnimationFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    OpenMenu,
    CloseMenu,
    MenuPrev,
    MenuNext,
    MenuSelect,
    RaisePrompt,
    /// Start a round from the prompt.
    AcceptPrompt,
    /// Explicit refusal; starts the cooldown.
    DeclinePrompt,
    AutoDismissPrompt,
    StartCountdown,
    StartExercise,
    /// Credit the current exercise, pick the next one and pump up again.
    NextExercise,
    Pause,
    Resume,
    /// Credit the current exercise and show the summary.
    EndRound,
    DismissSummary,
    CloseLog,
    PrevTab,
    NextTab,
    ScrollUp,
    ScrollDown,
    ConfirmClear,
}

pub fn transition(mode: Mode, trigger: Trigger) -> Option<Action> {
    use Key::*;
    use Trigger::Key as K;

    let action = match (mode, trigger) {
        (Mode::Idle, K(Tab)) => Action::OpenMenu,
        (Mode::Idle, Trigger::PromptQualified) => Action::RaisePrompt,

        (Mode::Menu, K(Escape)) => Action::CloseMenu,
        (Mode::Menu, K(Up | W)) => Action::MenuPrev,
        (Mode::Menu, K(Down | S)) => Action::MenuNext,
        (Mode::Menu, K(Enter | Space)) => Action::MenuSelect,

        (Mode::Prompting, K(Y | Enter)) => Action::AcceptPrompt,
        (Mode::Prompting, K(N | Escape)) => Action::DeclinePrompt,
        (Mode::Prompting, K(Tab)) => Action::OpenMenu,
        (Mode::Prompting, Trigger::AttentionNeeded) => Action::AutoDismissPrompt,

        (Mode::PumpUp, Trigger::AnimationFinished) => Action::StartCountdown,

        (Mode::Countdown, K(Escape)) => Action::Pause,
        (Mode::Countdown, Trigger::CountdownFinished) => Action::StartExercise,

        (Mode::Exercising, K(Tab)) => Action::NextExercise,
        (Mode::Exercising, K(Escape)) => Action::Pause,
        (Mode::Exercising, Trigger::ExerciseTimeUp) => Action::NextExercise,

        (Mode::Paused, K(Enter)) => Action::EndRound,
        (Mode::Paused, K(Escape)) => Action::Resume,

        (Mode::Summary, K(Escape | Enter)) => Action::DismissSummary,

        (Mode::ExerciseLog, K(Escape)) => Action::CloseLog,
        (Mode::ExerciseLog, K(Left)) => Action::PrevTab,
        (Mode::ExerciseLog, K(Right)) => Action::NextTab,
        (Mode::ExerciseLog, K(Enter)) => Action::ConfirmClear,
        (Mode::ExerciseLog, K(Up)) => Action::ScrollUp,
        (Mode::ExerciseLog, K(Down)) => Action::ScrollDown,

        _ => return None,
    };
    Some(action)
}

/// Keys a mode listens to, highest priority first.
pub fn key_priority(mode: Mode) -> &'static [Key] {
    use Key::*;
    match mode {
        Mode::Idle => &[Tab],
        Mode::Menu => &[Escape, Up, W, Down, S, Enter, Space],
        Mode::Prompting => &[Y, Enter, N, Escape, Tab],
        Mode::PumpUp => &[],
        Mode::Countdown => &[Escape],
        Mode::Exercising => &[Tab, Escape],
        Mode::Paused => &[Enter, Escape],
        Mode::Summary => &[Escape, Enter],
        Mode::ExerciseLog => &[Escape, Left, Right, Enter, Up, Down],
    }
}
