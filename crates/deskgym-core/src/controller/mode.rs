//! Application modes and the sub-state each one owns.
//!
//! [`Mode`] is the flat enumeration the renderer switches on. [`ModeState`]
//! is what the controller actually stores: every variant carries only the
//! data that is meaningful while that mode is active, so a countdown value
//! cannot outlive its countdown and a clear confirmation cannot exist off
//! the Clear tab.

use serde::{Deserialize, Serialize};

use crate::exercise::CompletedExercise;

/// Seconds counted down before an exercise starts.
pub const COUNTDOWN_START: u32 = 3;

pub const CAT_DONE_TEXT: &str = "Claude Code is done!";
pub const CAT_NEEDS_YOU_TEXT: &str = "Claude Code needs you!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Idle,
    Menu,
    Prompting,
    PumpUp,
    Countdown,
    Exercising,
    Paused,
    Summary,
    ExerciseLog,
}

impl Mode {
    pub const ALL: [Mode; 9] = [
        Mode::Idle,
        Mode::Menu,
        Mode::Prompting,
        Mode::PumpUp,
        Mode::Countdown,
        Mode::Exercising,
        Mode::Paused,
        Mode::Summary,
        Mode::ExerciseLog,
    ];

    /// Modes that belong to a running exercise session.
    pub fn is_session(self) -> bool {
        matches!(
            self,
            Mode::PumpUp | Mode::Countdown | Mode::Exercising | Mode::Paused
        )
    }
}

/// Where the menu (and the log browser opened from it) returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Idle,
    Prompting,
}

impl From<Origin> for Mode {
    fn from(origin: Origin) -> Self {
        match origin {
            Origin::Idle => Mode::Idle,
            Origin::Prompting => Mode::Prompting,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuOption {
    Start,
    Log,
}

impl MenuOption {
    pub const ALL: [MenuOption; 2] = [MenuOption::Start, MenuOption::Log];

    pub fn index(self) -> usize {
        match self {
            MenuOption::Start => 0,
            MenuOption::Log => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::Start => "Start Exercise",
            MenuOption::Log => "Exercise Log",
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuState {
    pub selected: MenuOption,
    pub origin: Origin,
}

/// 3-2-1 ticker shown before each exercise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    pub value: u32,
    /// Seconds since the last tick.
    pub timer: f32,
}

impl Default for Countdown {
    fn default() -> Self {
        Self {
            value: COUNTDOWN_START,
            timer: 0.0,
        }
    }
}

impl Countdown {
    /// Advance by `delta_secs`. Returns true once the count reaches zero.
    pub fn tick(&mut self, delta_secs: f32) -> bool {
        self.timer += delta_secs;
        while self.timer >= 1.0 && self.value > 0 {
            self.timer -= 1.0;
            self.value -= 1;
        }
        self.value == 0
    }
}

/// What a pause returns to, with its progress intact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resume {
    Countdown(Countdown),
    Exercising,
}

impl Resume {
    pub fn mode(self) -> Mode {
        match self {
            Resume::Countdown(_) => Mode::Countdown,
            Resume::Exercising => Mode::Exercising,
        }
    }
}

/// Log browser tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogView {
    Today,
    Trend,
    Stats,
    /// Clearing needs two Enters; `confirming` is set after the first.
    Clear { confirming: bool },
}

impl LogView {
    pub const TAB_COUNT: usize = 4;

    pub fn tab(self) -> usize {
        match self {
            LogView::Today => 0,
            LogView::Trend => 1,
            LogView::Stats => 2,
            LogView::Clear { .. } => 3,
        }
    }

    pub fn from_tab(tab: usize) -> Self {
        match tab % Self::TAB_COUNT {
            0 => LogView::Today,
            1 => LogView::Trend,
            2 => LogView::Stats,
            _ => LogView::Clear { confirming: false },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LogView::Today => "TODAY",
            LogView::Trend => "TREND",
            LogView::Stats => "STATS",
            LogView::Clear { .. } => "CLEAR",
        }
    }

    pub fn is_confirming(self) -> bool {
        matches!(self, LogView::Clear { confirming: true })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogBrowser {
    pub view: LogView,
    pub scroll: u32,
    pub origin: Origin,
}

impl LogBrowser {
    pub fn new(origin: Origin) -> Self {
        Self {
            view: LogView::Today,
            scroll: 0,
            origin,
        }
    }

    pub fn next_tab(&mut self) {
        self.switch_tab(self.view.tab() + 1);
    }

    pub fn prev_tab(&mut self) {
        self.switch_tab(self.view.tab() + LogView::TAB_COUNT - 1);
    }

    fn switch_tab(&mut self, tab: usize) {
        self.view = LogView::from_tab(tab);
        self.scroll = 0;
    }
}

/// The controller's current mode together with its sub-state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModeState {
    Idle,
    Menu(MenuState),
    Prompting,
    PumpUp,
    Countdown(Countdown),
    Exercising,
    Paused { resume: Resume },
    Summary,
    ExerciseLog(LogBrowser),
}

impl ModeState {
    pub fn mode(&self) -> Mode {
        match self {
            ModeState::Idle => Mode::Idle,
            ModeState::Menu(_) => Mode::Menu,
            ModeState::Prompting => Mode::Prompting,
            ModeState::PumpUp => Mode::PumpUp,
            ModeState::Countdown(_) => Mode::Countdown,
            ModeState::Exercising => Mode::Exercising,
            ModeState::Paused { .. } => Mode::Paused,
            ModeState::Summary => Mode::Summary,
            ModeState::ExerciseLog(_) => Mode::ExerciseLog,
        }
    }

    /// The mode Esc returns to, for modes that remember one.
    pub fn prev_mode(&self) -> Option<Mode> {
        match self {
            ModeState::Menu(menu) => Some(menu.origin.into()),
            ModeState::ExerciseLog(browser) => Some(browser.origin.into()),
            ModeState::Paused { resume } => Some(resume.mode()),
            _ => None,
        }
    }
}

/// Banner shown above the cat while a session is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatAlert {
    pub text: String,
}

/// Exercises done since the session started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub completed: Vec<CompletedExercise>,
    pub first_exercise: bool,
    pub cat_alert: Option<CatAlert>,
}

impl Default for Round {
    fn default() -> Self {
        Self {
            completed: Vec::new(),
            first_exercise: true,
            cat_alert: None,
        }
    }
}

impl Round {
    pub fn total_duration_secs(&self) -> f32 {
        self.completed.iter().map(|e| e.duration_secs).sum()
    }
}

/// What the summary screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoundSummary<'a> {
    pub exercises: &'a [CompletedExercise],
    pub total_duration_secs: f32,
}
