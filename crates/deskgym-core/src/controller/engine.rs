//! Mode controller implementation.
//!
//! The controller is a frame-driven state machine. It owns the animation
//! sequencer and the exercise roster; the caller feeds it activity events,
//! pressed keys and frame deltas, and reads state back for drawing.
//!
//! ## Frame order
//!
//! ```text
//! activity event (at most one) -> input -> controller timers -> animation
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = ModeController::new(default_roster(), ControllerSettings::default())
//!     .with_store(Box::new(ExerciseLog::open()?));
//! controller.attach_feed(feed);
//! // In the render loop:
//! controller.frame(dt, keys);
//! for event in controller.drain_events() { /* ... */ }
//! ```

use std::slice;

use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use tracing::{debug, info, warn};

use super::input::Keys;
use super::mode::{
    CatAlert, Countdown, LogBrowser, LogView, MenuOption, MenuState, Mode, ModeState, Origin,
    Resume, Round, RoundSummary, CAT_DONE_TEXT, CAT_NEEDS_YOU_TEXT,
};
use super::selection::ExercisePicker;
use super::transitions::{key_priority, transition, Action, Trigger};
use crate::activity::{ActivityEvent, ActivityFeed, ActivityKind, ActivityMonitor};
use crate::animation::{AnimationKind, AnimationSequencer, Playback};
use crate::events::Event;
use crate::exercise::{CompletedExercise, ExerciseConfig};
use crate::storage::{Config, ExerciseStore};

/// Exercises shorter than this are not credited.
pub const MIN_CREDIT_SECS: f32 = 10.0;

/// Tunables for prompting and exercise length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSettings {
    /// Seconds after an explicit dismiss during which no prompt is raised.
    pub cooldown_secs: f32,
    /// Consecutive tool calls needed to raise a prompt.
    pub streak_threshold: u32,
    /// Seconds before an exercise auto-advances.
    pub exercise_duration_secs: f32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            cooldown_secs: 60.0,
            streak_threshold: 3,
            exercise_duration_secs: 45.0,
        }
    }
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            cooldown_secs: config.prompt.cooldown_seconds,
            streak_threshold: config.prompt.streak_threshold,
            exercise_duration_secs: config.exercise.duration_seconds,
        }
    }
}

pub struct ModeController<R = Mcg128Xsl64> {
    settings: ControllerSettings,
    roster: Vec<ExerciseConfig>,
    state: ModeState,
    round: Option<Round>,
    current_exercise: usize,
    picker: ExercisePicker,
    /// Seconds since the controller was created.
    elapsed: f32,
    last_dismiss: Option<f32>,
    streak: u32,
    exercise_timer: f32,
    animation: AnimationSequencer<R>,
    monitor: ActivityMonitor,
    store: Option<Box<dyn ExerciseStore>>,
    feed: Option<ActivityFeed>,
    rng: R,
    events: Vec<Event>,
}

impl ModeController<Mcg128Xsl64> {
    pub fn new(roster: Vec<ExerciseConfig>, settings: ControllerSettings) -> Self {
        Self::from_parts(
            roster,
            settings,
            Mcg128Xsl64::from_entropy(),
            AnimationSequencer::new(),
        )
    }

    /// Deterministic controller; the same seed replays the same picks.
    pub fn seeded(roster: Vec<ExerciseConfig>, settings: ControllerSettings, seed: u64) -> Self {
        Self::from_parts(
            roster,
            settings,
            Mcg128Xsl64::seed_from_u64(seed),
            AnimationSequencer::seeded(seed.wrapping_add(1)),
        )
    }
}

impl<R: Rng + SeedableRng> ModeController<R> {
    /// The sequencer gets its own stream, seeded from the first draw of `rng`.
    pub fn with_rng(roster: Vec<ExerciseConfig>, settings: ControllerSettings, mut rng: R) -> Self {
        let animation = AnimationSequencer::with_rng(R::seed_from_u64(rng.gen()));
        Self::from_parts(roster, settings, rng, animation)
    }
}

impl<R: Rng> ModeController<R> {
    pub fn from_parts(
        roster: Vec<ExerciseConfig>,
        settings: ControllerSettings,
        rng: R,
        animation: AnimationSequencer<R>,
    ) -> Self {
        Self {
            settings,
            roster,
            state: ModeState::Idle,
            round: None,
            current_exercise: 0,
            picker: ExercisePicker::new(),
            elapsed: 0.0,
            last_dismiss: None,
            streak: 0,
            exercise_timer: 0.0,
            animation,
            monitor: ActivityMonitor::new(),
            store: None,
            feed: None,
            rng,
            events: Vec::new(),
        }
    }

    /// Persist credited exercises to `store`.
    pub fn with_store(mut self, store: Box<dyn ExerciseStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Drain activity events from `feed` in [`frame`](Self::frame).
    pub fn attach_feed(&mut self, feed: ActivityFeed) {
        self.feed = Some(feed);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn state(&self) -> &ModeState {
        &self.state
    }

    pub fn prev_mode(&self) -> Option<Mode> {
        self.state.prev_mode()
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn roster(&self) -> &[ExerciseConfig] {
        &self.roster
    }

    pub fn selected_option(&self) -> Option<MenuOption> {
        match &self.state {
            ModeState::Menu(menu) => Some(menu.selected),
            _ => None,
        }
    }

    pub fn current_exercise_index(&self) -> Option<usize> {
        (!self.roster.is_empty()).then_some(self.current_exercise)
    }

    pub fn current_exercise(&self) -> Option<&ExerciseConfig> {
        self.roster.get(self.current_exercise)
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn round_summary(&self) -> RoundSummary<'_> {
        match &self.round {
            Some(round) => RoundSummary {
                exercises: &round.completed,
                total_duration_secs: round.total_duration_secs(),
            },
            None => RoundSummary {
                exercises: &[],
                total_duration_secs: 0.0,
            },
        }
    }

    /// Countdown value, also while a countdown is paused.
    pub fn countdown_value(&self) -> Option<u32> {
        match &self.state {
            ModeState::Countdown(c) | ModeState::Paused { resume: Resume::Countdown(c) } => {
                Some(c.value)
            }
            _ => None,
        }
    }

    pub fn cat_alert(&self) -> Option<&CatAlert> {
        self.round.as_ref().and_then(|r| r.cat_alert.as_ref())
    }

    pub fn log_browser(&self) -> Option<&LogBrowser> {
        match &self.state {
            ModeState::ExerciseLog(browser) => Some(browser),
            _ => None,
        }
    }

    pub fn is_first_exercise(&self) -> bool {
        self.round.as_ref().map_or(true, |r| r.first_exercise)
    }

    pub fn exercise_timer(&self) -> f32 {
        self.exercise_timer
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// True while an explicit dismiss is still suppressing prompts.
    pub fn in_cooldown(&self) -> bool {
        self.last_dismiss
            .is_some_and(|at| self.elapsed - at < self.settings.cooldown_secs)
    }

    pub fn activity(&self) -> &ActivityMonitor {
        &self.monitor
    }

    pub fn animation(&self) -> &AnimationSequencer<R> {
        &self.animation
    }

    /// Direct sequencer access for debug frame stepping.
    pub fn animation_mut(&mut self) -> &mut AnimationSequencer<R> {
        &mut self.animation
    }

    pub fn store(&self) -> Option<&dyn ExerciseStore> {
        self.store.as_deref()
    }

    /// True when no feed is attached or the attached one has closed.
    pub fn feed_closed(&self) -> bool {
        self.feed.as_ref().map_or(true, ActivityFeed::is_closed)
    }

    /// Take every event produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Run one frame: one activity event, input, timers, animation.
    /// Returns whether input was consumed.
    pub fn frame(&mut self, delta_secs: f32, keys: Keys) -> bool {
        if let Some(event) = self.feed.as_mut().and_then(ActivityFeed::poll) {
            self.handle_event(&event);
        }
        let consumed = self.handle_input(keys);
        self.update(delta_secs);
        if self.animation.update(delta_secs) == Playback::Finished {
            self.fire(Trigger::AnimationFinished);
        }
        consumed
    }

    /// Apply the highest-priority pressed key the current mode handles.
    pub fn handle_input(&mut self, keys: Keys) -> bool {
        for &key in key_priority(self.mode()) {
            if keys.is_pressed(key) && self.fire(Trigger::Key(key)) {
                return true;
            }
        }
        false
    }

    pub fn handle_event(&mut self, event: &ActivityEvent) {
        let kind = event.kind;
        self.monitor.handle_event(event);

        if self.mode().is_session() {
            match kind {
                ActivityKind::TurnComplete => self.raise_cat_alert(CAT_DONE_TEXT),
                ActivityKind::AskUser | ActivityKind::PermissionEscalation => {
                    self.raise_cat_alert(CAT_NEEDS_YOU_TEXT)
                }
                ActivityKind::Quest => self.clear_cat_alert(),
                _ => {}
            }
        }

        if kind.dismisses_prompt() && self.fire(Trigger::AttentionNeeded) {
            return;
        }

        if kind.breaks_streak() {
            self.streak = 0;
        }
        if kind.is_tool_activity() {
            self.streak += 1;
        }

        let qualifies = if kind.prompts_immediately() {
            true
        } else if kind.is_tool_activity() && self.streak >= self.settings.streak_threshold {
            self.streak = 0;
            true
        } else {
            false
        };

        if qualifies && self.mode() == Mode::Idle && !self.in_cooldown() {
            self.fire(Trigger::PromptQualified);
        }
    }

    /// Advance controller timers. Non-finite or negative deltas are ignored.
    pub fn update(&mut self, delta_secs: f32) {
        if !delta_secs.is_finite() || delta_secs <= 0.0 {
            return;
        }
        self.elapsed += delta_secs;
        self.monitor.update(delta_secs);

        let trigger = match &mut self.state {
            ModeState::Exercising => {
                self.exercise_timer += delta_secs;
                (self.exercise_timer >= self.settings.exercise_duration_secs)
                    .then_some(Trigger::ExerciseTimeUp)
            }
            ModeState::Countdown(countdown) => {
                countdown.tick(delta_secs).then_some(Trigger::CountdownFinished)
            }
            _ => None,
        };
        if let Some(trigger) = trigger {
            self.fire(trigger);
        }
    }

    /// Pick the next exercise, avoiding the last two picks.
    ///
    /// The exercise timer is reset first so a stale timer can never credit
    /// the newly picked exercise.
    pub fn advance_exercise(&mut self) -> Option<usize> {
        self.exercise_timer = 0.0;
        let index = self.picker.pick(self.roster.len(), &mut self.rng)?;
        self.current_exercise = index;
        let name = self.roster[index].name.clone();
        debug!(index, %name, "exercise selected");
        self.events.push(Event::ExerciseSelected { index, name });
        Some(index)
    }

    /// Credit the current exercise if it ran for at least
    /// [`MIN_CREDIT_SECS`], appending it to the round and writing it to the
    /// store straight away. A failed write is logged and reported as
    /// [`Event::PersistFailed`]; the round keeps the entry.
    pub fn complete_current_exercise(&mut self) -> Option<CompletedExercise> {
        let exercise = self.roster.get(self.current_exercise)?;

        if self.exercise_timer < MIN_CREDIT_SECS {
            if self.exercise_timer > 0.0 {
                self.events.push(Event::ExerciseSkipped {
                    name: exercise.name.clone(),
                    elapsed_secs: self.exercise_timer,
                });
            }
            return None;
        }

        let done = CompletedExercise {
            name: exercise.name.clone(),
            reps: exercise.reps.clone(),
            duration_secs: self.exercise_timer,
        };
        info!(name = %done.name, duration_secs = done.duration_secs, "exercise recorded");

        self.round
            .get_or_insert_with(Round::default)
            .completed
            .push(done.clone());
        self.events.push(Event::ExerciseRecorded {
            name: done.name.clone(),
            reps: done.reps.clone(),
            duration_secs: done.duration_secs,
        });

        if let Some(store) = self.store.as_mut() {
            store.append_completed(slice::from_ref(&done));
            if let Err(e) = store.save_now() {
                warn!("failed to save exercise log: {e}");
                self.events.push(Event::PersistFailed {
                    message: e.to_string(),
                });
            }
        }
        Some(done)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Look up and apply the transition for `trigger`. Returns whether
    /// anything happened.
    fn fire(&mut self, trigger: Trigger) -> bool {
        match transition(self.mode(), trigger) {
            Some(action) => self.apply(action),
            None => false,
        }
    }

    fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::OpenMenu => {
                let origin = match self.state {
                    ModeState::Idle => Origin::Idle,
                    ModeState::Prompting => Origin::Prompting,
                    _ => return false,
                };
                self.set_state(ModeState::Menu(MenuState {
                    selected: MenuOption::Start,
                    origin,
                }));
            }
            Action::CloseMenu => {
                let ModeState::Menu(menu) = self.state else {
                    return false;
                };
                self.return_to(menu.origin);
            }
            Action::MenuPrev | Action::MenuNext => {
                let ModeState::Menu(menu) = &mut self.state else {
                    return false;
                };
                menu.selected = if action == Action::MenuPrev {
                    menu.selected.prev()
                } else {
                    menu.selected.next()
                };
            }
            Action::MenuSelect => {
                let ModeState::Menu(menu) = self.state else {
                    return false;
                };
                match menu.selected {
                    MenuOption::Start => self.start_round(),
                    MenuOption::Log => {
                        self.set_state(ModeState::ExerciseLog(LogBrowser::new(menu.origin)))
                    }
                }
            }
            Action::RaisePrompt => {
                self.set_state(ModeState::Prompting);
                self.animation.set_loop_mode(true);
                self.animation.set_animation(AnimationKind::Wave);
                self.events.push(Event::PromptRaised);
            }
            Action::AcceptPrompt => self.start_round(),
            Action::DeclinePrompt => {
                self.last_dismiss = Some(self.elapsed);
                self.dismiss_prompt(true);
            }
            Action::AutoDismissPrompt => self.dismiss_prompt(false),
            Action::StartCountdown => {
                self.set_state(ModeState::Countdown(Countdown::default()));
                self.animation.set_loop_mode(true);
                self.animation.set_animation(AnimationKind::PumpUp);
            }
            Action::StartExercise => self.start_exercise(),
            Action::NextExercise => {
                self.complete_current_exercise();
                self.advance_exercise();
                self.start_pump_up();
            }
            Action::Pause => {
                let resume = match self.state {
                    ModeState::Countdown(countdown) => Resume::Countdown(countdown),
                    ModeState::Exercising => Resume::Exercising,
                    _ => return false,
                };
                self.set_state(ModeState::Paused { resume });
                self.animation.set_paused(true);
            }
            Action::Resume => {
                let ModeState::Paused { resume } = self.state else {
                    return false;
                };
                self.set_state(match resume {
                    Resume::Countdown(countdown) => ModeState::Countdown(countdown),
                    Resume::Exercising => ModeState::Exercising,
                });
                self.animation.set_paused(false);
            }
            Action::EndRound => {
                self.complete_current_exercise();
                self.set_state(ModeState::Summary);
                self.animation.set_paused(false);
                self.animation.start_idle_sequence();
                let summary = self.round_summary();
                let event = Event::RoundFinished {
                    exercises: summary.exercises.len(),
                    total_duration_secs: summary.total_duration_secs,
                };
                self.events.push(event);
            }
            Action::DismissSummary => {
                self.round = None;
                self.set_state(ModeState::Idle);
            }
            Action::CloseLog => {
                let ModeState::ExerciseLog(browser) = &mut self.state else {
                    return false;
                };
                if browser.view.is_confirming() {
                    browser.view = LogView::Clear { confirming: false };
                } else {
                    let origin = browser.origin;
                    self.return_to(origin);
                }
            }
            Action::PrevTab | Action::NextTab | Action::ScrollUp | Action::ScrollDown => {
                let ModeState::ExerciseLog(browser) = &mut self.state else {
                    return false;
                };
                match action {
                    Action::PrevTab => browser.prev_tab(),
                    Action::NextTab => browser.next_tab(),
                    Action::ScrollUp => browser.scroll = browser.scroll.saturating_sub(1),
                    _ => browser.scroll = browser.scroll.saturating_add(1),
                }
            }
            Action::ConfirmClear => {
                let ModeState::ExerciseLog(browser) = &mut self.state else {
                    return false;
                };
                match browser.view {
                    LogView::Clear { confirming: false } => {
                        browser.view = LogView::Clear { confirming: true };
                    }
                    LogView::Clear { confirming: true } => {
                        browser.view = LogView::Today;
                        browser.scroll = 0;
                        self.clear_log();
                    }
                    _ => return false,
                }
            }
        }
        true
    }

    fn set_state(&mut self, next: ModeState) {
        let from = self.state.mode();
        let to = next.mode();
        self.state = next;
        if from != to {
            debug!(?from, ?to, "mode changed");
            self.events.push(Event::ModeChanged { from, to });
        }
    }

    fn return_to(&mut self, origin: Origin) {
        self.set_state(match origin {
            Origin::Idle => ModeState::Idle,
            Origin::Prompting => ModeState::Prompting,
        });
    }

    fn dismiss_prompt(&mut self, cooldown: bool) {
        self.set_state(ModeState::Idle);
        self.animation.start_idle_sequence();
        self.events.push(Event::PromptDismissed { cooldown });
    }

    fn start_round(&mut self) {
        self.round.get_or_insert_with(Round::default);
        self.advance_exercise();
        self.start_pump_up();
    }

    fn start_pump_up(&mut self) {
        self.set_state(ModeState::PumpUp);
        self.animation.set_loop_mode(false);
        self.animation.set_animation(AnimationKind::PumpUp);
        self.animation.notify_on_completion();
    }

    fn start_exercise(&mut self) {
        self.set_state(ModeState::Exercising);
        self.exercise_timer = 0.0;
        if let Some(round) = self.round.as_mut() {
            round.first_exercise = false;
        }
        let Some(kind) = self.current_exercise().and_then(ExerciseConfig::animation) else {
            return;
        };
        self.animation.set_loop_mode(true);
        self.animation.set_animation(kind);
    }

    fn raise_cat_alert(&mut self, text: &str) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        round.cat_alert = Some(CatAlert {
            text: text.to_string(),
        });
        self.events.push(Event::CatAlertRaised {
            text: text.to_string(),
        });
    }

    fn clear_cat_alert(&mut self) {
        if let Some(round) = self.round.as_mut() {
            if round.cat_alert.take().is_some() {
                self.events.push(Event::CatAlertCleared);
            }
        }
    }

    fn clear_log(&mut self) {
        let Some(store) = self.store.as_mut() else {
            self.events.push(Event::LogCleared);
            return;
        };
        match store.clear_all() {
            Ok(()) => {
                info!("exercise log cleared");
                self.events.push(Event::LogCleared);
            }
            Err(e) => {
                warn!("failed to clear exercise log: {e}");
                self.events.push(Event::PersistFailed {
                    message: e.to_string(),
                });
            }
        }
    }
}
