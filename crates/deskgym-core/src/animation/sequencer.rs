//! Frame sequencer for the character spritesheet.
//!
//! The sequencer owns which animation is playing, the frame within it and
//! the per-frame clock. It never calls back into its owner: `update()`
//! reports what happened as a [`Playback`] value and the caller decides how
//! to react.
//!
//! ## Completion resolution
//!
//! ```text
//! frame reaches frame_count ->
//!   queue non-empty   => play next queued animation   (QueueAdvanced)
//!   loop mode         => restart at frame 0           (Looped)
//!   completion armed  => disarm, hold last frame      (Finished)
//!   otherwise         => pick a new idle animation    (IdleRotated)
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use super::kind::AnimationKind;

/// Seconds per frame (~12 FPS).
pub const FRAME_DURATION: f32 = 0.084;

/// Probability that idle selection picks the coffee animation.
pub const COFFEE_PROBABILITY: f64 = 0.2;

/// Upper bound on frames advanced by a single `update()`.
/// Time beyond this is dropped rather than replayed.
const MAX_CATCH_UP_FRAMES: f32 = 4096.0;

/// Snapshot of what the renderer needs to draw the character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    pub current: AnimationKind,
    pub frame: usize,
    /// Seconds accumulated since the last frame advance.
    pub timer: f32,
    pub queue: VecDeque<AnimationKind>,
}

/// What an `update()` call did, most significant outcome wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Playback {
    NoChange,
    FrameAdvanced,
    Looped,
    IdleRotated,
    QueueAdvanced,
    /// The armed one-shot completion notice fired.
    Finished,
}

pub struct AnimationSequencer<R = Mcg128Xsl64> {
    state: AnimationState,
    frame_duration: f32,
    loop_mode: bool,
    notify_on_completion: bool,
    paused: bool,
    rng: R,
}

impl AnimationSequencer<Mcg128Xsl64> {
    pub fn new() -> Self {
        Self::with_rng(Mcg128Xsl64::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(Mcg128Xsl64::seed_from_u64(seed))
    }
}

impl Default for AnimationSequencer<Mcg128Xsl64> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> AnimationSequencer<R> {
    /// Starts on the wandering idle with an injected random source.
    pub fn with_rng(rng: R) -> Self {
        Self {
            state: AnimationState {
                current: AnimationKind::Wondering,
                frame: 0,
                timer: 0.0,
                queue: VecDeque::new(),
            },
            frame_duration: FRAME_DURATION,
            loop_mode: false,
            notify_on_completion: false,
            paused: false,
            rng,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn current(&self) -> AnimationKind {
        self.state.current
    }

    pub fn frame(&self) -> usize {
        self.state.frame
    }

    pub fn frame_count(&self) -> usize {
        self.state.current.frame_count()
    }

    pub fn frame_duration(&self) -> f32 {
        self.frame_duration
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn loop_mode(&self) -> bool {
        self.loop_mode
    }

    /// True while a completion notice is armed and has not fired yet.
    pub fn completion_armed(&self) -> bool {
        self.notify_on_completion
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance the frame clock. Several frames (and several completions) may
    /// be resolved in one call; a `Finished` ends the call early.
    pub fn update(&mut self, delta_secs: f32) -> Playback {
        if self.paused || !delta_secs.is_finite() || delta_secs <= 0.0 {
            return Playback::NoChange;
        }

        self.state.timer += delta_secs;
        let limit = self.frame_duration * MAX_CATCH_UP_FRAMES;
        if self.state.timer > limit {
            self.state.timer = limit + self.state.timer % self.frame_duration;
        }

        let mut outcome = Playback::NoChange;
        while self.state.timer >= self.frame_duration {
            self.state.timer -= self.frame_duration;
            self.state.frame += 1;
            outcome = outcome.max(Playback::FrameAdvanced);

            if self.state.frame >= self.frame_count() {
                let resolved = self.resolve_completion();
                outcome = outcome.max(resolved);
                if resolved == Playback::Finished {
                    self.state.timer %= self.frame_duration;
                    break;
                }
            }
        }
        outcome
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Hard switch: frame and timer reset, queue and completion notice dropped.
    pub fn set_animation(&mut self, kind: AnimationKind) {
        self.state.current = kind;
        self.state.frame = 0;
        self.state.timer = 0.0;
        self.state.queue.clear();
        self.notify_on_completion = false;
    }

    /// Append an animation to play after the current one finishes.
    pub fn queue_animation(&mut self, kind: AnimationKind) {
        self.state.queue.push_back(kind);
    }

    pub fn set_loop_mode(&mut self, enabled: bool) {
        self.loop_mode = enabled;
    }

    /// Arm a one-shot notice: the next natural finish of the current
    /// animation (not looping, queue empty) returns [`Playback::Finished`].
    pub fn notify_on_completion(&mut self) {
        self.notify_on_completion = true;
    }

    /// Reset into a freshly picked idle animation with loop mode off.
    pub fn start_idle_sequence(&mut self) {
        self.state.queue.clear();
        self.notify_on_completion = false;
        self.loop_mode = false;
        self.pick_idle();
        self.state.timer = 0.0;
    }

    /// Jump to a frame. Negative wraps to the last frame, past-the-end wraps to 0.
    pub fn set_frame(&mut self, frame: isize) {
        let len = self.frame_count() as isize;
        let frame = if frame < 0 {
            len - 1
        } else if frame >= len {
            0
        } else {
            frame
        };
        self.state.frame = frame as usize;
        self.state.timer = 0.0;
    }

    pub fn step_frame(&mut self, delta: isize) {
        self.set_frame(self.state.frame as isize + delta);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn resolve_completion(&mut self) -> Playback {
        if let Some(next) = self.state.queue.pop_front() {
            self.state.current = next;
            self.state.frame = 0;
            Playback::QueueAdvanced
        } else if self.loop_mode {
            self.state.frame = 0;
            Playback::Looped
        } else if self.notify_on_completion {
            self.notify_on_completion = false;
            self.state.frame = self.frame_count() - 1;
            Playback::Finished
        } else {
            self.pick_idle();
            Playback::IdleRotated
        }
    }

    /// Switch to a freshly picked idle animation at frame 0. The frame timer
    /// is left alone so leftover time keeps playing.
    fn pick_idle(&mut self) {
        self.state.current = if self.rng.gen_bool(COFFEE_PROBABILITY) {
            AnimationKind::Coffee
        } else {
            AnimationKind::Wondering
        };
        self.state.frame = 0;
    }
}
