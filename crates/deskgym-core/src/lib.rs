//! # Deskgym Core Library
//!
//! This library provides the core logic for the deskgym exercise companion:
//! a character that watches an AI coding-assistant session and, when the
//! assistant is busy, invites the user to get up and do a short exercise.
//! Front ends (the desktop renderer, the `deskgym` CLI) are thin layers over
//! the same core.
//!
//! ## Architecture
//!
//! - **Animation**: a frame sequencer for the character spritesheet that
//!   reports completions as return values instead of callbacks
//! - **Controller**: the mode state machine (idle, prompt, pump-up,
//!   countdown, exercise, pause, summary, log browser) with an explicit
//!   transition table
//! - **Activity**: typed events from the assistant session and a
//!   non-blocking feed that delivers them one per frame
//! - **Storage**: SQLite exercise log and TOML configuration
//!
//! ## Key Components
//!
//! - [`ModeController`]: application state machine
//! - [`AnimationSequencer`]: spritesheet frame clock
//! - [`ExerciseLog`]: durable record of completed exercises
//! - [`Config`]: application configuration management

pub mod activity;
pub mod animation;
pub mod controller;
pub mod error;
pub mod events;
pub mod exercise;
pub mod storage;

pub use activity::{ActivityEvent, ActivityFeed, ActivityKind, ActivityMonitor, ActivitySender};
pub use animation::{AnimationKind, AnimationSequencer, AnimationState, Playback};
pub use controller::{ControllerSettings, Key, Keys, Mode, ModeController, ModeState};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use exercise::{default_roster, load_roster, load_roster_or_default, CompletedExercise, ExerciseConfig};
pub use storage::{Config, ExerciseLog, ExerciseStore};
