//! Shared setup for the commands that drive a controller.

use std::io::Write;

use deskgym_core::exercise::load_roster_or_default;
use deskgym_core::{
    Config, ControllerSettings, Event, ExerciseConfig, ExerciseLog, Key, Keys, Mode,
    ModeController,
};
use serde::Serialize;
use tracing::warn;

pub fn load_config() -> Config {
    Config::load_or_default()
}

pub fn load_roster(config: &Config) -> Vec<ExerciseConfig> {
    load_roster_or_default(config.exercise.roster_path.as_deref())
}

/// Controller wired to the on-disk exercise log. Runs without persistence
/// when the log cannot be opened.
pub fn build_controller(config: &Config, seed: Option<u64>) -> ModeController {
    let roster = load_roster(config);
    let settings = ControllerSettings::from(config);
    let controller = match seed {
        Some(seed) => ModeController::seeded(roster, settings, seed),
        None => ModeController::new(roster, settings),
    };

    match ExerciseLog::open() {
        Ok(log) => controller.with_store(Box::new(log)),
        Err(e) => {
            warn!("exercise log unavailable, nothing will be saved: {e}");
            controller
        }
    }
}

/// Keys to press this frame: `Y` on a prompt when auto-accepting.
pub fn auto_keys(controller: &ModeController, auto_accept: bool) -> Keys {
    if auto_accept && controller.mode() == Mode::Prompting {
        Keys::from(Key::Y)
    } else {
        Keys::none()
    }
}

#[derive(Serialize)]
struct EventLine<'a> {
    at_secs: f32,
    #[serde(flatten)]
    event: &'a Event,
}

/// Print controller events as JSON lines stamped with controller time.
pub fn emit(at_secs: f32, events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    if events.is_empty() {
        return Ok(());
    }
    let mut out = std::io::stdout().lock();
    for event in events {
        let line = serde_json::to_string(&EventLine { at_secs, event })?;
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}
