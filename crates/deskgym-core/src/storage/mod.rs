mod config;
pub mod exercise_log;

pub use config::{Config, DisplayConfig, ExerciseSettings, PromptConfig};
pub use exercise_log::{DayBucket, ExerciseLog, LogEntry, TypeSummary};

use std::path::PathBuf;

use crate::error::Result;
use crate::exercise::CompletedExercise;

/// Returns the deskgym data directory, creating it if needed.
///
/// - `DESKGYM_DATA_DIR` overrides the location entirely.
/// - Otherwise `<config dir>/deskgym`, or `<config dir>/deskgym-dev` with
///   `DESKGYM_ENV=dev`, falling back to `~/.deskgym` when the platform has
///   no config directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("DESKGYM_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let env = std::env::var("DESKGYM_ENV").unwrap_or_else(|_| "production".to_string());
            let name = if env == "dev" { "deskgym-dev" } else { "deskgym" };
            match dirs::config_dir() {
                Some(base) => base.join(name),
                None => dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(format!(".{name}")),
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Durable record of completed exercises.
///
/// Appends are staged in memory and written by `save_now`; the query views
/// include staged entries so the current run always sees its own work even
/// when a write failed.
pub trait ExerciseStore {
    /// Stage entries, stamped with the current time.
    fn append_completed(&mut self, entries: &[CompletedExercise]);

    /// Write staged entries to durable storage.
    fn save_now(&mut self) -> Result<()>;

    /// Today's totals per exercise name, longest total first.
    fn today_breakdown(&self) -> Result<Vec<TypeSummary>>;

    /// All-time totals per exercise name, longest total first.
    fn type_breakdown(&self) -> Result<Vec<TypeSummary>>;

    /// Totals per local calendar day, most recent first.
    fn daily_trend(&self) -> Result<Vec<DayBucket>>;

    /// Drop every entry, staged and stored.
    fn clear_all(&mut self) -> Result<()>;
}
