use clap::Subcommand;
use deskgym_core::{ExerciseLog, ExerciseStore};

#[derive(Subcommand)]
pub enum LogAction {
    /// List every logged exercise
    List,
    /// Delete every logged exercise
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut log = ExerciseLog::open()?;

    match action {
        LogAction::List => {
            let entries = log.entries()?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        LogAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear the exercise log without --yes".into());
            }
            log.clear_all()?;
            println!("exercise log cleared");
        }
    }
    Ok(())
}
