use clap::Subcommand;
use deskgym_core::{ExerciseLog, ExerciseStore};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's totals per exercise
    Today,
    /// All-time totals per exercise
    Types,
    /// Totals per day, most recent first
    Trend,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let log = ExerciseLog::open()?;

    match action {
        StatsAction::Today => {
            let stats = log.today_breakdown()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Types => {
            let stats = log.type_breakdown()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Trend => {
            let trend = log.daily_trend()?;
            println!("{}", serde_json::to_string_pretty(&trend)?);
        }
    }
    Ok(())
}
