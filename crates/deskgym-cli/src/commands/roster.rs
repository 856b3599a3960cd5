use clap::Subcommand;

use super::session;

#[derive(Subcommand)]
pub enum RosterAction {
    /// Print the exercises the controller will pick from
    List,
}

pub fn run(action: RosterAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RosterAction::List => {
            let config = session::load_config();
            let roster = session::load_roster(&config);
            println!("{}", serde_json::to_string_pretty(&roster)?);
        }
    }
    Ok(())
}
