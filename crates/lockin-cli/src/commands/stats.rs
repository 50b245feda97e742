use clap::Subcommand;
use lockin_core::storage::{Database, History};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's sessions and focused seconds
    Today,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let history = History::load(Database::open()?);

    match action {
        StatsAction::Today => {
            let stats = history.today_stats();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
