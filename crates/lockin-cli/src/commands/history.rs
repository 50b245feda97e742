use chrono::Local;
use clap::Subcommand;
use lockin_core::storage::{Database, History, SessionRecord};

/// Rows shown by `history list` before collapsing the rest.
const SUMMARY_ROWS: usize = 5;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Show recent sessions
    List {
        /// Print every stored session as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete all stored sessions
    Clear,
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut history = History::load(Database::open()?);

    match action {
        HistoryAction::List { json: true } => {
            println!("{}", serde_json::to_string_pretty(history.sessions())?);
        }
        HistoryAction::List { json: false } => {
            if history.is_empty() {
                println!("No sessions yet.");
                return Ok(());
            }
            let stats = history.today_stats();
            println!(
                "Today: {} sessions \u{2022} {} min focused",
                stats.count,
                stats.total_seconds / 60
            );
            for record in history.recent(SUMMARY_ROWS) {
                println!("{}", format_row(record));
            }
            let older = history.older_count(SUMMARY_ROWS);
            if older > 0 {
                println!("+ {older} older sessions");
            }
        }
        HistoryAction::Clear => {
            history.clear();
            println!("history cleared");
        }
    }
    Ok(())
}

fn format_row(record: &SessionRecord) -> String {
    let time = record.date.with_timezone(&Local).format("%H:%M");
    let overtime = if record.overtime > 0 {
        format!(" +{}m", record.overtime / 60)
    } else {
        String::new()
    };
    format!("{time}  {}m{overtime}  {}", record.duration / 60, record.label)
}
