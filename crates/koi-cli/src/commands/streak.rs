use chrono::NaiveDate;
use clap::Subcommand;
use koi_core::PreferenceStore;

#[derive(Subcommand)]
pub enum StreakAction {
    /// Print streak counters as JSON
    Show,
    /// Record a completed break
    Record {
        /// Calendar date to record against (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        StreakAction::Show => {
            let store = PreferenceStore::open()?;
            println!("{}", serde_json::to_string_pretty(&store.streak())?);
        }
        StreakAction::Record { date } => {
            let mut store = PreferenceStore::open()?;
            let streak = match date {
                Some(d) => store.record_break_on(d)?,
                None => store.record_break()?,
            };
            println!("{}", serde_json::to_string_pretty(&streak)?);
        }
    }
    Ok(())
}
