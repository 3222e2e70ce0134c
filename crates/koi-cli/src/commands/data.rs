use clap::Subcommand;
use koi_core::PreferenceStore;

#[derive(Subcommand)]
pub enum DataAction {
    /// Delete all stored data and restore defaults (keeps the onboarding flag)
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DataAction::Clear { yes } => {
            if !yes {
                eprintln!("this deletes theme, preference, streak and mood data");
                eprintln!("re-run with --yes to confirm");
                std::process::exit(1);
            }
            let mut store = PreferenceStore::open()?;
            store.clear_all_data()?;
            println!("all data cleared");
        }
    }
    Ok(())
}
