use clap::Subcommand;
use koi_core::{PreferenceStore, MOOD_STOPS};

#[derive(Subcommand)]
pub enum MoodAction {
    /// Print the stored mood value
    Get,
    /// Set the mood value (clamped to 0..1)
    Set {
        /// New value; the slider uses the stops 0, 0.25, 0.5, 0.75, 1
        value: f32,
    },
    /// List the quantised slider stops
    Stops,
}

pub fn run(action: MoodAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        MoodAction::Get => {
            let store = PreferenceStore::open()?;
            println!("{}", store.mood_value());
        }
        MoodAction::Set { value } => {
            let mut store = PreferenceStore::open()?;
            store.set_mood_value(value)?;
            println!("{}", store.mood_value());
        }
        MoodAction::Stops => {
            for stop in MOOD_STOPS {
                println!("{stop}");
            }
        }
    }
    Ok(())
}
