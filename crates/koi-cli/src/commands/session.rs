use std::thread;
use std::time::Duration;

use clap::Subcommand;
use koi_core::{BreakLength, BreakSession, Event, PreferenceStore, ThemeId};

#[derive(Subcommand)]
pub enum BreakAction {
    /// Run a break session to completion
    Run {
        /// Duration in seconds: 30, 60 or 180 (defaults to the preference)
        #[arg(long)]
        duration: Option<u32>,
        /// Theme id for the scene (defaults to the current selection)
        #[arg(long)]
        theme: Option<String>,
        /// Seed the scene rng for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        /// Tick without real-time delays
        #[arg(long)]
        fast: bool,
        /// Cancel after this many seconds instead of completing
        #[arg(long)]
        cancel_after: Option<u32>,
    },
}

pub fn run(action: BreakAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BreakAction::Run {
            duration,
            theme,
            seed,
            fast,
            cancel_after,
        } => run_session(duration, theme, seed, fast, cancel_after),
    }
}

fn run_session(
    duration: Option<u32>,
    theme: Option<String>,
    seed: Option<u64>,
    fast: bool,
    cancel_after: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = PreferenceStore::open()?;

    let length = match duration {
        Some(seconds) => BreakLength::from_secs(seconds)?,
        None => store.preferences().default_break_length,
    };
    let theme_id: ThemeId = match theme {
        Some(raw) => raw.parse()?,
        None => store.selected_theme(),
    };

    let mut session = match seed {
        Some(seed) => BreakSession::new_seeded(length, theme_id, seed),
        None => BreakSession::new(length, theme_id),
    };
    println!("{}", serde_json::to_string(&session.started())?);

    let mut elapsed_secs = 0u32;
    while !session.is_finished() {
        if !fast {
            thread::sleep(Duration::from_secs(1));
        }
        elapsed_secs += 1;

        if cancel_after == Some(elapsed_secs) {
            if let Some(event) = session.cancel() {
                println!("{}", serde_json::to_string(&event)?);
            }
            break;
        }

        for event in session.tick(1000) {
            match event {
                Event::BreakCompleted { .. } => {
                    // Natural completion is the only path that counts.
                    let streak = store.record_break()?;
                    println!("{}", serde_json::to_string(&event)?);
                    println!("{}", serde_json::to_string(&streak)?);
                }
                Event::SessionClosed { .. } => {
                    println!("{}", serde_json::to_string(&event)?);
                }
                // Scene chatter stays quiet in a non-interactive run.
                _ => {}
            }
        }

        if session.remaining_ms() > 0 {
            eprintln!("{}s remaining", session.remaining_secs());
        }
    }

    Ok(())
}
