use clap::Subcommand;
use koi_core::{BreakLength, PreferenceStore, AVATARS};

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print all preferences as JSON
    Show,
    /// Update preference fields
    Set {
        /// Default break length in seconds (30, 60 or 180)
        #[arg(long)]
        break_length: Option<u32>,
        /// Sound on/off
        #[arg(long)]
        sound: Option<bool>,
        /// Haptics on/off
        #[arg(long)]
        haptics: Option<bool>,
        /// Low-motion mode on/off
        #[arg(long)]
        low_motion: Option<bool>,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Avatar id from the catalog
        #[arg(long)]
        avatar: Option<u8>,
    },
    /// List the avatar catalog
    Avatars,
}

pub fn run(action: PrefsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PrefsAction::Show => {
            let store = PreferenceStore::open()?;
            println!("{}", serde_json::to_string_pretty(store.preferences())?);
        }
        PrefsAction::Set {
            break_length,
            sound,
            haptics,
            low_motion,
            name,
            avatar,
        } => {
            let mut store = PreferenceStore::open()?;
            let mut prefs = store.preferences().clone();
            if let Some(seconds) = break_length {
                prefs.default_break_length = BreakLength::from_secs(seconds)?;
            }
            if let Some(enabled) = sound {
                prefs.sound_enabled = enabled;
            }
            if let Some(enabled) = haptics {
                prefs.haptics_enabled = enabled;
            }
            if let Some(enabled) = low_motion {
                prefs.low_motion_mode = enabled;
            }
            if let Some(display_name) = name {
                prefs.display_name = display_name;
            }
            if let Some(id) = avatar {
                prefs.avatar_id = id;
            }
            store.set_preferences(prefs)?;
            println!("{}", serde_json::to_string_pretty(store.preferences())?);
        }
        PrefsAction::Avatars => {
            for avatar in AVATARS {
                println!("{}  {:<10} {}", avatar.id, avatar.icon, avatar.color);
            }
        }
    }
    Ok(())
}
