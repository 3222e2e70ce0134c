use clap::Subcommand;
use koi_core::{CustomTheme, HexColor, PreferenceStore};

#[derive(Subcommand)]
pub enum CustomizeAction {
    /// Print the saved custom theme as JSON
    Show,
    /// Update custom theme fields and save
    Set {
        /// Water color, #RRGGBB
        #[arg(long)]
        water_color: Option<String>,
        /// Ripple intensity, 0..1
        #[arg(long)]
        ripple_intensity: Option<f32>,
        /// Particle layer on/off
        #[arg(long)]
        particles: Option<bool>,
        /// Koi color, #RRGGBB
        #[arg(long)]
        koi_color: Option<String>,
        /// Sound volume, 0..1
        #[arg(long)]
        sound_volume: Option<f32>,
    },
    /// Restore the default custom theme
    Reset,
}

pub fn run(action: CustomizeAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CustomizeAction::Show => {
            let store = PreferenceStore::open()?;
            println!("{}", serde_json::to_string_pretty(store.custom_theme())?);
        }
        CustomizeAction::Set {
            water_color,
            ripple_intensity,
            particles,
            koi_color,
            sound_volume,
        } => {
            let mut store = PreferenceStore::open()?;
            let mut theme = store.custom_theme().clone();
            if let Some(color) = water_color {
                theme.water_color = HexColor::new(&color)?;
            }
            if let Some(intensity) = ripple_intensity {
                theme.ripple_intensity = intensity;
            }
            if let Some(enabled) = particles {
                theme.particle_enabled = enabled;
            }
            if let Some(color) = koi_color {
                theme.koi_color = HexColor::new(&color)?;
            }
            if let Some(volume) = sound_volume {
                theme.sound_volume = volume;
            }
            // This is the explicit save action; floats clamp on the way in.
            store.set_custom_theme(theme)?;
            println!("{}", serde_json::to_string_pretty(store.custom_theme())?);
        }
        CustomizeAction::Reset => {
            let mut store = PreferenceStore::open()?;
            store.set_custom_theme(CustomTheme::default())?;
            println!("custom theme reset to defaults");
        }
    }
    Ok(())
}
