use clap::Subcommand;
use koi_core::{preset, PreferenceStore, ThemeColors, ThemeId};

#[derive(Subcommand)]
pub enum ThemeAction {
    /// List the preset catalog
    List,
    /// Print the currently selected theme id
    Current,
    /// Select a theme by id (preset name or "custom")
    Select {
        /// Theme id, e.g. "deepSea" or "custom"
        id: String,
    },
    /// Print the resolved scene colors as JSON
    Show {
        /// Theme id to resolve (defaults to the current selection)
        id: Option<String>,
    },
}

pub fn run(action: ThemeAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ThemeAction::List => {
            for id in ThemeId::PRESETS {
                let p = preset(id).expect("preset ids always resolve");
                println!("{:<12} {}", id.as_str(), p.name);
            }
            println!("{:<12} {}", "custom", "Custom");
        }
        ThemeAction::Current => {
            let store = PreferenceStore::open()?;
            println!("{}", store.selected_theme());
        }
        ThemeAction::Select { id } => {
            let id: ThemeId = id.parse()?;
            let mut store = PreferenceStore::open()?;
            store.set_selected_theme(id)?;
            println!("ok");
        }
        ThemeAction::Show { id } => {
            let store = PreferenceStore::open()?;
            let id = match id {
                Some(raw) => raw.parse()?,
                None => store.selected_theme(),
            };
            let colors = ThemeColors::resolve(id, store.custom_theme());
            println!("{}", serde_json::to_string_pretty(&colors)?);
        }
    }
    Ok(())
}
