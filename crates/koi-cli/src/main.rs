use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "koi", version, about = "Koi break timer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Theme selection
    Theme {
        #[command(subcommand)]
        action: commands::theme::ThemeAction,
    },
    /// Custom theme editing
    Customize {
        #[command(subcommand)]
        action: commands::customize::CustomizeAction,
    },
    /// User preferences
    Prefs {
        #[command(subcommand)]
        action: commands::prefs::PrefsAction,
    },
    /// Mood slider value
    Mood {
        #[command(subcommand)]
        action: commands::mood::MoodAction,
    },
    /// Streak counters
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Break sessions
    Break {
        #[command(subcommand)]
        action: commands::session::BreakAction,
    },
    /// First-run onboarding flag
    Onboarding {
        #[command(subcommand)]
        action: commands::onboarding::OnboardingAction,
    },
    /// Stored data management
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Theme { action } => commands::theme::run(action),
        Commands::Customize { action } => commands::customize::run(action),
        Commands::Prefs { action } => commands::prefs::run(action),
        Commands::Mood { action } => commands::mood::run(action),
        Commands::Streak { action } => commands::streak::run(action),
        Commands::Break { action } => commands::session::run(action),
        Commands::Onboarding { action } => commands::onboarding::run(action),
        Commands::Data { action } => commands::data::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
