use clap::Subcommand;
use koi_core::OnboardingGate;

#[derive(Subcommand)]
pub enum OnboardingAction {
    /// Print whether onboarding has been completed
    Status,
    /// Mark onboarding complete (idempotent)
    Complete,
    /// Clear the flag so the first-run flow shows again
    Reset,
}

pub fn run(action: OnboardingAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        OnboardingAction::Status => {
            let gate = OnboardingGate::open()?;
            println!("{}", if gate.check() { "completed" } else { "pending" });
        }
        OnboardingAction::Complete => {
            let mut gate = OnboardingGate::open()?;
            gate.complete()?;
            println!("ok");
        }
        OnboardingAction::Reset => {
            let mut gate = OnboardingGate::open()?;
            gate.reset()?;
            println!("ok");
        }
    }
    Ok(())
}
