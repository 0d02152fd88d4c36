use anyhow::Result;
use cas_app::AppState;
use cas_core::services::SwitchOutcome;
use cas_core::CoreError;
use colored::Colorize;

use super::identity_suffix;

pub async fn run(app: &AppState, name: &str) -> Result<()> {
    match app.orchestrator.switch(name).await {
        Ok(SwitchOutcome::AlreadyActive(profile)) => {
            println!("Already using \"{}\"", profile.name.bold());
            Ok(())
        }
        Ok(SwitchOutcome::Switched { profile, .. }) => {
            println!(
                "{} Switched to \"{}\"{}",
                "✓".green(),
                profile.name.bold(),
                identity_suffix(&profile)
            );
            Ok(())
        }
        Err(e @ CoreError::ProfileNotFound(_)) => {
            let profiles = app.profile_store.list_all().await.unwrap_or_default();
            if profiles.is_empty() {
                eprintln!("{}", "No profiles configured. Run \"cas add <name>\" first.".dimmed());
            } else {
                let names: Vec<_> = profiles.iter().map(|p| p.name.as_str()).collect();
                eprintln!("{}", format!("Available profiles: {}", names.join(", ")).dimmed());
            }
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
