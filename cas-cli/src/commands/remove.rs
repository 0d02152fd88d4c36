use anyhow::Result;
use cas_app::AppState;
use colored::Colorize;

pub async fn run(app: &AppState, name: &str, force: bool) -> Result<()> {
    let outcome = app.orchestrator.remove(name, force).await?;

    println!("{} Profile \"{}\" removed", "✓".green(), outcome.removed.bold());
    if outcome.was_active {
        match &outcome.active_profile {
            Some(next) => println!("{}", format!("Active profile is now \"{next}\"").dimmed()),
            None => println!("{}", "No active profile".dimmed()),
        }
    }
    Ok(())
}
