use anyhow::Result;
use cas_app::AppState;
use colored::Colorize;

pub async fn run(app: &AppState, name: &str) -> Result<()> {
    println!("{}", format!("Logging in for new profile \"{name}\"...").dimmed());

    let profile = app.orchestrator.add(name).await?;

    println!("{} Profile \"{}\" added", "✓".green(), profile.name.bold());
    if let Some(email) = &profile.email {
        println!("{}", format!("  Email: {email}").dimmed());
    }
    if let Some(org) = &profile.org {
        println!("{}", format!("  Org: {org}").dimmed());
    }
    Ok(())
}
