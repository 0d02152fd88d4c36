use anyhow::Result;
use cas_app::AppState;
use colored::Colorize;

use super::identity_suffix;

pub async fn run(app: &AppState) -> Result<()> {
    let store = app.profile_store.load().await?;

    if store.profiles.is_empty() {
        println!("{}", "No profiles configured.".yellow());
        println!("{}", "Run \"cas add <name>\" to add a profile.".dimmed());
        return Ok(());
    }

    println!("{}\n", "Profiles:".bold());
    for profile in store.profiles.iter() {
        let line = if store.is_active(&profile.name) {
            format!("{}{}", "* ".green(), profile.name.green().bold())
        } else {
            format!("  {}", profile.name)
        };
        println!("{line}{}", identity_suffix(profile));
    }

    println!();
    println!("{}", format!("{} profile(s) total", store.profiles.len()).dimmed());
    Ok(())
}
