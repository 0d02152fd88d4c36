use anyhow::Result;
use cas_app::AppState;
use chrono::{Local, SecondsFormat};
use colored::Colorize;

pub async fn run(app: &AppState) -> Result<()> {
    let Some(profile) = app.profile_store.active_profile().await? else {
        println!("{}", "No active profile.".yellow());
        println!("{}", "Run \"cas add <name>\" to add a profile.".dimmed());
        return Ok(());
    };

    println!("{}", profile.name.bold());
    if let Some(email) = &profile.email {
        println!("{}", format!("Email: {email}").dimmed());
    }
    if let Some(org) = &profile.org {
        println!("{}", format!("Org: {org}").dimmed());
    }
    let last_used = profile
        .last_used_at
        .with_timezone(&Local)
        .to_rfc3339_opts(SecondsFormat::Secs, false);
    println!("{}", format!("Last used: {last_used}").dimmed());
    Ok(())
}
