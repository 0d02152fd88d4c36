//! `cas` - Claude Account Switcher

mod cli;
mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use cas_app::{AppConfig, AppState, AppStateBuilder};
use cas_core::CoreError;
use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log filter, e.g. `CAS_LOG=debug`
const LOG_ENV: &str = "CAS_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<CoreError>() {
                Some(core) if core.is_expected() => tracing::warn!("{core}"),
                _ => tracing::error!("{e:#}"),
            }
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

// stdout carries command output (including the setup-shell script)
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .with(filter)
        .init();
}

fn build_app(claude_bin: Option<PathBuf>, keychain_account: Option<String>) -> Result<AppState> {
    let config = AppConfig::from_env()?
        .with_keychain_account(keychain_account)
        .with_claude_bin(claude_bin);
    tracing::debug!(
        "Store at {}, live slot account {}",
        config.store_file.display(),
        config.keychain_account
    );
    Ok(AppStateBuilder::from_config(&config).build()?)
}

async fn run(cli: Cli) -> Result<()> {
    let Cli {
        command,
        claude_bin,
        keychain_account,
        ..
    } = cli;
    // setup-shell never touches the keychain
    let app = move || build_app(claude_bin, keychain_account);

    match command {
        Commands::SetupShell => {
            commands::setup_shell::run();
            Ok(())
        }
        Commands::Add { name } => commands::add::run(&app()?, &name).await,
        Commands::Switch { name } => commands::switch::run(&app()?, &name).await,
        Commands::List => commands::list::run(&app()?).await,
        Commands::Remove { name, force } => commands::remove::run(&app()?, &name, force).await,
        Commands::Current => commands::current::run(&app()?).await,
    }
}
