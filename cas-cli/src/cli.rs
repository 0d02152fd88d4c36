use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cas")]
#[command(version, about = "Claude Account Switcher - keep several claude logins and swap between them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the claude executable
    #[arg(long, global = true, env = "CAS_CLAUDE_BIN")]
    pub claude_bin: Option<PathBuf>,

    /// Keychain account of the live claude credentials (defaults to the OS user)
    #[arg(long, global = true, env = "CAS_KEYCHAIN_ACCOUNT")]
    pub keychain_account: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with a new account and save it as a profile
    Add {
        /// Profile name
        name: String,
    },

    /// Switch to a saved profile
    Switch {
        /// Profile name
        name: String,
    },

    /// List saved profiles
    #[command(alias = "ls")]
    List,

    /// Remove a saved profile
    #[command(alias = "rm")]
    Remove {
        /// Profile name
        name: String,

        /// Remove even if it is the active profile
        #[arg(short, long)]
        force: bool,
    },

    /// Show the active profile
    Current,

    /// Print a shell function adding `--use-account` to claude
    SetupShell,
}
