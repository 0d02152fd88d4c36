//! Platform adapters for the collaborator traits.

mod claude_cli_login;
mod file_config_snapshots;
mod fs_util;
mod json_store_repository;

pub use claude_cli_login::{ClaudeCliLogin, DEFAULT_STATUS_TIMEOUT};
pub use file_config_snapshots::FileConfigSnapshots;
pub use json_store_repository::JsonStoreRepository;

#[cfg(feature = "keyring-store")]
mod keyring_secret_store;

#[cfg(feature = "keyring-store")]
pub use keyring_secret_store::KeyringSecretStore;
