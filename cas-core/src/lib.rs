//! Claude Account Switcher Core Library
//!
//! Platform-independent logic for keeping several `claude` CLI identities
//! side by side:
//! - Cipher engine (AES-256-GCM sealing of saved credentials)
//! - Key custodian (live credential slot and master key in the secret store)
//! - Profile store (encrypted profiles plus the active pointer)
//! - Switch orchestrator (switch / add / remove with rollback)
//!
//! The secret store, the store file, the upstream login and its side config
//! file are reached through traits; `cas-app` provides the real adapters.

pub mod crypto;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult, RollbackError};
pub use services::{
    KeyCustodian, ProfileStore, RemoveOutcome, SecretSlots, ServiceContext, SwitchOrchestrator,
    SwitchOutcome, SwitchPhase,
};
pub use traits::{ConfigSnapshots, LoginFlow, SecretSlot, SecretStore, StoreRepository};
pub use types::{AuthStatus, CredentialBlob, Profile, ProfileMeta, Store};
