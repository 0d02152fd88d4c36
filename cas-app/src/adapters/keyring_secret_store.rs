//! Keyring-based secret store.
//!
//! Uses the system keychain (macOS Keychain, Windows Credential Manager,
//! Linux Secret Service) via the `keyring` crate. The upstream CLI reads its
//! live credentials from the same place, so entries written here are what
//! `claude` sees on its next start.

use async_trait::async_trait;
use keyring::Entry;

use cas_core::error::{CoreError, CoreResult};
use cas_core::traits::{SecretSlot, SecretStore};

/// Keyring-based secret store.
///
/// Stateless: every call opens the entry afresh, because the upstream tool
/// rewrites the live slot behind our back.
#[derive(Debug, Default)]
pub struct KeyringSecretStore;

impl KeyringSecretStore {
    pub fn new() -> Self {
        Self
    }

    fn get_entry(slot: &SecretSlot) -> CoreResult<Entry> {
        Entry::new(&slot.service, &slot.account)
            .map_err(|e| CoreError::SecretStore(format!("{slot}: {e}")))
    }

    fn find_sync(slot: &SecretSlot) -> CoreResult<Option<String>> {
        let entry = Self::get_entry(slot)?;
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CoreError::SecretStore(format!("{slot}: {e}"))),
        }
    }

    fn delete_sync(slot: &SecretSlot) -> CoreResult<()> {
        let entry = Self::get_entry(slot)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CoreError::SecretStore(format!("{slot}: {e}"))),
        }
    }

    /// Delete-then-insert; a reader between the two sees an empty slot.
    fn set_sync(slot: &SecretSlot, value: &str) -> CoreResult<()> {
        Self::delete_sync(slot)?;
        let entry = Self::get_entry(slot)?;
        entry
            .set_password(value)
            .map_err(|e| CoreError::SecretStore(format!("{slot}: {e}")))
    }
}

fn join_error(e: &tokio::task::JoinError) -> CoreError {
    CoreError::SecretStore(format!("Task join error: {e}"))
}

#[async_trait]
impl SecretStore for KeyringSecretStore {
    async fn find(&self, slot: &SecretSlot) -> CoreResult<Option<String>> {
        let slot = slot.clone();
        tokio::task::spawn_blocking(move || {
            log::debug!("Reading {slot} from keychain");
            Self::find_sync(&slot)
        })
        .await
        .map_err(|e| join_error(&e))?
    }

    async fn set(&self, slot: &SecretSlot, value: &str) -> CoreResult<()> {
        let slot = slot.clone();
        let value = value.to_string();
        tokio::task::spawn_blocking(move || {
            log::debug!("Writing {slot} to keychain");
            Self::set_sync(&slot, &value)
        })
        .await
        .map_err(|e| join_error(&e))?
    }

    async fn delete(&self, slot: &SecretSlot) -> CoreResult<()> {
        let slot = slot.clone();
        tokio::task::spawn_blocking(move || {
            log::debug!("Deleting {slot} from keychain");
            Self::delete_sync(&slot)
        })
        .await
        .map_err(|e| join_error(&e))?
    }
}
