//! Profile store
//!
//! The persisted name → encrypted profile mapping plus the active pointer.
//! Every method loads the store fresh, so the file stays the single source of
//! truth between steps of a multi-step operation.

use std::sync::Arc;

use chrono::Utc;
use zeroize::Zeroize;

use crate::crypto;
use crate::error::{CoreError, CoreResult};
use crate::services::{KeyCustodian, ServiceContext};
use crate::types::{CredentialBlob, Profile, ProfileMeta, Store};
use crate::utils::validate_profile_name;

/// Profile store service
pub struct ProfileStore {
    ctx: Arc<ServiceContext>,
    custodian: Arc<KeyCustodian>,
}

impl ProfileStore {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, custodian: Arc<KeyCustodian>) -> Self {
        Self { ctx, custodian }
    }

    /// Load the store; an empty store if nothing was persisted yet.
    pub async fn load(&self) -> CoreResult<Store> {
        let mut store = self.ctx.store_repository().load().await?;
        if let Some(dangling) = store.repair_active_pointer() {
            log::warn!("Active profile \"{dangling}\" does not exist; treating as no active profile");
        }
        Ok(store)
    }

    /// Persist the whole store
    pub async fn save(&self, store: &Store) -> CoreResult<()> {
        self.ctx.store_repository().save(store).await
    }

    /// Seal `blob` into profile `name`, merge `meta`, and make it active.
    ///
    /// Creates the profile on first use (stamping `created_at`); otherwise
    /// replaces its credentials in place. `last_used_at` is always bumped.
    pub async fn upsert_profile(
        &self,
        name: &str,
        blob: &CredentialBlob,
        meta: ProfileMeta,
    ) -> CoreResult<Profile> {
        let mut store = self.load().await?;
        let existing = store.profiles.get(name).cloned();
        if existing.is_none() {
            validate_profile_name(name)?;
        }

        let key = self.custodian.get_or_create_master_key().await?;
        let mut plaintext = blob.to_json()?;
        let sealed = crypto::seal(plaintext.as_bytes(), &key);
        plaintext.zeroize();
        let record = sealed?;

        let now = Utc::now();
        let mut profile = existing.unwrap_or_else(|| Profile {
            name: name.to_string(),
            email: None,
            org: None,
            record: record.clone(),
            created_at: now,
            last_used_at: now,
        });
        profile.record = record;
        profile.last_used_at = now;
        meta.merge_into(&mut profile);

        store.profiles.insert(profile.clone());
        store.active_profile = Some(name.to_string());
        self.save(&store).await?;

        log::info!("Saved credentials for profile \"{name}\"");
        Ok(profile)
    }

    /// Decrypt the credentials stored for `name`
    pub async fn read_profile_credentials(&self, name: &str) -> CoreResult<CredentialBlob> {
        let store = self.load().await?;
        let profile = store
            .profiles
            .get(name)
            .ok_or_else(|| CoreError::ProfileNotFound(name.to_string()))?;

        let key = self.custodian.get_or_create_master_key().await?;
        let mut plaintext = crypto::open(&profile.record, &key)?;
        let blob = CredentialBlob::from_slice(&plaintext);
        plaintext.zeroize();

        blob.ok_or_else(|| {
            CoreError::CorruptStore(format!(
                "profile \"{name}\" decrypted to an unexpected credential shape"
            ))
        })
    }

    /// Point the store at `name` and stamp its `last_used_at`
    pub async fn activate(&self, name: &str) -> CoreResult<Profile> {
        let mut store = self.load().await?;
        let profile = store
            .profiles
            .get_mut(name)
            .ok_or_else(|| CoreError::ProfileNotFound(name.to_string()))?;
        profile.last_used_at = Utc::now();
        let profile = profile.clone();

        store.active_profile = Some(name.to_string());
        self.save(&store).await?;
        Ok(profile)
    }

    /// Delete `name`, reassigning the active pointer if it pointed there.
    ///
    /// The successor is the lexicographically smallest remaining name, or
    /// none. Returns the active pointer after removal.
    pub async fn remove_profile(&self, name: &str) -> CoreResult<Option<String>> {
        let mut store = self.load().await?;
        if store.profiles.remove(name).is_none() {
            return Err(CoreError::ProfileNotFound(name.to_string()));
        }

        if store.is_active(name) {
            store.active_profile = store.successor_for_removed_active();
        }
        self.save(&store).await?;

        log::info!("Removed profile \"{name}\"");
        Ok(store.active_profile)
    }

    pub async fn exists(&self, name: &str) -> CoreResult<bool> {
        Ok(self.load().await?.profiles.contains(name))
    }

    /// All profiles in insertion order
    pub async fn list_all(&self) -> CoreResult<Vec<Profile>> {
        Ok(self.load().await?.profiles.into_iter().collect())
    }

    pub async fn active_profile(&self) -> CoreResult<Option<Profile>> {
        Ok(self.load().await?.active().cloned())
    }
}
