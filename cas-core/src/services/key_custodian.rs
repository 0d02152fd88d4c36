//! Secret key custodian
//!
//! Owns the two secret store slots the tool cares about: the upstream CLI's
//! live credential slot, and the slot holding the master key that encrypts
//! every saved profile.

use std::sync::Arc;

use tokio::sync::RwLock;
use zeroize::Zeroize;

use crate::crypto::MasterKey;
use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::SecretSlot;
use crate::types::CredentialBlob;

/// Keychain service under which `claude` keeps its live credentials
pub const LIVE_CREDENTIALS_SERVICE: &str = "Claude Code-credentials";
/// Keychain service/account holding the master key
pub const MASTER_KEY_SERVICE: &str = "cas-encryption-key";
pub const MASTER_KEY_ACCOUNT: &str = "cas";

/// Addresses of the live slot and the master key slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretSlots {
    pub live: SecretSlot,
    pub master_key: SecretSlot,
}

impl SecretSlots {
    /// Default slots; the live slot is keyed by the OS user name.
    pub fn for_user(os_user: impl Into<String>) -> Self {
        Self {
            live: SecretSlot::new(LIVE_CREDENTIALS_SERVICE, os_user),
            master_key: SecretSlot::new(MASTER_KEY_SERVICE, MASTER_KEY_ACCOUNT),
        }
    }
}

/// Secret key custodian
pub struct KeyCustodian {
    ctx: Arc<ServiceContext>,
    master_key: RwLock<Option<MasterKey>>,
}

impl KeyCustodian {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            master_key: RwLock::new(None),
        }
    }

    fn slots(&self) -> &SecretSlots {
        self.ctx.slots()
    }

    /// Read the live slot.
    ///
    /// An empty slot and a value that does not look like upstream credentials
    /// are both `Ok(None)`; only secret store failures are errors.
    pub async fn get_live_credentials(&self) -> CoreResult<Option<CredentialBlob>> {
        let slot = &self.slots().live;
        let Some(raw) = self.ctx.secret_store().find(slot).await? else {
            log::debug!("Live slot {slot} is empty");
            return Ok(None);
        };

        let blob = CredentialBlob::parse(&raw);
        if blob.is_none() {
            log::warn!("Live slot {slot} holds unrecognised data; treating it as empty");
        }
        Ok(blob)
    }

    /// Overwrite the live slot (delete-then-insert in the secret store)
    pub async fn set_live_credentials(&self, blob: &CredentialBlob) -> CoreResult<()> {
        let mut json = blob.to_json()?;
        let result = self
            .ctx
            .secret_store()
            .set(&self.slots().live, &json)
            .await;
        json.zeroize();
        result?;
        log::debug!("Live slot {} updated", self.slots().live);
        Ok(())
    }

    /// Remove the live slot; already-empty is fine
    pub async fn clear_live_credentials(&self) -> CoreResult<()> {
        self.ctx.secret_store().delete(&self.slots().live).await?;
        log::debug!("Live slot {} cleared", self.slots().live);
        Ok(())
    }

    /// Fetch the master key, creating and persisting it on first use.
    ///
    /// A slot holding something that is not a 256-bit hex key is an error:
    /// replacing it would orphan every profile sealed under the old key.
    pub async fn get_or_create_master_key(&self) -> CoreResult<MasterKey> {
        {
            let cache = self.master_key.read().await;
            if let Some(ref key) = *cache {
                return Ok(key.clone());
            }
        }

        let mut cache = self.master_key.write().await;
        if let Some(ref key) = *cache {
            return Ok(key.clone());
        }

        let slot = &self.slots().master_key;
        let stored = self.ctx.secret_store().find(slot).await?;
        let key = match stored {
            Some(mut encoded) if !encoded.trim().is_empty() => {
                let parsed = MasterKey::from_hex(&encoded);
                encoded.zeroize();
                parsed.ok_or_else(|| {
                    CoreError::SecretStore(format!(
                        "Master key in {slot} is malformed; refusing to replace it"
                    ))
                })?
            }
            _ => {
                let key = MasterKey::generate();
                let mut encoded = key.to_hex();
                let result = self.ctx.secret_store().set(slot, &encoded).await;
                encoded.zeroize();
                result?;
                log::info!("Created new master key in {slot}");
                key
            }
        };

        *cache = Some(key.clone());
        Ok(key)
    }
}
