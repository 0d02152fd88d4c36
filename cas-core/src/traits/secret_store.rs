//! OS secret store abstraction

use std::fmt;

use async_trait::async_trait;

use crate::error::CoreResult;

/// A `(service, account)` address in the secret store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretSlot {
    pub service: String,
    pub account: String,
}

impl SecretSlot {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }
}

impl fmt::Display for SecretSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service, self.account)
    }
}

/// Secret store Trait
///
/// Platform implementations:
/// - Desktop: `KeyringSecretStore` (keyring crate)
/// - Tests: `MemorySecretStore`
///
/// Implementations must surface unreachable/denied stores as
/// `CoreError::SecretStore` and never report an error as "absent".
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Read a slot
    ///
    /// # Returns
    /// * `Ok(Some(value))` - slot exists
    /// * `Ok(None)` - slot does not exist
    async fn find(&self, slot: &SecretSlot) -> CoreResult<Option<String>>;

    /// Overwrite a slot.
    ///
    /// Stores without an atomic upsert implement this as delete-then-insert;
    /// a reader may observe the slot as absent in between.
    async fn set(&self, slot: &SecretSlot, value: &str) -> CoreResult<()>;

    /// Remove a slot; removing an absent slot is not an error.
    async fn delete(&self, slot: &SecretSlot) -> CoreResult<()>;
}
