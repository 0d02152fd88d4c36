//! Service layer

mod key_custodian;
mod profile_store;
mod switch_orchestrator;

pub use key_custodian::{
    KeyCustodian, SecretSlots, LIVE_CREDENTIALS_SERVICE, MASTER_KEY_ACCOUNT, MASTER_KEY_SERVICE,
};
pub use profile_store::ProfileStore;
pub use switch_orchestrator::{
    CapturedLive, RemoveOutcome, SwitchOrchestrator, SwitchOutcome, SwitchPhase,
};

use std::sync::Arc;

use crate::traits::{ConfigSnapshots, LoginFlow, SecretStore, StoreRepository};

/// Service context - holds all collaborators
///
/// The platform layer builds this once per process and injects the concrete
/// adapters; services only ever see the traits.
pub struct ServiceContext {
    secret_store: Arc<dyn SecretStore>,
    store_repository: Arc<dyn StoreRepository>,
    login_flow: Arc<dyn LoginFlow>,
    config_snapshots: Arc<dyn ConfigSnapshots>,
    slots: SecretSlots,
}

impl ServiceContext {
    /// Create the service context
    #[must_use]
    pub fn new(
        secret_store: Arc<dyn SecretStore>,
        store_repository: Arc<dyn StoreRepository>,
        login_flow: Arc<dyn LoginFlow>,
        config_snapshots: Arc<dyn ConfigSnapshots>,
        slots: SecretSlots,
    ) -> Self {
        Self {
            secret_store,
            store_repository,
            login_flow,
            config_snapshots,
            slots,
        }
    }

    pub fn secret_store(&self) -> &Arc<dyn SecretStore> {
        &self.secret_store
    }

    pub fn store_repository(&self) -> &Arc<dyn StoreRepository> {
        &self.store_repository
    }

    pub fn login_flow(&self) -> &Arc<dyn LoginFlow> {
        &self.login_flow
    }

    pub fn config_snapshots(&self) -> &Arc<dyn ConfigSnapshots> {
        &self.config_snapshots
    }

    pub fn slots(&self) -> &SecretSlots {
        &self.slots
    }
}
