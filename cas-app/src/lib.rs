//! Application bootstrap for the cas account switcher.
//!
//! Provides `AppConfig` (resolved locations), `AppState` (service container)
//! and `AppStateBuilder` (adapter injection).

pub mod adapters;
mod config;

use std::sync::Arc;

use cas_core::error::{CoreError, CoreResult};
use cas_core::services::{
    KeyCustodian, ProfileStore, SecretSlots, ServiceContext, SwitchOrchestrator,
};
use cas_core::traits::{ConfigSnapshots, LoginFlow, SecretStore, StoreRepository};

pub use config::{AppConfig, ENV_CLAUDE_BIN, ENV_HOME, ENV_KEYCHAIN_ACCOUNT};

/// Application state.
///
/// Holds all services and the `ServiceContext`. A frontend constructs this
/// once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds all adapters)
    pub ctx: Arc<ServiceContext>,
    /// Live slot and master key access
    pub custodian: Arc<KeyCustodian>,
    /// Encrypted profiles and the active pointer
    pub profile_store: Arc<ProfileStore>,
    /// Switch / add / remove
    pub orchestrator: SwitchOrchestrator,
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required
/// - `secret_store` — where live credentials and the master key live
/// - `store_repository` — where the profile store is persisted
/// - `login_flow` — how a new identity is enrolled
/// - `config_snapshots` — how the side config file is swapped
/// - `slots` — secret store addresses
pub struct AppStateBuilder {
    secret_store: Option<Arc<dyn SecretStore>>,
    store_repository: Option<Arc<dyn StoreRepository>>,
    login_flow: Option<Arc<dyn LoginFlow>>,
    config_snapshots: Option<Arc<dyn ConfigSnapshots>>,
    slots: Option<SecretSlots>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            secret_store: None,
            store_repository: None,
            login_flow: None,
            config_snapshots: None,
            slots: None,
        }
    }

    /// Builder preloaded with the file, CLI and keychain adapters for `config`
    #[cfg(feature = "keyring-store")]
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new()
            .secret_store(Arc::new(adapters::KeyringSecretStore::new()))
            .with_file_adapters(config)
    }

    /// Everything except the secret store, from `config`
    #[must_use]
    pub fn with_file_adapters(self, config: &AppConfig) -> Self {
        self.store_repository(Arc::new(adapters::JsonStoreRepository::new(
            config.store_file.clone(),
        )))
        .login_flow(Arc::new(
            adapters::ClaudeCliLogin::new(config.claude_bin.clone())
                .with_status_timeout(config.status_timeout),
        ))
        .config_snapshots(Arc::new(adapters::FileConfigSnapshots::new(
            config.shared_config.clone(),
        )))
        .slots(config.slots())
    }

    #[must_use]
    pub fn secret_store(mut self, store: Arc<dyn SecretStore>) -> Self {
        self.secret_store = Some(store);
        self
    }

    #[must_use]
    pub fn store_repository(mut self, repo: Arc<dyn StoreRepository>) -> Self {
        self.store_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn login_flow(mut self, login: Arc<dyn LoginFlow>) -> Self {
        self.login_flow = Some(login);
        self
    }

    #[must_use]
    pub fn config_snapshots(mut self, snapshots: Arc<dyn ConfigSnapshots>) -> Self {
        self.config_snapshots = Some(snapshots);
        self
    }

    #[must_use]
    pub fn slots(mut self, slots: SecretSlots) -> Self {
        self.slots = Some(slots);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::Validation` if a required adapter is missing.
    pub fn build(self) -> CoreResult<AppState> {
        let secret_store = self
            .secret_store
            .ok_or_else(|| CoreError::Validation("secret_store is required".to_string()))?;
        let store_repository = self
            .store_repository
            .ok_or_else(|| CoreError::Validation("store_repository is required".to_string()))?;
        let login_flow = self
            .login_flow
            .ok_or_else(|| CoreError::Validation("login_flow is required".to_string()))?;
        let config_snapshots = self
            .config_snapshots
            .ok_or_else(|| CoreError::Validation("config_snapshots is required".to_string()))?;
        let slots = self
            .slots
            .ok_or_else(|| CoreError::Validation("slots is required".to_string()))?;

        let ctx = Arc::new(ServiceContext::new(
            secret_store,
            store_repository,
            login_flow,
            config_snapshots,
            slots,
        ));

        let custodian = Arc::new(KeyCustodian::new(Arc::clone(&ctx)));
        let profile_store = Arc::new(ProfileStore::new(Arc::clone(&ctx), Arc::clone(&custodian)));
        let orchestrator = SwitchOrchestrator::new(
            Arc::clone(&ctx),
            Arc::clone(&custodian),
            Arc::clone(&profile_store),
        );

        Ok(AppState {
            ctx,
            custodian,
            profile_store,
            orchestrator,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
