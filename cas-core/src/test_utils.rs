//! Test helpers
//!
//! In-memory fakes for every collaborator trait, plus a harness that wires
//! them into the real services.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::{
    KeyCustodian, ProfileStore, SecretSlots, ServiceContext, SwitchOrchestrator,
};
use crate::traits::{ConfigSnapshots, LoginFlow, SecretSlot, SecretStore, StoreRepository};
use crate::types::{AuthStatus, CredentialBlob, ProfileMeta, Store};

/// Credentials whose tokens are derived from `tag`
pub fn sample_blob(tag: &str) -> CredentialBlob {
    CredentialBlob::new(format!("sk-ant-oat01-{tag}"), format!("sk-ant-ort01-{tag}"))
}

// ===== MemorySecretStore =====

#[derive(Default)]
struct SecretState {
    entries: HashMap<SecretSlot, String>,
    writes: usize,
    unavailable: Option<String>,
    fail_on_set: bool,
}

#[derive(Default)]
pub struct MemorySecretStore {
    state: RwLock<SecretState>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a value in place without counting it as a write
    pub async fn seed(&self, slot: &SecretSlot, value: &str) {
        self.state
            .write()
            .await
            .entries
            .insert(slot.clone(), value.to_string());
    }

    pub async fn value(&self, slot: &SecretSlot) -> Option<String> {
        self.state.read().await.entries.get(slot).cloned()
    }

    /// Number of `set` and `delete` calls that went through
    pub async fn write_count(&self) -> usize {
        self.state.read().await.writes
    }

    /// Every operation fails with `reason` while set
    pub async fn set_unavailable(&self, reason: Option<&str>) {
        self.state.write().await.unavailable = reason.map(str::to_string);
    }

    pub async fn set_fail_on_set(&self, fail: bool) {
        self.state.write().await.fail_on_set = fail;
    }
}

fn check_available(state: &SecretState) -> CoreResult<()> {
    match &state.unavailable {
        Some(reason) => Err(CoreError::SecretStore(reason.clone())),
        None => Ok(()),
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn find(&self, slot: &SecretSlot) -> CoreResult<Option<String>> {
        let state = self.state.read().await;
        check_available(&state)?;
        Ok(state.entries.get(slot).cloned())
    }

    async fn set(&self, slot: &SecretSlot, value: &str) -> CoreResult<()> {
        let mut state = self.state.write().await;
        check_available(&state)?;
        if state.fail_on_set {
            return Err(CoreError::SecretStore("write denied".to_string()));
        }
        state.entries.insert(slot.clone(), value.to_string());
        state.writes += 1;
        Ok(())
    }

    async fn delete(&self, slot: &SecretSlot) -> CoreResult<()> {
        let mut state = self.state.write().await;
        check_available(&state)?;
        state.entries.remove(slot);
        state.writes += 1;
        Ok(())
    }
}

// ===== MemoryStoreRepository =====

#[derive(Default)]
struct RepositoryState {
    store: Option<Store>,
    saves: usize,
    corrupt: Option<String>,
    /// Saves still allowed before every save fails
    saves_left: Option<usize>,
}

#[derive(Default)]
pub struct MemoryStoreRepository {
    state: RwLock<RepositoryState>,
}

impl MemoryStoreRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// The persisted store, or an empty one if nothing was saved
    pub async fn saved(&self) -> Store {
        self.state.read().await.store.clone().unwrap_or_default()
    }

    /// Overwrite the persisted store without counting a save
    pub async fn replace(&self, store: Store) {
        self.state.write().await.store = Some(store);
    }

    pub async fn save_count(&self) -> usize {
        self.state.read().await.saves
    }

    /// `load` fails as if the file could not be parsed
    pub async fn set_corrupt(&self, reason: Option<&str>) {
        self.state.write().await.corrupt = reason.map(str::to_string);
    }

    pub async fn fail_saves_after(&self, allowed: usize) {
        self.state.write().await.saves_left = Some(allowed);
    }
}

#[async_trait]
impl StoreRepository for MemoryStoreRepository {
    async fn load(&self) -> CoreResult<Store> {
        let state = self.state.read().await;
        if let Some(ref reason) = state.corrupt {
            return Err(CoreError::CorruptStore(reason.clone()));
        }
        Ok(state.store.clone().unwrap_or_default())
    }

    async fn save(&self, store: &Store) -> CoreResult<()> {
        let mut state = self.state.write().await;
        if let Some(left) = state.saves_left.as_mut() {
            if *left == 0 {
                return Err(CoreError::Storage("disk full".to_string()));
            }
            *left -= 1;
        }
        state.store = Some(store.clone());
        state.saves += 1;
        Ok(())
    }
}

// ===== MemoryConfigSnapshots =====

#[derive(Default)]
struct SnapshotState {
    shared: Option<String>,
    snapshots: HashMap<String, String>,
    unavailable: bool,
}

/// Shared config file and per-profile snapshots held in memory
#[derive(Default)]
pub struct MemoryConfigSnapshots {
    state: RwLock<SnapshotState>,
}

impl MemoryConfigSnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_shared(&self, content: Option<&str>) {
        self.state.write().await.shared = content.map(str::to_string);
    }

    pub async fn shared(&self) -> Option<String> {
        self.state.read().await.shared.clone()
    }

    pub async fn snapshot(&self, profile: &str) -> Option<String> {
        self.state.read().await.snapshots.get(profile).cloned()
    }

    pub async fn seed_snapshot(&self, profile: &str, content: &str) {
        self.state
            .write()
            .await
            .snapshots
            .insert(profile.to_string(), content.to_string());
    }

    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.write().await.unavailable = unavailable;
    }
}

fn snapshots_available(state: &SnapshotState) -> CoreResult<()> {
    if state.unavailable {
        return Err(CoreError::Storage("permission denied".to_string()));
    }
    Ok(())
}

#[async_trait]
impl ConfigSnapshots for MemoryConfigSnapshots {
    async fn save_snapshot(&self, profile: &str) -> CoreResult<()> {
        let mut state = self.state.write().await;
        snapshots_available(&state)?;
        if let Some(shared) = state.shared.clone() {
            state.snapshots.insert(profile.to_string(), shared);
        }
        Ok(())
    }

    async fn restore_snapshot(&self, profile: &str) -> CoreResult<()> {
        let mut state = self.state.write().await;
        snapshots_available(&state)?;
        if let Some(snapshot) = state.snapshots.get(profile).cloned() {
            state.shared = Some(snapshot);
        }
        Ok(())
    }

    async fn delete_snapshot(&self, profile: &str) -> CoreResult<()> {
        let mut state = self.state.write().await;
        snapshots_available(&state)?;
        state.snapshots.remove(profile);
        Ok(())
    }
}

// ===== ScriptedLoginFlow =====

/// What the next `trigger_login` does
#[derive(Debug, Clone)]
pub enum LoginScript {
    Fail(String),
    Succeed {
        /// Raw value written into the live slot
        produce: Option<String>,
        status: AuthStatus,
        /// New content of the shared config file
        shared_config: Option<String>,
    },
}

impl LoginScript {
    pub fn succeed(blob: &CredentialBlob, status: AuthStatus, shared_config: Option<&str>) -> Self {
        Self::Succeed {
            produce: Some(blob.to_json().unwrap()),
            status,
            shared_config: shared_config.map(str::to_string),
        }
    }
}

/// Login flow that writes what the upstream tool would have written
pub struct ScriptedLoginFlow {
    secret_store: Arc<MemorySecretStore>,
    snapshots: Arc<MemoryConfigSnapshots>,
    live: SecretSlot,
    script: RwLock<LoginScript>,
    calls: RwLock<usize>,
}

impl ScriptedLoginFlow {
    pub fn new(
        secret_store: Arc<MemorySecretStore>,
        snapshots: Arc<MemoryConfigSnapshots>,
        live: SecretSlot,
    ) -> Self {
        Self {
            secret_store,
            snapshots,
            live,
            script: RwLock::new(LoginScript::Fail("no login scripted".to_string())),
            calls: RwLock::new(0),
        }
    }

    pub async fn script(&self, script: LoginScript) {
        *self.script.write().await = script;
    }

    pub async fn calls(&self) -> usize {
        *self.calls.read().await
    }
}

#[async_trait]
impl LoginFlow for ScriptedLoginFlow {
    async fn trigger_login(&self) -> CoreResult<()> {
        *self.calls.write().await += 1;
        match self.script.read().await.clone() {
            LoginScript::Fail(reason) => Err(CoreError::LoginFailed(reason)),
            LoginScript::Succeed {
                produce,
                shared_config,
                ..
            } => {
                if let Some(raw) = produce {
                    self.secret_store.set(&self.live, &raw).await?;
                }
                if let Some(content) = shared_config {
                    self.snapshots.set_shared(Some(&content)).await;
                }
                Ok(())
            }
        }
    }

    async fn auth_status(&self) -> AuthStatus {
        match &*self.script.read().await {
            LoginScript::Succeed { status, .. } => status.clone(),
            LoginScript::Fail(_) => AuthStatus::default(),
        }
    }
}

// ===== TestHarness =====

/// Real services over in-memory collaborators
pub struct TestHarness {
    pub secret_store: Arc<MemorySecretStore>,
    pub repository: Arc<MemoryStoreRepository>,
    pub snapshots: Arc<MemoryConfigSnapshots>,
    pub login: Arc<ScriptedLoginFlow>,
    pub ctx: Arc<ServiceContext>,
    pub custodian: Arc<KeyCustodian>,
    pub profiles: Arc<ProfileStore>,
    pub orchestrator: SwitchOrchestrator,
}

impl TestHarness {
    pub fn new() -> Self {
        let slots = SecretSlots::for_user("tester");
        let secret_store = Arc::new(MemorySecretStore::new());
        let repository = Arc::new(MemoryStoreRepository::new());
        let snapshots = Arc::new(MemoryConfigSnapshots::new());
        let login = Arc::new(ScriptedLoginFlow::new(
            Arc::clone(&secret_store),
            Arc::clone(&snapshots),
            slots.live.clone(),
        ));

        let ctx = Arc::new(ServiceContext::new(
            secret_store.clone(),
            repository.clone(),
            login.clone(),
            snapshots.clone(),
            slots,
        ));
        let custodian = Arc::new(KeyCustodian::new(Arc::clone(&ctx)));
        let profiles = Arc::new(ProfileStore::new(Arc::clone(&ctx), Arc::clone(&custodian)));
        let orchestrator = SwitchOrchestrator::new(
            Arc::clone(&ctx),
            Arc::clone(&custodian),
            Arc::clone(&profiles),
        );

        Self {
            secret_store,
            repository,
            snapshots,
            login,
            ctx,
            custodian,
            profiles,
            orchestrator,
        }
    }

    pub fn slots(&self) -> &SecretSlots {
        self.ctx.slots()
    }

    /// Save `blob` as profile `name`, make it active and put it live
    pub async fn seed_active(&self, name: &str, blob: &CredentialBlob) {
        self.profiles
            .upsert_profile(name, blob, ProfileMeta::default())
            .await
            .unwrap();
        self.custodian.set_live_credentials(blob).await.unwrap();
    }
}
