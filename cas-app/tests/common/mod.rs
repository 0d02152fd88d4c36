#![allow(dead_code, clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Shared fixtures for the integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cas_app::{AppConfig, AppState, AppStateBuilder};
use cas_core::error::{CoreError, CoreResult};
use cas_core::traits::{SecretSlot, SecretStore};

/// Secret store keeping one file per slot, so a child process can write it.
pub struct DirSecretStore {
    dir: PathBuf,
}

impl DirSecretStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        fs::create_dir_all(&dir).unwrap();
        Self { dir }
    }

    pub fn slot_path(&self, slot: &SecretSlot) -> PathBuf {
        self.dir.join(format!("{}__{}", slot.service, slot.account))
    }

    pub fn read(&self, slot: &SecretSlot) -> Option<String> {
        fs::read_to_string(self.slot_path(slot)).ok()
    }
}

#[async_trait]
impl SecretStore for DirSecretStore {
    async fn find(&self, slot: &SecretSlot) -> CoreResult<Option<String>> {
        match fs::read_to_string(self.slot_path(slot)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::SecretStore(e.to_string())),
        }
    }

    async fn set(&self, slot: &SecretSlot, value: &str) -> CoreResult<()> {
        fs::write(self.slot_path(slot), value).map_err(|e| CoreError::SecretStore(e.to_string()))
    }

    async fn delete(&self, slot: &SecretSlot) -> CoreResult<()> {
        match fs::remove_file(self.slot_path(slot)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::SecretStore(e.to_string())),
        }
    }
}

/// Live-slot JSON as the upstream CLI writes it
pub fn live_json(tag: &str) -> String {
    format!(
        r#"{{"claudeAiOauth":{{"accessToken":"sk-ant-oat01-{tag}","refreshToken":"sk-ant-ort01-{tag}","expiresAt":1760000000000,"scopes":["user:inference"],"subscriptionType":"max"}}}}"#
    )
}

/// A temporary home directory with its own secret store
pub struct Sandbox {
    pub dir: tempfile::TempDir,
    pub config: AppConfig,
    pub secrets: Arc<DirSecretStore>,
    scripts: std::cell::Cell<usize>,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::for_home(dir.path().join("home"), "tester");
        fs::create_dir_all(&config.home).unwrap();
        let secrets = Arc::new(DirSecretStore::new(dir.path().join("keychain")));
        Self {
            dir,
            config,
            secrets,
            scripts: std::cell::Cell::new(0),
        }
    }

    pub fn live_slot(&self) -> SecretSlot {
        self.config.slots().live
    }

    pub fn live(&self) -> Option<String> {
        self.secrets.read(&self.live_slot())
    }

    /// One invocation's worth of services, as a CLI run would build them
    pub fn app(&self, claude_bin: &Path) -> AppState {
        let config = self
            .config
            .clone()
            .with_claude_bin(Some(claude_bin.to_path_buf()));
        AppStateBuilder::new()
            .secret_store(self.secrets.clone())
            .with_file_adapters(&config)
            .build()
            .unwrap()
    }

    /// Write a fake `claude` whose login produces `live` (if any) and
    /// rewrites the shared config, then exits with `login_exit`.
    #[cfg(unix)]
    pub fn fake_claude(&self, live: Option<&str>, email: &str, login_exit: i32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let n = self.scripts.get() + 1;
        self.scripts.set(n);
        let path = self.dir.path().join(format!("claude-{n}"));

        let write_live = live.map_or_else(String::new, |json| {
            format!(
                "  printf '%s' '{json}' > '{}'\n",
                self.secrets.slot_path(&self.live_slot()).display()
            )
        });
        let script = format!(
            "#!/bin/sh\n\
             if [ \"$1\" = auth ] && [ \"$2\" = login ]; then\n\
             {write_live}\
             \x20 printf '%s' '{{\"user\":\"{email}\"}}' > '{shared}'\n\
             \x20 exit {login_exit}\n\
             fi\n\
             if [ \"$1\" = auth ] && [ \"$2\" = status ]; then\n\
             \x20 printf '%s' '{{\"loggedIn\":true,\"email\":\"{email}\",\"orgName\":\"Acme\"}}'\n\
             \x20 exit 0\n\
             fi\n\
             exit 2\n",
            shared = self.config.shared_config.display(),
        );
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }
}
