//! JSON file store repository.
//!
//! Persists the whole [`Store`] as one pretty-printed JSON document. Writes go
//! through a temp file and a rename, so `load` never observes a partial file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use cas_core::error::{CoreError, CoreResult};
use cas_core::traits::StoreRepository;
use cas_core::types::Store;

use super::fs_util;

/// Store repository backed by `~/.cas/profiles.json`
pub struct JsonStoreRepository {
    path: Arc<PathBuf>,
}

impl JsonStoreRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_sync(path: &Path) -> CoreResult<Store> {
        let Some(bytes) = fs_util::read_optional(path)
            .map_err(|e| CoreError::Storage(format!("{}: {e}", path.display())))?
        else {
            log::debug!("No store at {}; starting empty", path.display());
            return Ok(Store::default());
        };

        serde_json::from_slice(&bytes)
            .map_err(|e| CoreError::CorruptStore(format!("{}: {e}", path.display())))
    }

    fn save_sync(path: &Path, json: &[u8]) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            fs_util::ensure_private_dir(parent)
                .map_err(|e| CoreError::Storage(format!("{}: {e}", parent.display())))?;
        }
        fs_util::write_atomic(path, json)
            .map_err(|e| CoreError::Storage(format!("{}: {e}", path.display())))
    }
}

#[async_trait]
impl StoreRepository for JsonStoreRepository {
    async fn load(&self) -> CoreResult<Store> {
        let path = Arc::clone(&self.path);
        tokio::task::spawn_blocking(move || Self::load_sync(&path))
            .await
            .map_err(|e| CoreError::Storage(format!("Task join error: {e}")))?
    }

    async fn save(&self, store: &Store) -> CoreResult<()> {
        let json = serde_json::to_vec_pretty(store)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        let path = Arc::clone(&self.path);

        tokio::task::spawn_blocking(move || Self::save_sync(&path, &json))
            .await
            .map_err(|e| CoreError::Storage(format!("Task join error: {e}")))??;

        log::debug!(
            "Saved {} profile(s) to {}",
            store.profiles.len(),
            self.path.display()
        );
        Ok(())
    }
}
