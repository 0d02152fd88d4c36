//! Side config snapshots as sibling files of the shared config.
//!
//! The upstream CLI keeps per-account settings in `~/.claude.json`; each
//! profile gets its own copy at `~/.claude-<name>.json`. Snapshots are
//! replaced atomically; the shared file is overwritten in place so a symlinked
//! `~/.claude.json` keeps pointing at its target with its own mode.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use cas_core::error::{CoreError, CoreResult};
use cas_core::traits::ConfigSnapshots;

use super::fs_util;

pub struct FileConfigSnapshots {
    shared: PathBuf,
}

impl FileConfigSnapshots {
    /// `shared` is the upstream settings file; snapshots live next to it.
    pub fn new(shared: impl Into<PathBuf>) -> Self {
        Self {
            shared: shared.into(),
        }
    }

    pub fn shared_path(&self) -> &Path {
        &self.shared
    }

    /// `<dir>/.claude.json` → `<dir>/.claude-<profile>.json`
    pub fn snapshot_path(&self, profile: &str) -> PathBuf {
        let stem = self
            .shared
            .file_stem()
            .map_or_else(|| ".claude".into(), |s| s.to_string_lossy().into_owned());
        let file_name = match self.shared.extension() {
            Some(ext) => format!("{stem}-{profile}.{}", ext.to_string_lossy()),
            None => format!("{stem}-{profile}"),
        };
        self.shared.with_file_name(file_name)
    }

    async fn copy(from: PathBuf, to: PathBuf, into_shared: bool) -> CoreResult<bool> {
        tokio::task::spawn_blocking(move || {
            let Some(bytes) = fs_util::read_optional(&from).map_err(|e| io_error(&from, &e))?
            else {
                return Ok(false);
            };
            let written = if into_shared {
                fs_util::write_in_place(&to, &bytes)
            } else {
                fs_util::write_atomic(&to, &bytes)
            };
            written.map_err(|e| io_error(&to, &e))?;
            Ok(true)
        })
        .await
        .map_err(|e| CoreError::Storage(format!("Task join error: {e}")))?
    }
}

fn io_error(path: &Path, e: &std::io::Error) -> CoreError {
    CoreError::Storage(format!("{}: {e}", path.display()))
}

#[async_trait]
impl ConfigSnapshots for FileConfigSnapshots {
    async fn save_snapshot(&self, profile: &str) -> CoreResult<()> {
        let target = self.snapshot_path(profile);
        if Self::copy(self.shared.clone(), target.clone(), false).await? {
            log::debug!("Saved side config for \"{profile}\" to {}", target.display());
        } else {
            log::debug!("No shared config at {}; nothing to save", self.shared.display());
        }
        Ok(())
    }

    async fn restore_snapshot(&self, profile: &str) -> CoreResult<()> {
        let source = self.snapshot_path(profile);
        if Self::copy(source.clone(), self.shared.clone(), true).await? {
            log::debug!("Restored side config for \"{profile}\" from {}", source.display());
        } else {
            log::debug!("No side config snapshot for \"{profile}\"; shared config left as is");
        }
        Ok(())
    }

    async fn delete_snapshot(&self, profile: &str) -> CoreResult<()> {
        let path = self.snapshot_path(profile);
        tokio::task::spawn_blocking(move || {
            fs_util::remove_optional(&path).map_err(|e| io_error(&path, &e))
        })
        .await
        .map_err(|e| CoreError::Storage(format!("Task join error: {e}")))?
    }
}
