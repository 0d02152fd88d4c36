//! Side config snapshot abstraction

use async_trait::async_trait;

use crate::error::CoreResult;

/// Per-profile copies of the upstream tool's shared settings file
///
/// A missing shared file or a missing snapshot means "nothing to copy" and
/// is never an error.
#[async_trait]
pub trait ConfigSnapshots: Send + Sync {
    /// Copy the shared file to the snapshot for `profile`
    async fn save_snapshot(&self, profile: &str) -> CoreResult<()>;

    /// Copy the snapshot for `profile` over the shared file
    async fn restore_snapshot(&self, profile: &str) -> CoreResult<()>;

    /// Delete the snapshot for `profile`
    async fn delete_snapshot(&self, profile: &str) -> CoreResult<()>;
}
