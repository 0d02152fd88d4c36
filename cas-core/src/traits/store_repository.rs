//! Persisted store abstraction

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Store;

/// Durable home of the [`Store`] document
///
/// Platform implementations:
/// - `JsonStoreRepository`: `~/.cas/profiles.json`, write-temp-then-rename
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// Load the store.
    ///
    /// Returns an empty store when nothing has been persisted yet and
    /// `CoreError::CorruptStore` when the persisted data cannot be parsed.
    async fn load(&self) -> CoreResult<Store>;

    /// Replace the persisted store.
    ///
    /// Must be atomic with respect to `load`: a reader sees either the old or
    /// the new document, never a partial one.
    async fn save(&self, store: &Store) -> CoreResult<()>;
}
