//! Upstream CLI login abstraction

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::AuthStatus;

/// The upstream tool's own login and status commands
#[async_trait]
pub trait LoginFlow: Send + Sync {
    /// Run the interactive login in the foreground.
    ///
    /// Blocks for as long as the user takes. Non-zero exit, spawn failure and
    /// user interruption are all reported as `CoreError::LoginFailed`.
    async fn trigger_login(&self) -> CoreResult<()>;

    /// Query account metadata. Best effort, bounded in time, never fails.
    async fn auth_status(&self) -> AuthStatus;
}
