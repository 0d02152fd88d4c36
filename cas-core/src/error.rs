//! Unified error type definition

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
///
/// Every variant is terminal to the current operation. Nothing in the core
/// retries; the only automatic recovery is the Add rollback, whose own
/// failure surfaces as [`CoreError::RollbackFailed`].
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// No profile with this name exists in the store
    #[error("Profile \"{0}\" not found")]
    ProfileNotFound(String),

    /// A profile with this name already exists
    #[error("Profile \"{0}\" already exists")]
    ProfileAlreadyExists(String),

    /// Refused to remove the live identity without `force`
    #[error("Profile \"{0}\" is the active profile. Use --force to remove it")]
    ActiveProfileGuard(String),

    /// Profile name cannot be used as a store key / file name component
    #[error("Invalid profile name \"{name}\": {reason}")]
    InvalidProfileName { name: String, reason: String },

    /// Authenticated decryption failed (wrong key, corrupted or tampered record)
    #[error("Integrity check failed: wrong key or corrupted profile data")]
    Integrity,

    /// The persisted store could not be parsed
    #[error("Profile store is corrupt: {0}")]
    CorruptStore(String),

    /// The OS secret store is unreachable or denied access
    #[error("Secret store error: {0}")]
    SecretStore(String),

    /// The upstream interactive login failed or could not be started
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// Login reported success but the live slot holds no usable credentials
    #[error("No credentials found after login")]
    NoCredentialsProduced,

    /// Rollback after a failed operation did not fully succeed
    #[error("{cause} (rollback also failed: {rollback})")]
    RollbackFailed {
        cause: Box<CoreError>,
        rollback: RollbackError,
    },

    /// Storage layer error (store file, snapshot files)
    #[error("Storage error: {0}")]
    Storage(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ProfileNotFound(_)
            | Self::ProfileAlreadyExists(_)
            | Self::ActiveProfileGuard(_)
            | Self::InvalidProfileName { .. }
            | Self::LoginFailed(_)
            | Self::NoCredentialsProduced => true,
            _ => false,
        }
    }

    /// Wrap `self` with a rollback failure, or return it untouched when the
    /// rollback went through.
    #[must_use]
    pub fn with_rollback(self, rollback: Result<(), RollbackError>) -> Self {
        match rollback {
            Ok(()) => self,
            Err(rollback) => Self::RollbackFailed {
                cause: Box::new(self),
                rollback,
            },
        }
    }
}

/// Every rollback step that failed, in the order they were attempted
#[derive(Debug, Serialize)]
pub struct RollbackError {
    pub failures: Vec<CoreError>,
}

impl fmt::Display for RollbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RollbackError {}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
