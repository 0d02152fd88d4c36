//! Switch orchestrator
//!
//! Coordinates the profile store with the live slot and the side config
//! snapshots. Outside of an operation, the live slot holds the credentials
//! of exactly the profile named by the active pointer.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{CoreError, CoreResult, RollbackError};
use crate::services::{KeyCustodian, ProfileStore, ServiceContext};
use crate::types::{CredentialBlob, Profile, ProfileMeta};
use crate::utils::validate_profile_name;

/// Phases an operation moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPhase {
    Idle,
    SavingPrevious,
    ClearingLive,
    /// Add only: the upstream login is running in the foreground
    AwaitingExternalLogin,
    CapturingNew,
    /// Switch only: target credentials go live and the pointer moves
    ActivatingTarget,
    Committed,
    RollingBack,
}

impl fmt::Display for SwitchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::SavingPrevious => "saving-previous",
            Self::ClearingLive => "clearing-live",
            Self::AwaitingExternalLogin => "awaiting-external-login",
            Self::CapturingNew => "capturing-new",
            Self::ActivatingTarget => "activating-target",
            Self::Committed => "committed",
            Self::RollingBack => "rolling-back",
        };
        f.write_str(name)
    }
}

/// What was live before an operation started
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapturedLive {
    pub active_profile: Option<String>,
    pub credentials: Option<CredentialBlob>,
}

/// Result of a switch
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchOutcome {
    /// Target was already active; nothing was written
    AlreadyActive(Profile),
    Switched {
        profile: Profile,
        previous: Option<String>,
    },
}

impl SwitchOutcome {
    pub fn profile(&self) -> &Profile {
        match self {
            Self::AlreadyActive(profile) | Self::Switched { profile, .. } => profile,
        }
    }
}

/// Result of a remove
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOutcome {
    pub removed: String,
    pub was_active: bool,
    /// Active pointer after the removal
    pub active_profile: Option<String>,
}

/// Switch orchestrator service
pub struct SwitchOrchestrator {
    ctx: Arc<ServiceContext>,
    custodian: Arc<KeyCustodian>,
    profiles: Arc<ProfileStore>,
    phases: Mutex<Vec<SwitchPhase>>,
}

impl SwitchOrchestrator {
    #[must_use]
    pub fn new(
        ctx: Arc<ServiceContext>,
        custodian: Arc<KeyCustodian>,
        profiles: Arc<ProfileStore>,
    ) -> Self {
        Self {
            ctx,
            custodian,
            profiles,
            phases: Mutex::new(Vec::new()),
        }
    }

    /// Phases entered by the most recent switch or add
    pub async fn phase_history(&self) -> Vec<SwitchPhase> {
        self.phases.lock().await.clone()
    }

    async fn begin(&self) {
        let mut phases = self.phases.lock().await;
        phases.clear();
        phases.push(SwitchPhase::Idle);
    }

    async fn enter(&self, phase: SwitchPhase) {
        log::debug!("Entering phase {phase}");
        self.phases.lock().await.push(phase);
    }

    /// Make `name` the live identity.
    ///
    /// The target is decrypted before anything is written, so a missing key
    /// or a tampered record fails with the previous identity still live.
    pub async fn switch(&self, name: &str) -> CoreResult<SwitchOutcome> {
        self.begin().await;

        let store = self.profiles.load().await?;
        let Some(target) = store.profiles.get(name) else {
            return Err(CoreError::ProfileNotFound(name.to_string()));
        };
        if store.is_active(name) {
            log::info!("Profile \"{name}\" is already active");
            return Ok(SwitchOutcome::AlreadyActive(target.clone()));
        }

        let blob = self.profiles.read_profile_credentials(name).await?;

        self.enter(SwitchPhase::SavingPrevious).await;
        let captured = self.save_previous().await?;

        self.enter(SwitchPhase::ActivatingTarget).await;
        self.custodian.set_live_credentials(&blob).await?;
        self.ctx.config_snapshots().restore_snapshot(name).await?;
        let profile = self.profiles.activate(name).await?;

        self.enter(SwitchPhase::Committed).await;
        log::info!("Switched to profile \"{name}\"");
        Ok(SwitchOutcome::Switched {
            profile,
            previous: captured.active_profile,
        })
    }

    /// Enroll a new identity through the upstream interactive login.
    ///
    /// Any failure after the previous identity was saved rolls the live slot
    /// and side config back to what they were, and leaves no trace of `name`.
    pub async fn add(&self, name: &str) -> CoreResult<Profile> {
        self.begin().await;

        validate_profile_name(name)?;
        if self.profiles.exists(name).await? {
            return Err(CoreError::ProfileAlreadyExists(name.to_string()));
        }

        self.enter(SwitchPhase::SavingPrevious).await;
        let captured = self.save_previous().await?;

        match self.enroll(name).await {
            Ok(profile) => {
                self.enter(SwitchPhase::Committed).await;
                log::info!("Added profile \"{name}\"");
                Ok(profile)
            }
            Err(e) => {
                log::warn!("Adding profile \"{name}\" failed: {e}; rolling back");
                self.enter(SwitchPhase::RollingBack).await;
                let rollback = self.rollback(&captured, Some(name)).await;
                self.enter(SwitchPhase::Idle).await;
                Err(e.with_rollback(rollback))
            }
        }
    }

    async fn enroll(&self, name: &str) -> CoreResult<Profile> {
        self.enter(SwitchPhase::ClearingLive).await;
        self.custodian.clear_live_credentials().await?;

        self.enter(SwitchPhase::AwaitingExternalLogin).await;
        self.ctx.login_flow().trigger_login().await?;

        self.enter(SwitchPhase::CapturingNew).await;
        let blob = self
            .custodian
            .get_live_credentials()
            .await?
            .ok_or(CoreError::NoCredentialsProduced)?;

        let status = self.ctx.login_flow().auth_status().await;
        if !status.authenticated {
            log::warn!("Upstream reports not logged in; saving profile without account details");
        }

        self.ctx.config_snapshots().save_snapshot(name).await?;
        self.profiles
            .upsert_profile(name, &blob, status.into_meta())
            .await
    }

    /// Capture what is live and, when it belongs to an active profile, seal
    /// it back into that profile along with its side config.
    ///
    /// The upstream tool refreshes tokens in place, so the live copy is
    /// newer than the sealed one.
    async fn save_previous(&self) -> CoreResult<CapturedLive> {
        let active_profile = self.profiles.load().await?.active_profile;
        let credentials = self.custodian.get_live_credentials().await?;

        match (&active_profile, &credentials) {
            (Some(previous), Some(blob)) => {
                self.ctx.config_snapshots().save_snapshot(previous).await?;
                self.profiles
                    .upsert_profile(previous, blob, ProfileMeta::default())
                    .await?;
                log::debug!("Saved live credentials back into \"{previous}\"");
            }
            (Some(previous), None) => {
                log::warn!("Live slot is empty; \"{previous}\" keeps its last saved credentials");
            }
            (None, _) => {}
        }

        Ok(CapturedLive {
            active_profile,
            credentials,
        })
    }

    /// Put back what `captured` recorded and drop anything written for the
    /// `abandoned` name.
    ///
    /// Every step is attempted; the error lists each one that failed.
    pub async fn rollback(
        &self,
        captured: &CapturedLive,
        abandoned: Option<&str>,
    ) -> Result<(), RollbackError> {
        let mut failures = Vec::new();

        let live = match &captured.credentials {
            Some(blob) => self.custodian.set_live_credentials(blob).await,
            None => self.custodian.clear_live_credentials().await,
        };
        if let Err(e) = live {
            log::error!("Rollback could not restore the live slot: {e}");
            failures.push(e);
        }

        if let Some(previous) = &captured.active_profile {
            if let Err(e) = self.ctx.config_snapshots().restore_snapshot(previous).await {
                log::error!("Rollback could not restore side config of \"{previous}\": {e}");
                failures.push(e);
            }
        }

        if let Some(name) = abandoned {
            if let Err(e) = self.ctx.config_snapshots().delete_snapshot(name).await {
                log::error!("Rollback could not delete side config of \"{name}\": {e}");
                failures.push(e);
            }
        }

        if failures.is_empty() {
            log::info!("Rollback complete");
            Ok(())
        } else {
            Err(RollbackError { failures })
        }
    }

    /// Delete a profile and its side config snapshot.
    ///
    /// The live slot is left as it is, even when the removed profile was
    /// active.
    pub async fn remove(&self, name: &str, force: bool) -> CoreResult<RemoveOutcome> {
        let store = self.profiles.load().await?;
        if !store.profiles.contains(name) {
            return Err(CoreError::ProfileNotFound(name.to_string()));
        }
        let was_active = store.is_active(name);
        if was_active && !force {
            return Err(CoreError::ActiveProfileGuard(name.to_string()));
        }

        let active_profile = self.profiles.remove_profile(name).await?;
        self.ctx.config_snapshots().delete_snapshot(name).await?;

        Ok(RemoveOutcome {
            removed: name.to_string(),
            was_active,
            active_profile,
        })
    }
}
