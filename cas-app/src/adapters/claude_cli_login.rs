//! Login flow backed by the `claude` executable.
//!
//! `claude auth login` runs in the foreground with the terminal inherited;
//! `claude auth status` is queried with a timeout for account metadata.
//!
//! Waiting on Ctrl-C during a login installs tokio's process-wide SIGINT
//! handler, which stays installed for the rest of the process. From then on
//! Ctrl-C no longer kills `cas`, so the rollback that follows an interrupted
//! login runs to completion.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use cas_core::error::{CoreError, CoreResult};
use cas_core::traits::LoginFlow;
use cas_core::types::AuthStatus;

/// Default bound on `claude auth status`
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(15);

pub struct ClaudeCliLogin {
    program: PathBuf,
    status_timeout: Duration,
}

impl ClaudeCliLogin {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            status_timeout: DEFAULT_STATUS_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_status_timeout(mut self, timeout: Duration) -> Self {
        self.status_timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    async fn query_status(&self) -> Option<String> {
        let output = Command::new(&self.program)
            .args(["auth", "status"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(self.status_timeout, output).await {
            Ok(Ok(output)) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(Ok(output)) => {
                log::warn!("`{} auth status` exited with {}", self.program.display(), output.status);
                None
            }
            Ok(Err(e)) => {
                log::warn!("Failed to run `{} auth status`: {e}", self.program.display());
                None
            }
            Err(_) => {
                log::warn!(
                    "`{} auth status` did not answer within {}s",
                    self.program.display(),
                    self.status_timeout.as_secs()
                );
                None
            }
        }
    }
}

#[async_trait]
impl LoginFlow for ClaudeCliLogin {
    async fn trigger_login(&self) -> CoreResult<()> {
        log::debug!("Spawning `{} auth login`", self.program.display());
        let mut child = Command::new(&self.program)
            .args(["auth", "login"])
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                CoreError::LoginFailed(format!(
                    "could not run `{} auth login`: {e}. Is the Claude CLI installed?",
                    self.program.display()
                ))
            })?;

        let status = tokio::select! {
            status = child.wait() => status
                .map_err(|e| CoreError::LoginFailed(format!("waiting for login: {e}")))?,
            _ = tokio::signal::ctrl_c() => {
                if let Err(e) = child.kill().await {
                    log::warn!("Could not stop the login process: {e}");
                }
                return Err(CoreError::LoginFailed("interrupted".to_string()));
            }
        };

        if status.success() {
            Ok(())
        } else {
            Err(CoreError::LoginFailed(format!(
                "`{} auth login` exited with {status}",
                self.program.display()
            )))
        }
    }

    async fn auth_status(&self) -> AuthStatus {
        match self.query_status().await {
            Some(stdout) => AuthStatus::from_status_output(&stdout),
            None => AuthStatus::default(),
        }
    }
}
