//! Runtime configuration
//!
//! Every location and secret store address is resolved once at startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cas_core::error::{CoreError, CoreResult};
use cas_core::services::SecretSlots;

use crate::adapters::DEFAULT_STATUS_TIMEOUT;

/// Overrides the home directory
pub const ENV_HOME: &str = "CAS_HOME";
/// Overrides the account of the live credential slot
pub const ENV_KEYCHAIN_ACCOUNT: &str = "CAS_KEYCHAIN_ACCOUNT";
/// Overrides the upstream executable
pub const ENV_CLAUDE_BIN: &str = "CAS_CLAUDE_BIN";

const STORE_DIR: &str = ".cas";
const STORE_FILE: &str = "profiles.json";
const SHARED_CONFIG: &str = ".claude.json";
const DEFAULT_CLAUDE_BIN: &str = "claude";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub home: PathBuf,
    /// `<home>/.cas/profiles.json`
    pub store_file: PathBuf,
    /// `<home>/.claude.json`; snapshots are written next to it
    pub shared_config: PathBuf,
    pub keychain_account: String,
    pub claude_bin: PathBuf,
    pub status_timeout: Duration,
}

impl AppConfig {
    /// Defaults rooted at `home`
    pub fn for_home(home: impl Into<PathBuf>, keychain_account: impl Into<String>) -> Self {
        let home = home.into();
        Self {
            store_file: home.join(STORE_DIR).join(STORE_FILE),
            shared_config: home.join(SHARED_CONFIG),
            home,
            keychain_account: keychain_account.into(),
            claude_bin: PathBuf::from(DEFAULT_CLAUDE_BIN),
            status_timeout: DEFAULT_STATUS_TIMEOUT,
        }
    }

    /// Resolve from the process environment
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Resolve from `lookup` (an environment), falling back to `default_home`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        default_home: Option<PathBuf>,
    ) -> CoreResult<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let home = var(ENV_HOME)
            .map(PathBuf::from)
            .or(default_home)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "could not determine the home directory; set {ENV_HOME}"
                ))
            })?;

        let account = var(ENV_KEYCHAIN_ACCOUNT)
            .or_else(|| var("USER"))
            .or_else(|| var("USERNAME"))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "could not determine the OS user name; set {ENV_KEYCHAIN_ACCOUNT}"
                ))
            })?;

        let mut config = Self::for_home(home, account);
        if let Some(bin) = var(ENV_CLAUDE_BIN) {
            config.claude_bin = PathBuf::from(bin);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_keychain_account(mut self, account: Option<String>) -> Self {
        if let Some(account) = account {
            self.keychain_account = account;
        }
        self
    }

    #[must_use]
    pub fn with_claude_bin(mut self, bin: Option<PathBuf>) -> Self {
        if let Some(bin) = bin {
            self.claude_bin = bin;
        }
        self
    }

    pub fn store_dir(&self) -> &Path {
        self.store_file.parent().unwrap_or(&self.home)
    }

    pub fn slots(&self) -> SecretSlots {
        SecretSlots::for_user(self.keychain_account.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_derive_from_home() {
        let config =
            AppConfig::from_lookup(env(&[("USER", "alice")]), Some("/home/alice".into())).unwrap();

        assert_eq!(config.store_file, PathBuf::from("/home/alice/.cas/profiles.json"));
        assert_eq!(config.store_dir(), Path::new("/home/alice/.cas"));
        assert_eq!(config.shared_config, PathBuf::from("/home/alice/.claude.json"));
        assert_eq!(config.claude_bin, PathBuf::from("claude"));
        assert_eq!(config.slots().live.account, "alice");
        assert_eq!(config.slots().master_key.service, "cas-encryption-key");
        assert_eq!(config.status_timeout, Duration::from_secs(15));
    }

    #[test]
    fn env_overrides_win() {
        let config = AppConfig::from_lookup(
            env(&[
                ("CAS_HOME", "/tmp/h"),
                ("CAS_KEYCHAIN_ACCOUNT", "bob"),
                ("CAS_CLAUDE_BIN", "/opt/claude"),
                ("USER", "alice"),
            ]),
            Some("/home/alice".into()),
        )
        .unwrap();

        assert_eq!(config.home, PathBuf::from("/tmp/h"));
        assert_eq!(config.keychain_account, "bob");
        assert_eq!(config.claude_bin, PathBuf::from("/opt/claude"));
    }

    #[test]
    fn windows_user_name_is_used() {
        let config =
            AppConfig::from_lookup(env(&[("USERNAME", "carol")]), Some("C:/Users/carol".into()))
                .unwrap();
        assert_eq!(config.keychain_account, "carol");
    }

    #[test]
    fn missing_home_or_user_is_rejected() {
        assert!(matches!(
            AppConfig::from_lookup(env(&[("USER", "alice")]), None),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(env(&[("USER", " ")]), Some("/home/x".into())),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn cli_overrides_apply_only_when_given() {
        let config = AppConfig::for_home("/home/alice", "alice")
            .with_keychain_account(None)
            .with_claude_bin(Some("/usr/local/bin/claude".into()));
        assert_eq!(config.keychain_account, "alice");
        assert_eq!(config.claude_bin, PathBuf::from("/usr/local/bin/claude"));
    }
}
