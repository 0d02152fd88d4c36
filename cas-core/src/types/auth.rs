//! Account metadata reported by the upstream CLI

use serde::Deserialize;

use super::ProfileMeta;

/// Result of `claude auth status`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub email: Option<String>,
    pub org: Option<String>,
}

/// Wire shape of `claude auth status` output; everything optional.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAuthStatus {
    #[serde(default)]
    logged_in: Option<bool>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    org_name: Option<String>,
}

impl AuthStatus {
    /// Best-effort parse: any shape mismatch is "not authenticated, no metadata".
    pub fn from_status_output(stdout: &str) -> Self {
        match serde_json::from_str::<RawAuthStatus>(stdout.trim()) {
            Ok(raw) => Self {
                authenticated: raw.logged_in == Some(true),
                email: raw.email.filter(|s| !s.trim().is_empty()),
                org: raw.org_name.filter(|s| !s.trim().is_empty()),
            },
            Err(e) => {
                log::warn!("Could not parse auth status output: {e}");
                Self::default()
            }
        }
    }

    pub fn into_meta(self) -> ProfileMeta {
        ProfileMeta {
            email: self.email,
            org: self.org,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_logged_in_status() {
        let status = AuthStatus::from_status_output(
            r#"{"loggedIn":true,"email":"me@example.com","orgName":"Acme","authMethod":"oauth"}"#,
        );
        assert!(status.authenticated);
        assert_eq!(status.email.as_deref(), Some("me@example.com"));
        assert_eq!(status.org.as_deref(), Some("Acme"));
    }

    #[test]
    fn wrong_types_and_garbage_are_unauthenticated() {
        assert_eq!(AuthStatus::from_status_output("Logged in as me"), AuthStatus::default());
        assert_eq!(
            AuthStatus::from_status_output(r#"{"loggedIn":"yes","email":42}"#),
            AuthStatus::default()
        );
    }

    #[test]
    fn blank_metadata_is_dropped() {
        let status = AuthStatus::from_status_output(r#"{"loggedIn":true,"email":" "}"#);
        assert!(status.authenticated);
        assert_eq!(status.into_meta(), ProfileMeta::default());
    }
}
