//! Live credential payload written by the upstream CLI.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};

/// The token bundle `claude` keeps in its keychain entry.
///
/// Only the two tokens are required. Every other field, known or not, is
/// carried through untouched so that a profile restores exactly what the
/// upstream tool wrote.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialBlob {
    #[serde(rename = "claudeAiOauth")]
    pub oauth: OAuthTokens,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// `expiresAt`, `scopes`, `subscriptionType` and anything newer, as written
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CredentialBlob {
    /// Build a blob holding just the two tokens.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            oauth: OAuthTokens {
                access_token: access_token.into(),
                refresh_token: refresh_token.into(),
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    /// Validate a raw live-slot value.
    ///
    /// Returns `None` for anything that is not a JSON document with non-empty
    /// access and refresh tokens; callers treat that the same as an empty slot.
    pub fn parse(raw: &str) -> Option<Self> {
        let blob: Self = match serde_json::from_str(raw) {
            Ok(blob) => blob,
            Err(e) => {
                log::debug!("Live credentials do not match the expected shape: {e}");
                return None;
            }
        };
        if blob.oauth.access_token.trim().is_empty() || blob.oauth.refresh_token.trim().is_empty()
        {
            log::debug!("Live credentials are missing a token");
            return None;
        }
        Some(blob)
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        std::str::from_utf8(bytes).ok().and_then(Self::parse)
    }

    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(|e| CoreError::Serialization(e.to_string()))
    }
}

impl fmt::Debug for CredentialBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBlob")
            .field("oauth", &self.oauth)
            .field("extra_keys", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Debug for OAuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthTokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("extra_keys", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}
