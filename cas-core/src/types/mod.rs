//! Data model

mod auth;
mod credentials;
mod profile;

pub use auth::AuthStatus;
pub use credentials::{CredentialBlob, OAuthTokens};
pub use profile::{Profile, ProfileMap, ProfileMeta, Store};
