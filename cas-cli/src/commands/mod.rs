pub mod add;
pub mod current;
pub mod list;
pub mod remove;
pub mod setup_shell;
pub mod switch;

use cas_core::types::Profile;
use colored::Colorize;

/// ` (email) [org]`, dimmed, for whichever parts are known
pub(crate) fn identity_suffix(profile: &Profile) -> String {
    let mut suffix = String::new();
    if let Some(email) = &profile.email {
        suffix.push_str(&format!(" ({email})"));
    }
    if let Some(org) = &profile.org {
        suffix.push_str(&format!(" [{org}]"));
    }
    suffix.dimmed().to_string()
}
