//! Profile name rules.
//!
//! A name ends up inside a file name (`~/.claude-<name>.json`), so anything
//! that could escape the home directory or hide the file is refused.

use crate::error::{CoreError, CoreResult};

const MAX_NAME_LENGTH: usize = 64;

/// Check that `name` is usable as a new profile name.
pub fn validate_profile_name(name: &str) -> CoreResult<()> {
    let invalid = |reason: &str| CoreError::InvalidProfileName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(invalid("name is longer than 64 characters"));
    }
    if name.starts_with('.') {
        return Err(invalid("name must not start with '.'"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(invalid(&format!("character '{c}' is not allowed")));
    }
    Ok(())
}
