//! Small helpers shared across the core

pub mod datetime;
mod names;

pub use names::validate_profile_name;
