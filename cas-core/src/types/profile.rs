//! Profile and store types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crypto::EncryptedRecord;

/// A named, encrypted identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Profile name (unique key, immutable)
    pub name: String,
    /// Account email reported by the upstream CLI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Organization reported by the upstream CLI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    /// Sealed credential blob
    #[serde(flatten)]
    pub record: EncryptedRecord,
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::utils::datetime")]
    pub last_used_at: DateTime<Utc>,
}

/// Optional account metadata attached to a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileMeta {
    pub email: Option<String>,
    pub org: Option<String>,
}

impl ProfileMeta {
    /// New values win; absent new values keep what `profile` already had.
    pub fn merge_into(self, profile: &mut Profile) {
        if let Some(email) = self.email {
            profile.email = Some(email);
        }
        if let Some(org) = self.org {
            profile.org = Some(org);
        }
    }
}

/// Profiles keyed by name, kept in insertion order.
///
/// Serialized as a JSON object; duplicate keys or a key that disagrees with
/// the profile's own `name` are rejected on read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileMap {
    entries: Vec<Profile>,
}

impl ProfileMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.entries.iter().find(|p| p.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Profile> {
        self.entries.iter_mut().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert or replace in place; a replaced profile keeps its position.
    pub fn insert(&mut self, profile: Profile) {
        match self.get_mut(&profile.name) {
            Some(existing) => *existing = profile,
            None => self.entries.push(profile),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Profile> {
        let index = self.entries.iter().position(|p| p.name == name)?;
        Some(self.entries.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for ProfileMap {
    type Item = Profile;
    type IntoIter = std::vec::IntoIter<Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for ProfileMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for profile in &self.entries {
            map.serialize_entry(&profile.name, profile)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProfileMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ProfileMapVisitor;

        impl<'de> Visitor<'de> for ProfileMapVisitor {
            type Value = ProfileMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping profile names to profiles")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ProfileMap, A::Error> {
                let mut map = ProfileMap::new();
                while let Some((key, profile)) = access.next_entry::<String, Profile>()? {
                    if key != profile.name {
                        return Err(de::Error::custom(format!(
                            "profile key \"{key}\" does not match its name \"{}\"",
                            profile.name
                        )));
                    }
                    if map.contains(&key) {
                        return Err(de::Error::custom(format!("duplicate profile \"{key}\"")));
                    }
                    map.entries.push(profile);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(ProfileMapVisitor)
    }
}

/// The persisted mapping plus the active pointer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(default)]
    pub active_profile: Option<String>,
    #[serde(default)]
    pub profiles: ProfileMap,
}

impl Store {
    /// The profile the active pointer names, if any
    pub fn active(&self) -> Option<&Profile> {
        self.active_profile
            .as_deref()
            .and_then(|name| self.profiles.get(name))
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active_profile.as_deref() == Some(name)
    }

    /// Clear an active pointer that names no profile. Returns the dangling name.
    pub fn repair_active_pointer(&mut self) -> Option<String> {
        match self.active_profile.as_deref() {
            Some(name) if !self.profiles.contains(name) => self.active_profile.take(),
            _ => None,
        }
    }

    /// Successor after the active profile is removed: lexicographically smallest name.
    pub fn successor_for_removed_active(&self) -> Option<String> {
        self.profiles.names().min().map(str::to_string)
    }
}
