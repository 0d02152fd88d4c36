//! Timestamp serde helpers for the store file.
//!
//! Written as RFC 3339 UTC with millisecond precision and a `Z` suffix, the
//! same shape JavaScript's `toISOString()` produces, so store files written by
//! earlier tooling stay byte-compatible. On read, RFC 3339 strings with any
//! offset and Unix timestamps (seconds or milliseconds) are accepted.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Unix(i64),
    }

    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Text(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp: {e}"))),
        RawTimestamp::Unix(ts) => {
            from_unix(ts).ok_or_else(|| Error::custom(format!("Invalid Unix timestamp: {ts}")))
        }
    }
}

/// Values above 10^11 are taken as milliseconds, anything else as seconds.
fn from_unix(ts: i64) -> Option<DateTime<Utc>> {
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}
