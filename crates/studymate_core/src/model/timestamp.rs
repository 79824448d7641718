//! `created_at` decoding shared by persisted records.
//!
//! Records are written as RFC 3339. Older stores hold naive ISO-8601 local
//! timestamps without an offset; those are read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Parses RFC 3339 first, then offset-less ISO-8601 as UTC.
pub fn parse_created_at(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    value
        .parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|err| format!("invalid created_at `{value}`: {err}"))
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_created_at(&raw).map_err(serde::de::Error::custom)
}
