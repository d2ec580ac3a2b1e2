use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::prelude::{Error, Result};

/// Distinguishes an absent key (`None`) from an explicit `null`
/// (`Some(None)`); use with `#[serde(default, deserialize_with = "presence")]`.
pub fn presence<'de, D, T>(deserializer: D) -> core::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Keeps a value only if it carries text; empty updates are ignored.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Empty strings are stored as NULL.
pub fn empty_as_null(value: Option<String>) -> Option<String> {
    non_empty(value)
}

pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| Error::validation(format!("{field} must be an RFC 3339 timestamp")))
}
