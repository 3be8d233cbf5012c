use crate::error::{BackendError, Result};
use chrono::{DateTime, SecondsFormat, Utc};

/// Formats an instant the way the emulated wire format reports timestamps:
/// ISO-8601 with no sub-second precision, e.g. `2024-01-01T00:00:00Z`.
pub fn iso_8601_without_subseconds(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses an ISO-8601 / RFC 3339 timestamp as received on the wire.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            BackendError::InvalidParameter(format!("Timestamp '{}' is not valid ISO-8601: {}", raw, e))
        })
}
