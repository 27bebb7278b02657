//! Lenient JSON readers shared by the provider adapters and the config
//! store.
//!
//! Every reader returns `None` instead of failing, so one bad field only
//! blanks that field.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Read a number, accepting numeric strings.
pub(crate) fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Read a timestamp: epoch seconds, RFC 3339, or a naive ISO string whose
/// offset from UTC is `utc_offset_seconds`.
pub(crate) fn timestamp(value: Option<&Value>, utc_offset_seconds: i64) -> Option<DateTime<Utc>> {
    match value? {
        Value::Number(n) => Utc.timestamp_opt(n.as_i64()?, 0).single(),
        Value::String(s) => parse_timestamp_str(s.trim(), utc_offset_seconds),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str, utc_offset_seconds: i64) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()?;
    Some(Utc.from_utc_datetime(&naive) - chrono::Duration::seconds(utc_offset_seconds))
}

/// Walk a dotted path through nested objects. An empty key finds nothing.
pub(crate) fn path<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    if key.is_empty() {
        return None;
    }
    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}
