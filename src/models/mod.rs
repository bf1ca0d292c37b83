//! Typed value objects built from API responses.
//!
//! Every model is an immutable snapshot of a single response. The vendor is
//! not consistent about key names across endpoints (search, feed, and detail
//! responses spell the same field differently), so construction goes through
//! lenient `from_api` constructors instead of straight `serde` derives.

mod comment;
mod note;
mod user;

pub use comment::{Comment, CommentPage};
pub use note::{Note, NoteDetail, SearchResult};
pub use user::User;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// First present string among `keys`, else empty.
pub(crate) fn string_at(data: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| data.get(*k).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

/// First present value among `keys`, coerced to a count.
pub(crate) fn count_at(data: &Value, keys: &[&str]) -> u64 {
    keys.iter()
        .find_map(|k| data.get(*k))
        .map(parse_count)
        .unwrap_or(0)
}

/// Coerce a vendor count to an integer.
///
/// Interaction counts arrive either as plain integers or as display strings
/// such as `"3,456"`, `"1.2k"`, or `"4.5w"` (万, ten thousands). Plain
/// integers pass through exactly; malformed strings collapse to zero.
pub(crate) fn parse_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| f.max(0.0) as u64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.replace(',', "");
            let (digits, scale) = match s.strip_suffix(['k', 'K']) {
                Some(rest) => (rest, 1_000.0),
                None => match s.strip_suffix(['w', 'W']).or_else(|| s.strip_suffix('万')) {
                    Some(rest) => (rest, 10_000.0),
                    None => (s.as_str(), 1.0),
                },
            };
            digits
                .trim()
                .parse::<f64>()
                .map(|f| (f * scale).round().max(0.0) as u64)
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Parse a vendor millisecond-epoch field to a UTC timestamp.
pub(crate) fn timestamp_at(data: &Value, key: &str) -> Option<DateTime<Utc>> {
    let ms = data.get(key)?.as_i64()?;
    Utc.timestamp_millis_opt(ms).single()
}
