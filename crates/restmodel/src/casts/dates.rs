//! Temporal normalization.
//!
//! Every function here is pure: the same input shape always takes the same
//! parsing path, whichever attribute it belongs to. All timestamps are UTC.
//!
//! Recognized inputs, tried in order:
//!
//! 1. An existing [`NaiveDateTime`].
//! 2. A Unix timestamp in seconds, numeric or as digits in text (`"1429311541"`).
//! 3. RFC 3339 text (`"2015-04-17T22:59:01+02:00"`), converted to UTC.
//! 4. Date-time text (`"2015-04-17 22:59:01"`, `T` separator, optional fraction).
//! 5. Bare date text (`"2015-04-17"`, also unpadded `"2015-4-17"`), at midnight.

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::attributes::AttrValue;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse any recognized runtime value into a date-time.
pub fn parse_date_time(value: &AttrValue) -> Option<NaiveDateTime> {
    match value {
        AttrValue::DateTime(dt) => Some(*dt),
        AttrValue::Int(secs) => from_timestamp(*secs),
        AttrValue::Float(secs) if secs.is_finite() && secs.fract() == 0.0 => {
            from_timestamp(*secs as i64)
        }
        AttrValue::String(text) => parse_date_time_str(text),
        AttrValue::Structure(raw) => parse_raw(raw),
        _ => None,
    }
}

/// Parse a stored wire value into a date-time.
pub fn parse_raw(raw: &Value) -> Option<NaiveDateTime> {
    match raw {
        Value::Number(n) => match n.as_i64() {
            Some(secs) => from_timestamp(secs),
            None => parse_date_time(&AttrValue::Float(n.as_f64()?)),
        },
        Value::String(text) => parse_date_time_str(text),
        _ => None,
    }
}

/// Parse a stored wire value, trying the model's storage format first.
///
/// A storage format without time fields reads back at midnight.
pub fn parse_stored(raw: &Value, format: &str) -> Option<NaiveDateTime> {
    if let Value::String(text) = raw {
        let text = text.trim();
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
        if let Some(dt) = NaiveDate::parse_from_str(text, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Some(dt);
        }
    }
    parse_raw(raw)
}

pub fn parse_date_time_str(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    if is_integer_text(text) {
        return text.parse::<i64>().ok().and_then(from_timestamp);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn from_timestamp(secs: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

pub fn to_timestamp(dt: &NaiveDateTime) -> i64 {
    dt.and_utc().timestamp()
}

/// Truncate to midnight of the same day.
pub fn start_of_day(dt: &NaiveDateTime) -> NaiveDateTime {
    dt.date().and_hms_opt(0, 0, 0).unwrap_or(*dt)
}

/// Render `dt` with a chrono strftime pattern.
///
/// Returns `None` for patterns chrono cannot render, instead of panicking
/// inside `Display`.
pub fn format_date_time(dt: &NaiveDateTime, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", dt.format(format)).ok()?;
    Some(out)
}

/// Normalize any recognized input into the canonical storage text.
pub fn from_date_time(value: &AttrValue, format: &str) -> Option<String> {
    parse_date_time(value).and_then(|dt| format_date_time(&dt, format))
}

fn is_integer_text(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
