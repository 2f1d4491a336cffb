//! Runtime representation to logical kind classification.
//!
//! Several representations can satisfy one kind (a date may be native or an
//! ISO string, a timestamp may be an integer, a float, a numeric string or a
//! store timestamp). Classification resolves that ambiguity once and hands
//! the normalized value to constraint checks.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

use super::errors::Mismatch;
use super::types::Kind;
use super::value::{Map, Value};

/// A value that matched its kind, in normalized form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classified<'a> {
    Null,
    Str(&'a str),
    Number(f64),
    Bool(bool),
    Array(&'a [Value]),
    Object(&'a Map),
    Date(DateTime<Utc>),
    /// Seconds since the epoch
    Timestamp(i64),
}

/// Classifies `value` as `kind`. Total: every input yields a result or a mismatch.
pub fn classify(value: &Value, kind: Kind) -> Result<Classified<'_>, Mismatch> {
    if value.is_null() {
        return if kind == Kind::Null {
            Ok(Classified::Null)
        } else {
            Err(Mismatch::MustNotBeNull)
        };
    }

    match (kind, value) {
        (Kind::Null, _) => Err(Mismatch::MustBeNull),
        (Kind::String, Value::Str(s)) => Ok(Classified::Str(s)),
        (Kind::Number, Value::Int(i)) => Ok(Classified::Number(*i as f64)),
        (Kind::Number | Kind::Double, Value::Float(f)) => Ok(Classified::Number(*f)),
        (Kind::Boolean, Value::Bool(b)) => Ok(Classified::Bool(*b)),
        (Kind::Array, Value::Array(items)) => Ok(Classified::Array(items)),
        (Kind::Object, Value::Object(map)) => Ok(Classified::Object(map)),
        (Kind::Date, Value::Date(dt)) => Ok(Classified::Date(*dt)),
        (Kind::Date, Value::Str(s)) => parse_date(s)
            .map(Classified::Date)
            .ok_or(Mismatch::InvalidDateString),
        (Kind::Timestamp, Value::Timestamp(ts)) => Ok(Classified::Timestamp(i64::from(ts.time))),
        (Kind::Timestamp, Value::Int(i)) => Ok(Classified::Timestamp(*i)),
        (Kind::Timestamp, Value::Float(f)) => Ok(Classified::Timestamp(f.trunc() as i64)),
        (Kind::Timestamp, Value::Str(s)) => s
            .parse::<i64>()
            .map(Classified::Timestamp)
            .map_err(|_| Mismatch::InvalidTimestampString),
        (kind, _) => Err(Mismatch::WrongKind(kind)),
    }
}

/// Accepted textual date layouts, tried in order.
///
/// Each layout has a fixed shape: zero-padded fields, an upper-case `T`
/// separator, and `Z` or a `+HH:MM` offset. Text must match the shape
/// exactly before chrono checks field ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLayout {
    /// `2024-08-09T12:00:00Z`, `2024-08-09T12:00:00+02:00`
    Rfc3339,
    /// `2024-08-09T12:00:00.123456789Z`
    Rfc3339Fractional,
    /// `2024-08-09`, midnight UTC
    DateOnly,
    /// `2024-08-09 12:00:00`, UTC
    SpaceSeparated,
    /// `2024-08-09T12:00:00`, UTC
    NoZone,
    /// `2024-08-09T12:00:00-05:00`
    NumericOffset,
}

const DATE_LAYOUTS: [DateLayout; 6] = [
    DateLayout::Rfc3339,
    DateLayout::Rfc3339Fractional,
    DateLayout::DateOnly,
    DateLayout::SpaceSeparated,
    DateLayout::NoZone,
    DateLayout::NumericOffset,
];

fn shapes() -> &'static [Option<Regex>; 6] {
    static SHAPES: OnceLock<[Option<Regex>; 6]> = OnceLock::new();
    SHAPES.get_or_init(|| DATE_LAYOUTS.map(|layout| Regex::new(layout.shape()).ok()))
}

impl DateLayout {
    fn shape(self) -> &'static str {
        match self {
            DateLayout::Rfc3339 => {
                r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(Z|[+-][0-9]{2}:[0-9]{2})$"
            }
            DateLayout::Rfc3339Fractional => {
                r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]+(Z|[+-][0-9]{2}:[0-9]{2})$"
            }
            DateLayout::DateOnly => r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$",
            DateLayout::SpaceSeparated => {
                r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}$"
            }
            DateLayout::NoZone => r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}$",
            DateLayout::NumericOffset => {
                r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}[+-][0-9]{2}:[0-9]{2}$"
            }
        }
    }

    /// Whether `text` has exactly this layout's shape.
    pub fn matches_shape(self, text: &str) -> bool {
        shapes()[self as usize]
            .as_ref()
            .is_some_and(|shape| shape.is_match(text))
    }

    pub fn parse(self, text: &str) -> Option<DateTime<Utc>> {
        if !self.matches_shape(text) {
            return None;
        }

        match self {
            DateLayout::Rfc3339 | DateLayout::Rfc3339Fractional | DateLayout::NumericOffset => {
                DateTime::parse_from_rfc3339(text)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            }
            DateLayout::DateOnly => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive)),
            DateLayout::SpaceSeparated => naive_utc(text, "%Y-%m-%d %H:%M:%S"),
            DateLayout::NoZone => naive_utc(text, "%Y-%m-%dT%H:%M:%S"),
        }
    }
}

/// Parses `text` with the first layout that accepts it.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    DATE_LAYOUTS.iter().find_map(|layout| layout.parse(text))
}

fn naive_utc(text: &str, format: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, format)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
