//! Dynamic value tree shared by lead data and schema definitions.
//!
//! JSON decodes into this model with two refinements over `serde_json::Value`:
//! integers and floats stay distinct (`1` is an `Int`, `1.0` is a `Float`),
//! and the store-native leaves travel as extended JSON:
//!
//! - `{"$date": "2024-08-09T12:00:00Z"}` or `{"$date": <epoch millis>}`
//! - `{"$timestamp": {"t": <seconds>, "i": <increment>}}`
//!
//! Object keys keep their declaration order.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Ordered field map used by `Value::Object`.
pub type Map = IndexMap<String, Value>;

/// Store-native timestamp: seconds since the epoch plus an ordinal within that second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreTimestamp {
    pub time: u32,
    pub increment: u32,
}

impl StoreTimestamp {
    pub fn new(time: u32, increment: u32) -> Self {
        Self { time, increment }
    }
}

/// A decoded data-tree node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Native temporal value
    Date(DateTime<Utc>),
    /// Store-native timestamp
    Timestamp(StoreTimestamp),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    /// Returns the representation name, for logs and diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a key when this value is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// An empty object.
    pub fn object() -> Self {
        Value::Object(Map::new())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::Date(dt)
    }
}

impl From<StoreTimestamp> for Value {
    fn from(ts: StoreTimestamp) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => match decode_extended(&map) {
                Some(native) => native,
                None => Value::Object(
                    map.into_iter()
                        .map(|(key, value)| (key, Value::from(value)))
                        .collect(),
                ),
            },
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::from(i),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s),
            Value::Date(dt) => json!({ "$date": dt.to_rfc3339_opts(SecondsFormat::AutoSi, true) }),
            Value::Timestamp(ts) => json!({ "$timestamp": { "t": ts.time, "i": ts.increment } }),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Recognizes single-key `$date` / `$timestamp` wrappers.
fn decode_extended(map: &serde_json::Map<String, serde_json::Value>) -> Option<Value> {
    if map.len() != 1 {
        return None;
    }

    if let Some(raw) = map.get("$date") {
        let dt = match raw {
            serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
            _ => None,
        };
        return dt.map(Value::Date);
    }

    let raw = map.get("$timestamp")?.as_object()?;
    let time = u32::try_from(raw.get("t")?.as_u64()?).ok()?;
    let increment = u32::try_from(raw.get("i")?.as_u64()?).ok()?;
    Some(Value::Timestamp(StoreTimestamp { time, increment }))
}
