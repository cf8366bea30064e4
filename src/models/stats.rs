use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::ProbeError;

/// A recognized field as it arrived: missing entirely, or present with some JSON value
/// (which may be `null` or of an unexpected type).
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    #[default]
    Absent,
    Present(Value),
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(FieldValue::Present)
    }
}

impl FieldValue {
    pub fn value(&self) -> Option<&Value> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Present(v) => Some(v),
        }
    }

    /// Present and not `null`
    pub fn is_set(&self) -> bool {
        matches!(self, FieldValue::Present(v) if !v.is_null())
    }

    pub fn kind(&self) -> Option<ValueKind> {
        self.value().map(ValueKind::of)
    }

    /// Printable text of a set field, `None` when absent or `null`
    pub fn text(&self) -> Option<String> {
        self.value().filter(|v| !v.is_null()).map(plain)
    }

    /// Seconds carried by the field, coerced with [`coerce_seconds`]; absent counts as zero.
    pub fn seconds(&self) -> f64 {
        self.value().map(coerce_seconds).unwrap_or(0.0)
    }
}

/// Observed JSON shape of a value. The API is not consistent about sending
/// numbers as numbers, so the report tags every echoed field with this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(n) if n.is_f64() => ValueKind::Float,
            Value::Number(_) => ValueKind::Integer,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// Normalize a duration value to seconds.
///
/// Numbers pass through, numeric strings are parsed, everything else
/// (null, booleans, non-numeric strings, arrays, objects) becomes `0.0`.
pub fn coerce_seconds(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|secs| secs.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// One recorded time-tracking session. Every field is kept as it arrived so a
/// single odd entry never spoils the whole payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionEntry {
    #[serde(default)]
    pub status: FieldValue,
    #[serde(default)]
    pub start_time: FieldValue,
    #[serde(default)]
    pub end_time: FieldValue,
    #[serde(default)]
    pub total_paused: FieldValue,
}

impl SessionEntry {
    /// End timestamp value; `null` and an empty string count as not finished
    pub fn finished_at(&self) -> Option<&Value> {
        self.end_time
            .value()
            .filter(|end| !matches!(end, Value::Null) && end.as_str() != Some(""))
    }

    pub fn paused_seconds(&self) -> f64 {
        self.total_paused.seconds()
    }
}

// Strings print bare, everything else as JSON
pub fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Payload of `/api/stats/custom`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub total_duration: FieldValue,
    #[serde(default)]
    pub average_daily_hours: FieldValue,
    #[serde(default)]
    pub longest_session: FieldValue,
    #[serde(default, deserialize_with = "null_as_default")]
    pub daily_stats: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entries: Vec<SessionEntry>,
    /// The whole document as received, for verbatim echo
    #[serde(skip)]
    pub raw: Value,
}

impl StatsResponse {
    pub fn from_value(value: Value) -> Result<Self, ProbeError> {
        if !value.is_object() {
            return Err(ProbeError::Shape(format!(
                "stats payload must be a JSON object, got {}",
                ValueKind::of(&value)
            )));
        }

        let mut stats: StatsResponse = serde_json::from_value(value.clone())
            .map_err(|e| ProbeError::Shape(e.to_string()))?;
        stats.raw = value;
        Ok(stats)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
