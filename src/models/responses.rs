use serde_json::{Map, Value};

use crate::error::ProbeError;
use crate::models::ValueKind;

/// Payload of `/api/time/status`. No schema is assumed beyond "a JSON object".
pub type TimeStatusResponse = Map<String, Value>;

pub fn time_status_from_value(value: Value) -> Result<TimeStatusResponse, ProbeError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ProbeError::Shape(format!(
            "time status payload must be a JSON object, got {}",
            ValueKind::of(&other)
        ))),
    }
}
