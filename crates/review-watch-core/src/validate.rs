//! Shape checks for raw API responses.
//!
//! The API client hands back whatever JSON it decoded; nothing downstream
//! looks at it until [`validate`] has turned it into a [`ResponseEnvelope`].

use crate::error::{Result, WatchError};
use crate::types::ResponseEnvelope;
use serde_json::Value;

/// Check a decoded response against the expected envelope shape.
pub fn validate(candidate: Value) -> Result<ResponseEnvelope> {
    if is_empty(&candidate) {
        tracing::error!("API response is empty");
        return Err(WatchError::EmptyResponse);
    }

    let Value::Object(mut map) = candidate else {
        tracing::error!(found = json_type(&candidate), "API response is not an object");
        return Err(WatchError::Shape(format!(
            "expected an object, got {}",
            json_type(&candidate)
        )));
    };

    let homeworks = match map.remove("homeworks") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            tracing::error!(found = json_type(&other), "'homeworks' is not a list");
            return Err(WatchError::Shape(format!(
                "'homeworks' must be a list, got {}",
                json_type(&other)
            )));
        }
        None => {
            tracing::error!("API response has no 'homeworks' key");
            return Err(WatchError::Shape("missing 'homeworks' key".to_string()));
        }
    };

    let current_date = match map.remove("current_date") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) if n.is_i64() => n.as_i64(),
        Some(other) => {
            tracing::warn!(found = json_type(&other), "ignoring non-integer 'current_date'");
            None
        }
    };

    Ok(ResponseEnvelope {
        homeworks,
        current_date,
    })
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(m) => m.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
