//! Decoder implementations

use super::types::RecordDecoder;
use crate::error::{Error, Result};
use serde_json::Value;

/// JSON decoder reading the records from one top-level key
///
/// Recharge wraps every list response in an object keyed by the resource
/// name (`{"subscriptions": [...], "next_cursor": ...}`).
#[derive(Debug, Clone)]
pub struct JsonDecoder {
    record_key: String,
}

impl JsonDecoder {
    /// Create a decoder for the given record key
    pub fn with_key(record_key: impl Into<String>) -> Self {
        Self {
            record_key: record_key.into(),
        }
    }

    /// Get the record key
    pub fn record_key(&self) -> &str {
        &self.record_key
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &Value) -> Result<Vec<Value>> {
        let Value::Object(map) = body else {
            return Err(Error::decode(format!(
                "Expected a JSON object page, got {}",
                json_kind(body)
            )));
        };

        // A page without the key is an empty page
        match map.get(&self.record_key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(records)) => Ok(records.clone()),
            Some(other) => Err(Error::decode(format!(
                "Expected '{}' to be an array, got {}",
                self.record_key,
                json_kind(other)
            ))),
        }
    }
}

/// Human-readable name of a JSON value's kind
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
