//! Decoder types and traits

use crate::error::Result;
use serde_json::Value;

/// Trait for pulling the record list out of a decoded response body
pub trait RecordDecoder: Send + Sync {
    /// Extract the records of one page
    fn decode(&self, body: &Value) -> Result<Vec<Value>>;
}
