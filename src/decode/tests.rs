//! Tests for decoder module

use super::*;
use crate::error::Error;
use serde_json::json;

#[test]
fn test_json_decoder_extracts_records() {
    let decoder = JsonDecoder::with_key("subscriptions");
    let body = json!({
        "next_cursor": "abc",
        "subscriptions": [{"id": 1}, {"id": 2}]
    });

    let records = decoder.decode(&body).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["id"], 2);
}

#[test]
fn test_json_decoder_missing_key_is_empty_page() {
    let decoder = JsonDecoder::with_key("orders");
    let records = decoder.decode(&json!({"next_cursor": null})).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_json_decoder_null_key_is_empty_page() {
    let decoder = JsonDecoder::with_key("orders");
    let records = decoder.decode(&json!({"orders": null})).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_json_decoder_rejects_non_object_body() {
    let decoder = JsonDecoder::with_key("orders");
    let err = decoder.decode(&json!([{"id": 1}])).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("array"));
}

#[test]
fn test_json_decoder_rejects_non_array_records() {
    let decoder = JsonDecoder::with_key("orders");
    let err = decoder.decode(&json!({"orders": {"id": 1}})).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_json_kind() {
    assert_eq!(json_kind(&json!(null)), "null");
    assert_eq!(json_kind(&json!("x")), "string");
    assert_eq!(json_kind(&json!(1.5)), "number");
    assert_eq!(json_kind(&json!({})), "object");
}
