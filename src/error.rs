//! Error types for the Recharge connector
//!
//! Every public API returns `Result<T, Error>` where Error is defined here.
//! Fetch errors (transport, status, decode) always abort the in-flight pull.
//! Row errors (schema mismatch, coercion, projection) are raised per record
//! and either skipped or propagated depending on the `RowErrorPolicy`.

use thiserror::Error;

/// The main error type for the connector
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Flattening Errors
    // ============================================================================
    #[error("Record {index} does not match the {record_type} shape: {message}")]
    SchemaMismatch {
        record_type: &'static str,
        index: usize,
        message: String,
    },

    #[error("Cannot coerce {value} to {target} for column '{column}'")]
    TypeCoercion {
        column: String,
        target: &'static str,
        value: String,
    },

    #[error("Field '{path}' is missing from {record_type} record {index}")]
    FieldProjection {
        record_type: &'static str,
        index: usize,
        path: String,
    },

    #[error("Column '{column}' to drop is not present in any {record_type} record")]
    MissingColumn {
        record_type: &'static str,
        column: String,
    },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// True for out-of-type values in a single record.
    ///
    /// These are the only errors a `RowErrorPolicy::Skip` run recovers from;
    /// a missing projected field always fails the flatten.
    pub fn is_row_error(&self) -> bool {
        matches!(
            self,
            Error::SchemaMismatch { .. } | Error::TypeCoercion { .. }
        )
    }
}

/// Result type alias for the connector
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("prod_api_token");
        assert_eq!(
            err.to_string(),
            "Missing required config field: prod_api_token"
        );

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");

        let err = Error::TypeCoercion {
            column: "price".to_string(),
            target: "Float64",
            value: "\"abc\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot coerce \"abc\" to Float64 for column 'price'"
        );
    }

    #[test]
    fn test_is_row_error() {
        assert!(Error::SchemaMismatch {
            record_type: "subscription",
            index: 3,
            message: "missing field `id`".to_string(),
        }
        .is_row_error());

        assert!(!Error::FieldProjection {
            record_type: "order",
            index: 0,
            path: "customer.id".to_string(),
        }
        .is_row_error());
        assert!(!Error::decode("bad json").is_row_error());
        assert!(!Error::http_status(500, "").is_row_error());
        assert!(!Error::MissingColumn {
            record_type: "subscription",
            column: "sku_override".to_string(),
        }
        .is_row_error());
    }
}
