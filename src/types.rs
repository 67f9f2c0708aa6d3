//! Common types used throughout the connector
//!
//! Shared type aliases and small enums used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Environment
// ============================================================================

/// Which Recharge store the connector talks to
///
/// Selects the access token wired into outgoing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Production store (`prod_api_token`)
    #[default]
    Production,
    /// Staging store (`staging_api_token`)
    Staging,
}

impl Environment {
    /// Name of the credential field for this environment
    pub fn token_field(self) -> &'static str {
        match self {
            Environment::Production => "prod_api_token",
            Environment::Staging => "staging_api_token",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "staging" | "stage" => Ok(Environment::Staging),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

// ============================================================================
// Row Error Policy
// ============================================================================

/// What the flatteners do with a record holding an out-of-type value
///
/// Only `SchemaMismatch` and `TypeCoercion` are recoverable; a missing
/// projected field or dropped column fails the flatten under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorPolicy {
    /// Log a warning, leave the record out and count it in the report
    #[default]
    Skip,
    /// Abort the flatten with the first row error
    Fail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_str() {
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!("Staging".parse::<Environment>().unwrap(), Environment::Staging);
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_token_field() {
        assert_eq!(Environment::default().token_field(), "prod_api_token");
        assert_eq!(Environment::Staging.token_field(), "staging_api_token");
    }

    #[test]
    fn test_row_error_policy_serde() {
        let policy: RowErrorPolicy = serde_json::from_str("\"fail\"").unwrap();
        assert_eq!(policy, RowErrorPolicy::Fail);
        assert_eq!(RowErrorPolicy::default(), RowErrorPolicy::Skip);
    }
}
