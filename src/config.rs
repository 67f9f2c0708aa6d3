//! Connector configuration
//!
//! Settings are layered: defaults, then an optional YAML file, then
//! environment variables (the process environment first, then a `.env` file
//! in the working directory). The result is validated before any request is
//! made.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, PacingPolicy};
use crate::types::{Environment, RowErrorPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://api.rechargeapps.com";

/// API version sent in `X-Recharge-Version`
pub const DEFAULT_API_VERSION: &str = "2021-11";

/// Environment variable selecting the store
pub const ENVIRONMENT_VAR: &str = "RECHARGE_ENVIRONMENT";

/// Environment variable overriding the API host
pub const BASE_URL_VAR: &str = "RECHARGE_BASE_URL";

/// Dotenv file read by [`ConnectorConfig::load`]
pub const DOTENV_FILE: &str = ".env";

// ============================================================================
// Top-Level Connector Config
// ============================================================================

/// Complete connector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// API host, without a trailing resource path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API version header value
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Which store's token is used
    #[serde(default)]
    pub environment: Environment,

    /// Staging store access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_api_token: Option<String>,

    /// Production store access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prod_api_token: Option<String>,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Pause policy between pages
    #[serde(default)]
    pub pacing: PacingPolicy,

    /// What to do with records that fail to flatten
    #[serde(default)]
    pub row_errors: RowErrorPolicy,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            environment: Environment::default(),
            staging_api_token: None,
            prod_api_token: None,
            http: HttpSettings::default(),
            pacing: PacingPolicy::default(),
            row_errors: RowErrorPolicy::default(),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Custom user agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: None,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl ConnectorConfig {
    /// Config for one environment with its token set
    pub fn with_token(environment: Environment, token: impl Into<String>) -> Self {
        let token = Some(token.into());
        match environment {
            Environment::Production => Self {
                prod_api_token: token,
                ..Self::default()
            },
            Environment::Staging => Self {
                environment,
                staging_api_token: token,
                ..Self::default()
            },
        }
    }

    /// Override the API host
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the pacing policy
    #[must_use]
    pub fn with_pacing(mut self, pacing: PacingPolicy) -> Self {
        self.pacing = pacing;
        self
    }

    /// Override the row error policy
    #[must_use]
    pub fn with_row_errors(mut self, policy: RowErrorPolicy) -> Self {
        self.row_errors = policy;
        self
    }

    /// Parse a YAML document; missing keys take their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))
    }

    /// Read a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Defaults or `path`, overridden by the environment and `.env`, validated
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_dotenv(path, Path::new(DOTENV_FILE))
    }

    /// Like [`load`](Self::load) with an explicit dotenv file
    ///
    /// Process environment variables take precedence over the file.
    pub fn load_with_dotenv(path: Option<&Path>, dotenv: &Path) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let file_vars = dotenv_values(dotenv)?;
        config.apply_env_with(|key| std::env::var(key).ok().or_else(|| file_vars.get(key).cloned()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    ///
    /// Tokens are read from `prod_api_token` / `staging_api_token` in either
    /// case; lower case wins when both are set.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let either_case = |key: &str| {
            lookup(key)
                .or_else(|| lookup(&key.to_ascii_uppercase()))
                .filter(|v| !v.is_empty())
        };

        if let Some(token) = either_case("prod_api_token") {
            self.prod_api_token = Some(token);
        }
        if let Some(token) = either_case("staging_api_token") {
            self.staging_api_token = Some(token);
        }
        if let Some(env) = lookup(ENVIRONMENT_VAR).filter(|v| !v.is_empty()) {
            self.environment = env
                .parse()
                .map_err(|message| Error::invalid_value("environment", message))?;
        }
        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.is_empty()) {
            self.base_url = base_url;
        }
        Ok(())
    }

    /// Check the config is usable
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.api_version.trim().is_empty() {
            return Err(Error::invalid_value("api_version", "cannot be empty"));
        }

        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "http.timeout_secs",
                "must be greater than zero",
            ));
        }

        if let PacingPolicy::TokenBucket {
            requests_per_second,
            burst,
        } = &self.pacing
        {
            if *requests_per_second == 0 {
                return Err(Error::invalid_value(
                    "pacing.requests_per_second",
                    "must be greater than zero",
                ));
            }
            if *burst == 0 {
                return Err(Error::invalid_value("pacing.burst", "must be greater than zero"));
            }
        }

        self.api_token().map(|_| ())
    }

    /// Token of the selected environment
    pub fn api_token(&self) -> Result<&str> {
        let token = match self.environment {
            Environment::Production => self.prod_api_token.as_deref(),
            Environment::Staging => self.staging_api_token.as_deref(),
        };
        token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::missing_field(self.environment.token_field()))
    }

    /// HTTP client config with the selected token and API version
    pub fn http_client_config(&self) -> Result<HttpClientConfig> {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .recharge_auth(self.api_token()?, &self.api_version);
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent);
        }
        Ok(builder.build())
    }

    /// Copy with both tokens masked, for display
    pub fn redacted(&self) -> Self {
        let mask = |t: &Option<String>| t.as_ref().map(|_| "********".to_string());
        Self {
            staging_api_token: mask(&self.staging_api_token),
            prod_api_token: mask(&self.prod_api_token),
            ..self.clone()
        }
    }
}

/// Read the `KEY=value` pairs of a dotenv file; a missing file yields none
pub fn dotenv_values(path: &Path) -> Result<HashMap<String, String>> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => {
            return Err(Error::config(format!(
                "Failed to read dotenv file '{}': {e}",
                path.display()
            )))
        }
    };

    iter.map(|item| {
        item.map_err(|e| {
            Error::config(format!("Invalid dotenv file '{}': {e}", path.display()))
        })
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ACCESS_TOKEN_HEADER;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConnectorConfig::default();
        assert_eq!(config.base_url, "https://api.rechargeapps.com");
        assert_eq!(config.api_version, "2021-11");
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.pacing, PacingPolicy::FixedDelay { millis: 500 });
        assert_eq!(config.row_errors, RowErrorPolicy::Skip);
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
base_url: "http://localhost:9000"
environment: staging
staging_api_token: "stage-token"
http:
  timeout_secs: 5
  user_agent: "analytics/1.0"
pacing:
  type: token_bucket
  requests_per_second: 2
  burst: 1
row_errors: fail
"#;

        let config = ConnectorConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.user_agent.as_deref(), Some("analytics/1.0"));
        assert_eq!(config.pacing, PacingPolicy::token_bucket(2, 1));
        assert_eq!(config.row_errors, RowErrorPolicy::Fail);
        assert_eq!(config.api_token().unwrap(), "stage-token");
    }

    #[test]
    fn test_parse_empty_yaml_is_default() {
        assert_eq!(
            ConnectorConfig::from_yaml_str("\n").unwrap(),
            ConnectorConfig::default()
        );
    }

    #[test]
    fn test_parse_unknown_pacing_type() {
        let err = ConnectorConfig::from_yaml_str("pacing:\n  type: exponential\n").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prod_api_token: from-file\npacing:\n  type: unlimited").unwrap();

        let config = ConnectorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.prod_api_token.as_deref(), Some("from-file"));
        assert_eq!(config.pacing, PacingPolicy::Unlimited);
    }

    #[test]
    fn test_from_missing_file() {
        let err = ConnectorConfig::from_file("/nonexistent/recharge.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_dotenv_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "# local credentials\nSTAGING_API_TOKEN=stage-from-dotenv\nRECHARGE_ENVIRONMENT=\"staging\""
        )
        .unwrap();

        let vars = dotenv_values(file.path()).unwrap();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars["STAGING_API_TOKEN"], "stage-from-dotenv");
        assert_eq!(vars["RECHARGE_ENVIRONMENT"], "staging");
    }

    #[test]
    fn test_dotenv_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let vars = dotenv_values(&dir.path().join(".env")).unwrap();
        assert!(vars.is_empty());
    }

    #[test]
    fn test_load_with_dotenv_supplies_token() {
        let dir = tempfile::tempdir().unwrap();
        let dotenv = dir.path().join(".env");
        fs::write(&dotenv, "staging_api_token=stage-from-dotenv\n").unwrap();
        let yaml = dir.path().join("recharge.yaml");
        fs::write(&yaml, "environment: staging\npacing:\n  type: unlimited\n").unwrap();

        let config = ConnectorConfig::load_with_dotenv(Some(&yaml), &dotenv).unwrap();
        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.api_token().unwrap(), "stage-from-dotenv");
    }

    #[test]
    fn test_env_tokens_either_case() {
        let mut config = ConnectorConfig::default();
        config
            .apply_env_with(env(&[
                ("PROD_API_TOKEN", "upper-prod"),
                ("staging_api_token", "lower-stage"),
            ]))
            .unwrap();

        assert_eq!(config.prod_api_token.as_deref(), Some("upper-prod"));
        assert_eq!(config.staging_api_token.as_deref(), Some("lower-stage"));
    }

    #[test]
    fn test_env_lower_case_wins() {
        let mut config = ConnectorConfig::default();
        config
            .apply_env_with(env(&[
                ("prod_api_token", "lower"),
                ("PROD_API_TOKEN", "upper"),
            ]))
            .unwrap();
        assert_eq!(config.prod_api_token.as_deref(), Some("lower"));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = ConnectorConfig::from_yaml_str("prod_api_token: from-file").unwrap();
        config
            .apply_env_with(env(&[
                ("prod_api_token", "from-env"),
                ("RECHARGE_ENVIRONMENT", "staging"),
                ("RECHARGE_BASE_URL", "http://127.0.0.1:1234"),
            ]))
            .unwrap();

        assert_eq!(config.prod_api_token.as_deref(), Some("from-env"));
        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.base_url, "http://127.0.0.1:1234");
    }

    #[test]
    fn test_env_bad_environment() {
        let mut config = ConnectorConfig::default();
        let err = config
            .apply_env_with(env(&[("RECHARGE_ENVIRONMENT", "qa")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "environment"));
    }

    #[test]
    fn test_validate_requires_selected_token() {
        let mut config = ConnectorConfig::with_token(Environment::Production, "prod");
        assert!(config.validate().is_ok());

        config.environment = Environment::Staging;
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, Error::MissingConfigField { ref field } if field == "staging_api_token")
        );
    }

    #[test]
    fn test_validate_blank_token() {
        let config = ConnectorConfig::with_token(Environment::Production, "  ");
        assert!(matches!(
            config.validate(),
            Err(Error::MissingConfigField { .. })
        ));
    }

    #[test]
    fn test_validate_bad_base_url() {
        let config =
            ConnectorConfig::with_token(Environment::Production, "t").with_base_url("not a url");
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfigValue { ref field, .. }) if field == "base_url"
        ));

        let config = ConnectorConfig::with_token(Environment::Production, "t")
            .with_base_url("ftp://api.rechargeapps.com");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_rate() {
        let config = ConnectorConfig::with_token(Environment::Production, "t")
            .with_pacing(PacingPolicy::token_bucket(0, 1));
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfigValue { ref field, .. }) if field == "pacing.requests_per_second"
        ));
    }

    #[test]
    fn test_http_client_config_uses_selected_token() {
        let mut config = ConnectorConfig::with_token(Environment::Staging, "stage");
        config.prod_api_token = Some("prod".to_string());
        config.http.timeout_secs = 7;

        let http = config.http_client_config().unwrap();
        assert_eq!(http.timeout, Duration::from_secs(7));
        assert_eq!(
            http.default_headers.get(ACCESS_TOKEN_HEADER).map(String::as_str),
            Some("stage")
        );
    }

    #[test]
    fn test_redacted_masks_tokens() {
        let config = ConnectorConfig::with_token(Environment::Production, "secret");
        let shown = config.redacted();
        assert_eq!(shown.prod_api_token.as_deref(), Some("********"));
        assert_eq!(shown.staging_api_token, None);
        assert!(!serde_yaml::to_string(&shown).unwrap().contains("secret"));
    }
}
