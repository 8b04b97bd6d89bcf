//! Configuration types
//!
//! Everything has a sensible default, so `Config::default()` talks to the
//! public cat fact API with the transport's default timeout and the
//! last-resolved overlap policy.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Public endpoint returning `{ "fact": string, "length": number }`
pub const DEFAULT_ENDPOINT: &str = "https://catfact.ninja/fact";

/// Main configuration for cat-facts
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP settings for the fact endpoint
    #[serde(default)]
    pub http: HttpConfig,

    /// How overlapping fetches are resolved
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

/// HTTP client configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// URL fetched once per requested fact (default: catfact.ninja)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds (default: none, transport default applies)
    #[serde(
        default,
        with = "optional_duration_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,

    /// User-Agent header sent with each request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Resolution of overlapping fetch invocations
///
/// A new fetch may be triggered while an older batch is still in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Every batch is applied when it resolves, so the batch that resolves
    /// last wins even if it was issued first (default)
    #[default]
    LastResolved,
    /// Only the most recently issued batch may be applied; older batches are
    /// cancelled and their results ignored
    LatestIssued,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config file '{}': {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.http.endpoint).map_err(|e| Error::Config {
            message: format!("invalid endpoint '{}': {}", self.http.endpoint, e),
            key: Some("http.endpoint".to_string()),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config {
                message: format!("endpoint scheme must be http or https, got '{}'", url.scheme()),
                key: Some("http.endpoint".to_string()),
            });
        }

        if self.http.timeout == Some(Duration::ZERO) {
            return Err(Error::Config {
                message: "timeout must be at least one second".to_string(),
                key: Some("http.timeout".to_string()),
            });
        }

        Ok(())
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_user_agent() -> String {
    format!("cat-facts/{}", env!("CARGO_PKG_VERSION"))
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
