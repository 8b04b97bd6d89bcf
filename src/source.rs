//! Fact sources
//!
//! A [`FactSource`] is the fetch capability handed to the core: one call
//! yields one fact. [`HttpFactSource`] is the production implementation that
//! talks to the cat fact API; tests substitute scripted sources.

use crate::config::HttpConfig;
use crate::error::{FetchCause, FetchError, Result};
use crate::types::Fact;
use async_trait::async_trait;
use serde::Deserialize;

/// Something that can produce a single fact on demand
#[async_trait]
pub trait FactSource: Send + Sync {
    /// Fetch one fact
    ///
    /// `slot` is the zero-based issue index of this call within its batch.
    async fn fetch_fact(&self, slot: usize) -> std::result::Result<Fact, FetchError>;
}

/// Response body of the fact endpoint; extra fields such as `length` are ignored
#[derive(Debug, Deserialize)]
struct FactResponse {
    fact: String,
}

/// Fact source backed by an HTTP endpoint returning `{ "fact": string }`
#[derive(Clone, Debug)]
pub struct HttpFactSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpFactSource {
    /// Build a source from HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Build a source for the given endpoint with otherwise default settings
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        Self::new(&HttpConfig {
            endpoint: endpoint.into(),
            ..HttpConfig::default()
        })
    }
}

#[async_trait]
impl FactSource for HttpFactSource {
    async fn fetch_fact(&self, slot: usize) -> std::result::Result<Fact, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!(slot, error = %e, timeout = e.is_timeout(), "fact request failed");
                FetchError::at(slot, FetchCause::Transport(e))
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(slot, status = status.as_u16(), "fact endpoint returned error status");
            return Err(FetchError::at(
                slot,
                FetchCause::Status {
                    status: status.as_u16(),
                },
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::at(slot, FetchCause::Transport(e)))?;

        let parsed: FactResponse = serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!(slot, error = %e, "fact response did not decode");
            FetchError::at(slot, FetchCause::Decode(e.to_string()))
        })?;

        tracing::trace!(slot, length = parsed.fact.chars().count(), "fact received");
        Ok(Fact::new(parsed.fact))
    }
}
