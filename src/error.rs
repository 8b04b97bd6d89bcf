//! Error types for cat-facts
//!
//! Two error kinds reach the user:
//! - [`ValidationError`] - the requested count is not an integer in `[1, 10]`
//! - [`FetchError`] - at least one request of a batch failed
//!
//! Both render as a single fixed message. The underlying cause of a fetch
//! failure is kept on the value so it can be logged, but it never reaches the
//! display text.

use thiserror::Error;

/// Result type alias for cat-facts operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when the requested count fails validation
pub const VALIDATION_MESSAGE: &str = "Please enter a number between 1 and 10";

/// Message shown when a batch of requests fails
pub const FETCH_FAILED_MESSAGE: &str = "😿 Oops! Could not fetch cat facts. Please try again.";

/// Main error type for cat-facts
#[derive(Debug, Error)]
pub enum Error {
    /// Requested count rejected before any request was issued
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A batch of fact requests failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "http.endpoint")
        key: Option<String>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Network error outside of a fact batch (e.g. building the HTTP client)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl Error {
    /// Text suitable for showing to the user
    ///
    /// Validation and fetch failures map to their fixed messages, everything
    /// else falls back to the `Display` output.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(e) => e.user_message().to_string(),
            Error::Fetch(e) => e.user_message().to_string(),
            other => other.to_string(),
        }
    }
}

/// The requested count is not an integer in the accepted range
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", VALIDATION_MESSAGE)]
pub struct ValidationError {
    /// The raw input that was rejected
    pub input: String,
}

impl ValidationError {
    /// Create a validation error for the given raw input
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// The uniform user-facing message
    pub fn user_message(&self) -> &'static str {
        VALIDATION_MESSAGE
    }
}

/// Why a single fact request failed
#[derive(Debug, Error)]
pub enum FetchCause {
    /// The transport failed (connection refused, DNS, timeout, ...)
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP status {status}")]
    Status {
        /// Status code returned by the endpoint
        status: u16,
    },

    /// The body was not JSON with a string `fact` field
    #[error("malformed response body: {0}")]
    Decode(String),

    /// The batch was superseded by a newer one before it finished
    #[error("batch cancelled")]
    Cancelled,
}

/// A batch of fact requests failed as a whole
///
/// Only the first observed failure is kept. Which request failed is recorded
/// for logging and is not part of the user-facing message.
#[derive(Debug, Error)]
#[error("{}", FETCH_FAILED_MESSAGE)]
pub struct FetchError {
    /// Zero-based issue index of the failing request, when known
    pub slot: Option<usize>,
    /// Underlying cause of the failure
    #[source]
    pub cause: FetchCause,
}

impl FetchError {
    /// Create a fetch error for the request issued at `slot`
    pub fn at(slot: usize, cause: FetchCause) -> Self {
        Self {
            slot: Some(slot),
            cause,
        }
    }

    /// Create a fetch error not tied to a specific request
    pub fn batch(cause: FetchCause) -> Self {
        Self { slot: None, cause }
    }

    /// The uniform user-facing message
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }

    /// Returns true if the batch was cancelled rather than failed
    pub fn is_cancelled(&self) -> bool {
        matches!(self.cause, FetchCause::Cancelled)
    }
}
