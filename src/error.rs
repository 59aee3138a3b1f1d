//! Error types for the floodgate client.

use thiserror::Error;

use crate::region::Location;

/// Main error type for floodgate operations.
///
/// Capacity waits and server-forced backoff are absorbed inside the throttle
/// core and never appear here; every variant corresponds to a genuine
/// transport problem or a configuration mistake.
#[derive(Error, Debug)]
pub enum FloodgateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A caller-supplied argument was rejected before any request was made
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The transport failed to carry out a request
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The service answered with a non-success status other than 429
    #[error("Request to {url} failed with status {status}")]
    Http {
        /// HTTP status code of the failed request
        status: u16,
        /// URL that was requested
        url: String,
        /// Raw response body, kept for diagnosis
        body: String,
    },

    /// The service rejected a call for rate limiting without a usable retry hint
    #[error("Rate-limited response carried no usable retry-after hint: {0}")]
    RetryHint(String),

    /// A region identifier could not be parsed
    #[error("Unknown region identifier {0:?}")]
    UnknownRegion(String),

    /// No limiter is registered for the location
    #[error("No rate limiter registered for location {0}")]
    UnknownLocation(Location),

    /// The caller-supplied deadline elapsed while waiting for capacity
    #[error("Deadline elapsed before the request could be admitted")]
    DeadlineExceeded,

    /// The configured cap on server-forced retries was reached
    #[error("Gave up after {retries} server-forced retries")]
    RetriesExhausted {
        /// Number of 429-forced attempts made before giving up
        retries: u32,
    },

    /// Response body decoding errors
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for floodgate operations.
pub type Result<T> = std::result::Result<T, FloodgateError>;

/// Failure raised by a [`Transport`](crate::transport::Transport) implementation.
///
/// Kept separate from [`FloodgateError`] so transport implementations do not
/// depend on the rest of the error surface. The original cause stays
/// reachable through [`std::error::Error::source`].
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    /// Create a transport error from a bare message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
