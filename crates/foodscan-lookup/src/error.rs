//! # Fetch Error Types
//!
//! What the fetch capability reports when no response body could be
//! obtained. The pipeline folds every one of these into
//! `LookupOutcome::TransportError`, keeping the message as its reason.

use thiserror::Error;

/// Transport failure while fetching a product.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No route to the server (offline, DNS failure, connection refused).
    #[error("No internet connection: {0}")]
    NotConnected(String),

    /// The request did not complete in time.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with an error status and no usable body.
    #[error("Server returned HTTP {status}")]
    Status { status: u16 },

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// Client-side failure (TLS setup, invalid request, redirect loop).
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl FetchError {
    /// Returns true if the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::NotConnected(_) | FetchError::Timeout | FetchError::Body(_) => true,
            FetchError::Status { status } => *status >= 500 || *status == 429,
            FetchError::Client(_) => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::NotConnected(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
            }
        } else if err.is_body() || err.is_decode() {
            FetchError::Body(err.to_string())
        } else {
            FetchError::Client(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(FetchError::NotConnected("offline".into()).is_retryable());
        assert!(FetchError::Timeout.is_retryable());
        assert!(FetchError::Status { status: 503 }.is_retryable());
        assert!(FetchError::Status { status: 429 }.is_retryable());
        assert!(!FetchError::Status { status: 403 }.is_retryable());
        assert!(!FetchError::Client("bad TLS config".into()).is_retryable());
    }

    #[test]
    fn test_messages_keep_description() {
        let err = FetchError::NotConnected("connection refused".into());
        assert_eq!(err.to_string(), "No internet connection: connection refused");
        assert_eq!(
            FetchError::Status { status: 502 }.to_string(),
            "Server returned HTTP 502"
        );
    }
}
