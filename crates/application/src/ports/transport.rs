//! Transport port

use std::future::Future;
use std::time::Duration;

use covenant_domain::{RequestDescriptor, Response};
use thiserror::Error;

/// Port for issuing HTTP requests.
///
/// This trait abstracts the HTTP stack so the executor and sequencer stay
/// independent of a specific client library.
pub trait Transport: Send + Sync {
    /// Sends the request and returns the captured response.
    ///
    /// Implementations append the descriptor's query parameters to its URL,
    /// send its headers and body, and give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no response could be obtained.
    fn send(
        &self,
        request: &RequestDescriptor,
        timeout: Duration,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send;
}

/// Transport-level failures. Never retried by the harness.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The URL could not be parsed or has an unsupported scheme.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// No response arrived in time.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that expired.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("DNS lookup failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Any other connection failure.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Anything else reported by the HTTP stack.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Builds a timeout error from a duration.
    #[must_use]
    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}
