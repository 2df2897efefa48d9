//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while building requests or
/// threading scenario state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The request was built without an HTTP method.
    #[error("request method is required")]
    MissingMethod,

    /// The request was built without a URL.
    #[error("request URL is required")]
    MissingUrl,

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request body could not be serialized.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// A scenario step asked for a value no earlier step produced.
    #[error("scenario state has no value for '{0}'")]
    MissingStateKey(String),

    /// A scenario state value has an unexpected JSON type.
    #[error("scenario state value for '{key}' is not {expected}")]
    StateTypeMismatch {
        /// The state key.
        key: String,
        /// Human-readable name of the expected type.
        expected: &'static str,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
