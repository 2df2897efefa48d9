//! Tracing subscriber setup.

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The fallback filter directive could not be parsed.
    #[error("invalid log filter '{filter}': {message}")]
    InvalidFilter {
        /// The rejected directive.
        filter: String,
        /// Parser message.
        message: String,
    },

    /// A global subscriber is already installed.
    #[error("tracing already initialised: {0}")]
    AlreadyInitialised(String),
}

/// Builds the filter: `RUST_LOG` when set and valid, `fallback` otherwise.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] if `fallback` is needed and invalid.
pub fn env_filter(fallback: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(fallback).map_err(|e| LoggingError::InvalidFilter {
            filter: fallback.to_string(),
            message: e.to_string(),
        })
    })
}

/// Installs the fmt layer with [`env_filter`] as the global subscriber.
///
/// # Errors
///
/// Returns [`LoggingError`] if the filter is invalid or a subscriber is
/// already installed.
pub fn init_tracing(fallback: &str) -> Result<(), LoggingError> {
    tracing_subscriber::registry()
        .with(env_filter(fallback)?)
        .with(fmt::layer())
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialised(e.to_string()))
}
