//! Process-wide default timeout.
//!
//! The default is set at most once per run, before any scenario starts.
//! Executors without their own override resolve it on every request, so one
//! built before the default was set still picks it up. A per-request or
//! per-call timeout always takes precedence.

use std::sync::OnceLock;
use std::time::Duration;

use thiserror::Error;

/// Timeout used when [`set_default_timeout`] was never called.
pub const FALLBACK_TIMEOUT: Duration = Duration::from_millis(3000);

static DEFAULT_TIMEOUT: OnceLock<Duration> = OnceLock::new();

/// Errors raised when configuring the default timeout.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// The default was already initialised for this run.
    #[error("default timeout already set to {current_ms}ms")]
    AlreadySet {
        /// The value currently in effect.
        current_ms: u128,
    },

    /// A zero timeout would fail every request.
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

/// Sets the process-wide default timeout.
///
/// # Errors
///
/// Returns [`SettingsError::ZeroTimeout`] for a zero duration and
/// [`SettingsError::AlreadySet`] if a default was already set.
pub fn set_default_timeout(timeout: Duration) -> Result<(), SettingsError> {
    if timeout.is_zero() {
        return Err(SettingsError::ZeroTimeout);
    }
    DEFAULT_TIMEOUT.set(timeout).map_err(|_| SettingsError::AlreadySet {
        current_ms: default_timeout().as_millis(),
    })?;
    tracing::debug!(timeout_ms = %timeout.as_millis(), "default timeout set");
    Ok(())
}

/// Returns the process-wide default timeout.
#[must_use]
pub fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT.get().copied().unwrap_or(FALLBACK_TIMEOUT)
}
