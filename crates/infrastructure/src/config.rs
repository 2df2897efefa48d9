//! Harness configuration.
//!
//! Values are layered: built-in defaults, then an optional `covenant.*`
//! file in the working directory, then `COVENANT_*` environment variables.

use std::time::Duration;

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Base name of the optional configuration file (`covenant.toml`, ...).
pub const CONFIG_FILE: &str = "covenant";

/// Prefix of the environment variables read by [`HarnessConfig::load`].
pub const ENV_PREFIX: &str = "COVENANT";

/// Service under test when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://petstore.swagger.io/v2";

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Default tracing filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// The base URL is not an absolute http(s) URL.
    #[error("invalid base_url '{url}': {reason}")]
    InvalidBaseUrl {
        /// The configured value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A zero timeout would fail every request.
    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,
}

/// Runtime settings of a harness run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HarnessConfig {
    /// Base URL of the service under test, without a trailing slash.
    pub base_url: String,
    /// Default timeout applied to requests that carry none.
    pub timeout_ms: u64,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl HarnessConfig {
    /// Loads the configuration from the working directory and environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source is malformed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(CONFIG_FILE).required(false))
                .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true)),
        )
    }

    /// Applies defaults underneath `builder`'s sources, then validates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source is malformed or a value is invalid.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let mut config: Self = builder
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("timeout_ms", DEFAULT_TIMEOUT_MS)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .build()?
            .try_deserialize()?;

        config.base_url = config.base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    /// The default request timeout as a duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };
        let url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https".to_string()));
        }

        Ok(())
    }
}
