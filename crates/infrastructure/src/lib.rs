//! Covenant Infrastructure - Adapters and process plumbing
//!
//! This crate provides the reqwest-backed implementation of the
//! `Transport` port, configuration loading, and tracing setup.

pub mod adapters;
pub mod config;
pub mod logging;

pub use adapters::ReqwestTransport;
pub use self::config::{ConfigError, HarnessConfig};
pub use logging::{LoggingError, env_filter, init_tracing};
