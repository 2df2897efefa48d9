//! Covenant Application - Spec execution and scenario sequencing
//!
//! This crate defines the application layer with:
//! - The transport port (interface to the HTTP stack)
//! - The spec executor (one request, one expectation set, one timeout)
//! - The scenario sequencer (ordered, state-threading steps)
//! - The process-wide default timeout

pub mod error;
pub mod execute_spec;
pub mod ports;
pub mod scenario;
pub mod settings;

pub use error::{ExecuteResult, ExecutionError, SequenceAbort, StepError};
pub use execute_spec::SpecExecutor;
pub use ports::{Transport, TransportError};
pub use scenario::{Scenario, ScenarioReport, ScenarioStep, StepRecord};
pub use settings::{SettingsError, default_timeout, set_default_timeout};
