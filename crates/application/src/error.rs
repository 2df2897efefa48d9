//! Application error types

use covenant_domain::{DomainError, MismatchError, Response, ScenarioStatus};
use thiserror::Error;

use crate::ports::TransportError;

/// Result type for one spec execution.
pub type ExecuteResult = Result<Response, ExecutionError>;

/// Failure of a single request/expectation step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionError {
    /// No usable response was received.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A response was received but failed an expectation.
    #[error("{0}")]
    Mismatch(#[from] MismatchError),
}

impl ExecutionError {
    /// Returns true for transport-level failures.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns the mismatch details, if this is a mismatch.
    #[must_use]
    pub const fn as_mismatch(&self) -> Option<&MismatchError> {
        match self {
            Self::Mismatch(mismatch) => Some(mismatch),
            Self::Transport(_) => None,
        }
    }
}

/// Why a scenario step failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StepError {
    /// The step's request could not be built from the scenario state.
    #[error("could not build request: {0}")]
    Build(#[from] DomainError),

    /// The request failed or its response did not match.
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// A value could not be captured from a passing response.
    #[error("could not capture value: {0}")]
    Capture(String),
}

/// A scenario stopped at its first failing step.
///
/// Later steps were never built or issued; nothing is rolled back.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("scenario '{scenario}' aborted at step {step_index} ({step_name}), {skipped} step(s) skipped: {source}")]
pub struct SequenceAbort {
    /// Scenario name.
    pub scenario: String,
    /// Index of the failing step.
    pub step_index: usize,
    /// Name of the failing step.
    pub step_name: String,
    /// Number of steps that were not issued.
    pub skipped: usize,
    /// The underlying failure.
    #[source]
    pub source: StepError,
}

impl SequenceAbort {
    /// Terminal status of the aborted run.
    #[must_use]
    pub fn status(&self) -> ScenarioStatus {
        ScenarioStatus::Failed {
            step: self.step_index,
            error: self.source.to_string(),
        }
    }
}
