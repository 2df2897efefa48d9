//! Per-run scenario state and the scenario status machine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// Values threaded between the steps of one scenario run.
///
/// Created empty when a run starts and dropped when it ends; never shared
/// across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioState {
    values: HashMap<String, Value>,
}

impl ScenarioState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Returns the value for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingStateKey`] if no step stored it.
    pub fn require(&self, key: &str) -> DomainResult<&Value> {
        self.get(key)
            .ok_or_else(|| DomainError::MissingStateKey(key.to_string()))
    }

    /// Returns the value for `key` as an integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or not an integer.
    pub fn require_i64(&self, key: &str) -> DomainResult<i64> {
        self.require(key)?
            .as_i64()
            .ok_or_else(|| DomainError::StateTypeMismatch {
                key: key.to_string(),
                expected: "an integer",
            })
    }

    /// Returns the value for `key` as a string slice.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or not a string.
    pub fn require_str(&self, key: &str) -> DomainResult<&str> {
        self.require(key)?
            .as_str()
            .ok_or_else(|| DomainError::StateTypeMismatch {
                key: key.to_string(),
                expected: "a string",
            })
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Lifecycle of one scenario run.
///
/// `Pending -> Running(step) -> Completed | Failed(step, error)`; the two
/// last states are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// Not started yet.
    #[default]
    Pending,
    /// Executing the step at this index.
    Running {
        /// Index of the current step.
        step: usize,
    },
    /// Every step passed.
    Completed,
    /// The step at this index failed; later steps were not issued.
    Failed {
        /// Index of the failing step.
        step: usize,
        /// Rendering of the failure.
        error: String,
    },
}

impl ScenarioStatus {
    /// Moves to `Running(step)`.
    ///
    /// Returns `None` if the transition is not allowed: from `Pending` only
    /// step 0 may start, and from `Running(n)` only step `n + 1`.
    #[must_use]
    pub const fn start_step(&self, step: usize) -> Option<Self> {
        match self {
            Self::Pending if step == 0 => Some(Self::Running { step }),
            Self::Running { step: current } if step == *current + 1 => Some(Self::Running { step }),
            _ => None,
        }
    }

    /// Moves to `Completed`; allowed from `Pending` (no steps) or `Running`.
    #[must_use]
    pub const fn complete(&self) -> Option<Self> {
        match self {
            Self::Pending | Self::Running { .. } => Some(Self::Completed),
            _ => None,
        }
    }

    /// Moves to `Failed` at the current step; only allowed from `Running`.
    #[must_use]
    pub fn fail(&self, error: impl Into<String>) -> Option<Self> {
        match self {
            Self::Running { step } => Some(Self::Failed {
                step: *step,
                error: error.into(),
            }),
            _ => None,
        }
    }

    /// Returns true for `Completed` and `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }

    /// Returns true if the run completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}
