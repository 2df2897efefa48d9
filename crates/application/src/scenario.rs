//! Scenario sequencer.
//!
//! A scenario is an ordered list of dependent steps. Each step builds its
//! request from the state left by earlier steps, executes it, and may
//! capture values from the response for later steps. Steps never overlap:
//! step `n + 1` is not built until step `n` has resolved, and the first
//! failure stops the run.

use std::time::{Duration, Instant};

use covenant_domain::{
    DomainResult, ExpectationSet, HttpMethod, RequestBuilder, RequestDescriptor, Response,
    ScenarioState, ScenarioStatus,
};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::error::{SequenceAbort, StepError};
use crate::execute_spec::SpecExecutor;
use crate::ports::Transport;

type BuildFn = Box<dyn FnOnce(&ScenarioState) -> DomainResult<RequestDescriptor> + Send>;
type CaptureFn = Box<dyn FnOnce(&Response, &mut ScenarioState) -> Result<(), String> + Send>;

/// One request/expectation step of a scenario.
pub struct ScenarioStep {
    name: String,
    build: BuildFn,
    expectations: ExpectationSet,
    capture: Option<CaptureFn>,
}

impl ScenarioStep {
    /// Creates a step whose request is built from the scenario state.
    pub fn new<F>(name: impl Into<String>, build: F, expectations: ExpectationSet) -> Self
    where
        F: FnOnce(&ScenarioState) -> DomainResult<RequestDescriptor> + Send + 'static,
    {
        Self {
            name: name.into(),
            build: Box::new(build),
            expectations,
            capture: None,
        }
    }

    /// Creates a step with a request that does not depend on earlier steps.
    pub fn request(
        name: impl Into<String>,
        request: RequestBuilder,
        expectations: ExpectationSet,
    ) -> Self {
        Self::new(name, move |_| request.build(), expectations)
    }

    /// Runs `capture` on the response once the step has passed.
    #[must_use]
    pub fn capture<F>(mut self, capture: F) -> Self
    where
        F: FnOnce(&Response, &mut ScenarioState) -> Result<(), String> + Send + 'static,
    {
        self.capture = Some(Box::new(capture));
        self
    }

    /// Stores the body value at JSON `pointer` (e.g. `/id`) under `key`.
    #[must_use]
    pub fn capture_json(self, key: impl Into<String>, pointer: impl Into<String>) -> Self {
        let key = key.into();
        let pointer = pointer.into();
        self.capture(move |response, state| {
            let value = response
                .json_body()
                .and_then(|body| body.pointer(&pointer))
                .cloned()
                .ok_or_else(|| format!("response body has no value at '{pointer}'"))?;
            state.insert(key, value);
            Ok(())
        })
    }

    /// Step name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    async fn execute<T: Transport>(
        self,
        state: &mut ScenarioState,
        executor: &SpecExecutor<T>,
    ) -> Result<StepRecord, StepError> {
        let request = (self.build)(state)?;
        let response = executor.execute(&request, &self.expectations).await?;

        if let Some(capture) = self.capture {
            capture(&response, state).map_err(StepError::Capture)?;
        }

        Ok(StepRecord {
            name: self.name,
            method: request.method(),
            url: request
                .full_url()
                .map_or_else(|_| request.url().to_string(), String::from),
            status: response.status,
            duration: response.duration,
        })
    }
}

/// What a completed step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Step name.
    pub name: String,
    /// Method of the issued request.
    pub method: HttpMethod,
    /// URL of the issued request, query included.
    pub url: String,
    /// Status code received.
    pub status: u16,
    /// Transport-reported elapsed time.
    pub duration: Duration,
}

/// Outcome of a scenario that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    /// Identifier of this run, also attached to its log span.
    pub run_id: Uuid,
    /// Scenario name.
    pub name: String,
    /// Terminal status (always `Completed` in a returned report).
    pub status: ScenarioStatus,
    /// One record per step, in execution order.
    pub steps: Vec<StepRecord>,
    /// Wall-clock time of the whole run.
    pub duration: Duration,
}

/// An ordered sequence of dependent steps.
pub struct Scenario {
    name: String,
    steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Creates an empty scenario.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Appends a step (builder pattern).
    #[must_use]
    pub fn step(mut self, step: ScenarioStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the scenario has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs every step in order with fresh state.
    ///
    /// The scenario is consumed; its state is dropped when the run ends.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceAbort`] for the first step that fails to build,
    /// execute, match, or capture. Later steps are never issued.
    pub async fn run<T: Transport>(
        self,
        executor: &SpecExecutor<T>,
    ) -> Result<ScenarioReport, SequenceAbort> {
        let run_id = Uuid::now_v7();
        let span = info_span!("scenario", name = %self.name, %run_id);
        self.run_steps(run_id, executor).instrument(span).await
    }

    async fn run_steps<T: Transport>(
        self,
        run_id: Uuid,
        executor: &SpecExecutor<T>,
    ) -> Result<ScenarioReport, SequenceAbort> {
        let Self { name, steps } = self;
        let total = steps.len();
        let started = Instant::now();
        let mut state = ScenarioState::new();
        let mut status = ScenarioStatus::Pending;
        let mut records = Vec::with_capacity(total);

        for (index, step) in steps.into_iter().enumerate() {
            let next = status.start_step(index);
            advance(&mut status, next);
            let step_name = step.name.clone();

            match step.execute(&mut state, executor).await {
                Ok(record) => {
                    info!(step = index, name = %record.name, status = record.status, "step passed");
                    records.push(record);
                }
                Err(source) => {
                    let next = status.fail(source.to_string());
                    advance(&mut status, next);
                    let abort = SequenceAbort {
                        scenario: name,
                        step_index: index,
                        step_name,
                        skipped: total - index - 1,
                        source,
                    };
                    debug_assert_eq!(status, abort.status());
                    warn!(?status, "scenario aborted: {abort}");
                    return Err(abort);
                }
            }
        }

        let next = status.complete();
        advance(&mut status, next);
        info!(steps = total, "scenario completed");

        Ok(ScenarioReport {
            run_id,
            name,
            status,
            steps: records,
            duration: started.elapsed(),
        })
    }
}

/// Applies a status transition computed by [`ScenarioStatus`].
///
/// Steps are started strictly by index, so a rejected transition is a
/// sequencing bug: debug builds panic, release builds log it and keep the
/// current status.
fn advance(status: &mut ScenarioStatus, next: Option<ScenarioStatus>) {
    debug_assert!(next.is_some(), "illegal transition from {status:?}");
    match next {
        Some(next) => {
            debug!(from = ?status, to = ?next, "scenario status");
            *status = next;
        }
        None => warn!(from = ?status, "illegal scenario status transition"),
    }
}
