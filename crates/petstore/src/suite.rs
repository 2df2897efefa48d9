//! Concurrent suite runner.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};

use covenant_application::{Scenario, ScenarioReport, SequenceAbort, SpecExecutor, Transport};
use tokio::task::JoinSet;
use tracing::{error, info};

/// Outcome of a suite run.
#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    /// Scenarios that completed, sorted by name.
    pub passed: Vec<ScenarioReport>,
    /// Scenarios that aborted, sorted by name.
    pub failed: Vec<SequenceAbort>,
    /// Names of scenarios whose task panicked, sorted.
    pub panicked: Vec<String>,
    /// Wall-clock time of the whole suite.
    pub duration: Duration,
}

impl SuiteReport {
    /// Returns true when every scenario completed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.panicked.is_empty()
    }

    /// Number of scenarios that were run.
    #[must_use]
    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len() + self.panicked.len()
    }

    /// Human-readable summary, one line per scenario plus a totals line.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for report in &self.passed {
            let _ = writeln!(
                out,
                "PASS {} ({} step(s), {}ms)",
                report.name,
                report.steps.len(),
                report.duration.as_millis()
            );
        }
        for abort in &self.failed {
            let _ = writeln!(out, "FAIL {abort}");
        }
        for name in &self.panicked {
            let _ = writeln!(out, "PANIC {name}");
        }
        let _ = write!(
            out,
            "{} passed, {} failed, {} panicked in {}ms",
            self.passed.len(),
            self.failed.len(),
            self.panicked.len(),
            self.duration.as_millis()
        );
        out
    }
}

/// Runs independent scenarios concurrently and collects their outcomes.
///
/// Each scenario runs in its own task with its own state; only the
/// (immutable) executor is shared. Steps inside a scenario stay sequential.
pub async fn run_suite<T>(executor: Arc<SpecExecutor<T>>, scenarios: Vec<Scenario>) -> SuiteReport
where
    T: Transport + 'static,
{
    let started = Instant::now();
    let mut tasks = JoinSet::new();
    let mut names = HashMap::with_capacity(scenarios.len());

    for scenario in scenarios {
        let executor = Arc::clone(&executor);
        let name = scenario.name().to_string();
        let handle = tasks.spawn(async move { scenario.run(&executor).await });
        names.insert(handle.id(), name);
    }

    let mut report = SuiteReport::default();
    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((_, Ok(passed))) => report.passed.push(passed),
            Ok((_, Err(abort))) => report.failed.push(abort),
            Err(e) => {
                let name = names.remove(&e.id()).unwrap_or_default();
                error!(scenario = %name, error = %e, "scenario task panicked");
                report.panicked.push(name);
            }
        }
    }

    report.passed.sort_by(|a, b| a.name.cmp(&b.name));
    report.failed.sort_by(|a, b| a.scenario.cmp(&b.scenario));
    report.panicked.sort();
    report.duration = started.elapsed();

    info!(
        passed = report.passed.len(),
        failed = report.failed.len(),
        panicked = report.panicked.len(),
        elapsed_ms = %report.duration.as_millis(),
        "suite finished"
    );
    report
}
