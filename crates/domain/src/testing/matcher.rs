//! Response matcher.
//!
//! Evaluates an [`ExpectationSet`] against a [`Response`]. Matching is a pure
//! function of its inputs; the first failing expectation is reported.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use super::expectation::{Expectation, ExpectationSet, StatusExpectation};
use super::json::{self, JsonDiff};
use crate::response::Response;

/// A response failed one of its expectations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("expectation #{index} ({expectation}) failed: {detail}")]
pub struct MismatchError {
    /// Position of the failing expectation in its set.
    pub index: usize,
    /// Description of the failing expectation.
    pub expectation: String,
    /// What went wrong.
    pub detail: String,
    /// Rendering of the expected value, when meaningful.
    pub expected: Option<String>,
    /// Rendering of the actual value, when meaningful.
    pub actual: Option<String>,
}

#[derive(Debug)]
struct Failure {
    detail: String,
    expected: Option<String>,
    actual: Option<String>,
}

impl Failure {
    fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            expected: None,
            actual: None,
        }
    }

    fn with_values(detail: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            expected: Some(expected.into()),
            actual: Some(actual.into()),
        }
    }

    fn from_diff(diff: JsonDiff) -> Self {
        Self {
            detail: format!("{} at {}", diff.reason, diff.path),
            expected: Some(diff.expected),
            actual: diff.actual,
        }
    }

    fn into_mismatch(self, index: usize, expectation: &Expectation) -> MismatchError {
        MismatchError {
            index,
            expectation: expectation.description(),
            detail: self.detail,
            expected: self.expected,
            actual: self.actual,
        }
    }
}

/// Matches responses against expectations.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseMatcher;

impl ResponseMatcher {
    /// Create a new matcher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Check every expectation in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the [`MismatchError`] of the first expectation that fails.
    pub fn check(&self, response: &Response, expectations: &ExpectationSet) -> Result<(), MismatchError> {
        for (index, expectation) in expectations.iter().enumerate() {
            self.check_expectation(response, expectation)
                .map_err(|failure| failure.into_mismatch(index, expectation))?;
        }
        Ok(())
    }

    /// Check a single expectation.
    ///
    /// # Errors
    ///
    /// Returns a [`MismatchError`] with index 0 if the expectation fails.
    pub fn check_one(&self, response: &Response, expectation: &Expectation) -> Result<(), MismatchError> {
        self.check_expectation(response, expectation)
            .map_err(|failure| failure.into_mismatch(0, expectation))
    }

    fn check_expectation(&self, response: &Response, expectation: &Expectation) -> Result<(), Failure> {
        match expectation {
            Expectation::Status(expected) => self.check_status(response, expected),
            Expectation::JsonLike(template) => self.check_json_like(response, template),
            Expectation::Json(value) => self.check_json(response, value),
            Expectation::Header { name, value } => {
                self.check_header(response, name, value.as_deref())
            }
            Expectation::ResponseTime { max } => {
                if response.duration <= *max {
                    Ok(())
                } else {
                    Err(Failure::with_values(
                        format!(
                            "Response took {}ms, expected <= {}ms",
                            response.duration.as_millis(),
                            max.as_millis()
                        ),
                        format!("<= {}ms", max.as_millis()),
                        format!("{}ms", response.duration.as_millis()),
                    ))
                }
            }
            Expectation::Predicate { check, .. } => {
                panic::catch_unwind(AssertUnwindSafe(|| (check.as_ref())(response)))
                    .map_err(|payload| Failure::new(panic_message(payload.as_ref())))?
                    .map_err(Failure::new)
            }
        }
    }

    fn check_status(&self, response: &Response, expected: &StatusExpectation) -> Result<(), Failure> {
        let actual = response.status_code();
        if expected.matches(actual.as_u16()) {
            Ok(())
        } else {
            Err(Failure::with_values(
                format!("Expected status {}, got {actual}", expected.description()),
                expected.description(),
                actual.as_u16().to_string(),
            ))
        }
    }

    fn check_json_like(&self, response: &Response, template: &serde_json::Value) -> Result<(), Failure> {
        let body = self.json_body(response)?;
        json::contains(body, template).map_err(Failure::from_diff)
    }

    fn check_json(&self, response: &Response, expected: &serde_json::Value) -> Result<(), Failure> {
        let body = self.json_body(response)?;
        json::equals(body, expected).map_err(Failure::from_diff)
    }

    fn json_body<'a>(&self, response: &'a Response) -> Result<&'a serde_json::Value, Failure> {
        response.json_body().ok_or_else(|| Failure {
            detail: "Response body is not JSON".to_string(),
            expected: None,
            actual: Some(response.body.preview()),
        })
    }

    fn check_header(&self, response: &Response, name: &str, expected: Option<&str>) -> Result<(), Failure> {
        match (response.header(name), expected) {
            (None, _) => Err(Failure::new(format!("Header '{name}' not found"))),
            (Some(actual), Some(expected)) if actual != expected => Err(Failure::with_values(
                format!("Header '{name}' value mismatch: expected '{expected}', got '{actual}'"),
                expected,
                actual,
            )),
            (Some(_), _) => Ok(()),
        }
    }
}

/// Text of a panic raised inside a predicate, as passed to `panic!`.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "predicate panicked".to_string())
}
