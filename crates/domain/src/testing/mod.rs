//! Response expectations and matching.
//!
//! This module provides the declarative expectation types and the pure
//! matcher that evaluates them against HTTP responses.

mod expectation;
pub mod json;
mod matcher;

pub use expectation::{Expectation, ExpectationSet, PredicateFn, StatusExpectation};
pub use matcher::{MismatchError, ResponseMatcher};
