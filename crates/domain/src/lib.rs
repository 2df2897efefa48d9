//! Covenant Domain - Core contract-testing types
//!
//! This crate defines the request, response and expectation model of the
//! Covenant harness together with the pure response matcher.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod request;
pub mod response;
pub mod scenario;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use request::{HttpMethod, RequestBody, RequestBuilder, RequestDescriptor};
pub use response::{Response, ResponseBody, StatusCode};
pub use scenario::{ScenarioState, ScenarioStatus};
pub use testing::{Expectation, ExpectationSet, MismatchError, ResponseMatcher, StatusExpectation};
