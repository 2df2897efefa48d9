//! Expectation types.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::response::Response;

/// Caller-supplied check; an `Err` is reported verbatim as the mismatch detail.
pub type PredicateFn = dyn Fn(&Response) -> Result<(), String> + Send + Sync;

/// A single declarative rule a response must satisfy.
#[derive(Clone)]
pub enum Expectation {
    /// Check response status code.
    Status(StatusExpectation),
    /// Body must contain the template (partial JSON match).
    JsonLike(serde_json::Value),
    /// Body must equal the value exactly.
    Json(serde_json::Value),
    /// Header must exist, optionally with an exact value.
    Header {
        /// Header name (case-insensitive).
        name: String,
        /// Optional expected value.
        value: Option<String>,
    },
    /// Response must arrive within `max`.
    ResponseTime {
        /// Maximum allowed elapsed time.
        max: Duration,
    },
    /// Arbitrary caller logic.
    Predicate {
        /// Name used in failure messages.
        name: String,
        /// The check itself.
        check: Arc<PredicateFn>,
    },
}

impl Expectation {
    /// Creates a predicate expectation.
    pub fn predicate<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Response) -> Result<(), String> + Send + Sync + 'static,
    {
        Self::Predicate {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Get a human-readable description of this expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Status(expected) => format!("Status code {}", expected.description()),
            Self::JsonLike(template) => format!("JSON like {template}"),
            Self::Json(value) => format!("JSON equals {value}"),
            Self::Header {
                name,
                value: Some(v),
            } => format!("Header '{name}' equals '{v}'"),
            Self::Header { name, value: None } => format!("Header '{name}' exists"),
            Self::ResponseTime { max } => format!("Response time <= {}ms", max.as_millis()),
            Self::Predicate { name, .. } => format!("Predicate '{name}'"),
        }
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(expected) => f.debug_tuple("Status").field(expected).finish(),
            Self::JsonLike(template) => f.debug_tuple("JsonLike").field(template).finish(),
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Self::Header { name, value } => f
                .debug_struct("Header")
                .field("name", name)
                .field("value", value)
                .finish(),
            Self::ResponseTime { max } => {
                f.debug_struct("ResponseTime").field("max", max).finish()
            }
            Self::Predicate { name, .. } => f
                .debug_struct("Predicate")
                .field("name", name)
                .finish_non_exhaustive(),
        }
    }
}

/// Expected status code value, set, or range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusExpectation {
    /// Exactly this code.
    Exact(u16),
    /// Any code in the set. Used where the service legitimately answers
    /// more than one way.
    OneOf(Vec<u16>),
    /// Any code in `min..=max`.
    Range {
        /// Lowest accepted code.
        min: u16,
        /// Highest accepted code.
        max: u16,
    },
}

impl StatusExpectation {
    /// Returns true if `status` satisfies this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::OneOf(codes) => codes.contains(&status),
            Self::Range { min, max } => (*min..=*max).contains(&status),
        }
    }

    /// Short form used in mismatch messages, e.g. `in [200, 404]`.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::OneOf(codes) => {
                let listed: Vec<String> = codes.iter().map(u16::to_string).collect();
                format!("in [{}]", listed.join(", "))
            }
            Self::Range { min, max } => format!("in {min}-{max}"),
        }
    }

    /// `Exact(code)`.
    #[must_use]
    pub const fn exact(code: u16) -> Self {
        Self::Exact(code)
    }

    /// `OneOf(codes)`.
    #[must_use]
    pub fn one_of(codes: impl IntoIterator<Item = u16>) -> Self {
        Self::OneOf(codes.into_iter().collect())
    }

    /// Any 2xx.
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }
}

/// Ordered expectations; all must pass, evaluated in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ExpectationSet {
    expectations: Vec<Expectation>,
}

impl ExpectationSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            expectations: Vec::new(),
        }
    }

    /// Add an expectation.
    pub fn push(&mut self, expectation: Expectation) {
        self.expectations.push(expectation);
    }

    /// Add an expectation (builder pattern).
    #[must_use]
    pub fn with(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Expect an exact status code.
    #[must_use]
    pub fn status(self, code: u16) -> Self {
        self.with(Expectation::Status(StatusExpectation::exact(code)))
    }

    /// Expect the status code to be one of `codes`.
    #[must_use]
    pub fn status_one_of(self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.with(Expectation::Status(StatusExpectation::one_of(codes)))
    }

    /// Expect the body to contain `template`.
    #[must_use]
    pub fn json_like(self, template: serde_json::Value) -> Self {
        self.with(Expectation::JsonLike(template))
    }

    /// Expect the body to equal `value` exactly.
    #[must_use]
    pub fn json(self, value: serde_json::Value) -> Self {
        self.with(Expectation::Json(value))
    }

    /// Expect a header to be present.
    #[must_use]
    pub fn header(self, name: impl Into<String>) -> Self {
        self.with(Expectation::Header {
            name: name.into(),
            value: None,
        })
    }

    /// Expect a header with an exact value.
    #[must_use]
    pub fn header_value(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(Expectation::Header {
            name: name.into(),
            value: Some(value.into()),
        })
    }

    /// Expect the response within `max`.
    #[must_use]
    pub fn response_time(self, max: Duration) -> Self {
        self.with(Expectation::ResponseTime { max })
    }

    /// Expect an arbitrary predicate to hold.
    #[must_use]
    pub fn predicate<F>(self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Response) -> Result<(), String> + Send + Sync + 'static,
    {
        self.with(Expectation::predicate(name, check))
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Expectation> {
        self.expectations.iter()
    }

    /// Returns true if nothing is expected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.expectations.is_empty()
    }

    /// Number of expectations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.expectations.len()
    }
}

impl FromIterator<Expectation> for ExpectationSet {
    fn from_iter<T: IntoIterator<Item = Expectation>>(iter: T) -> Self {
        Self {
            expectations: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_one_of_accepts_each_member_only() {
        let tolerant = StatusExpectation::one_of([200, 404]);
        assert!(tolerant.matches(200));
        assert!(tolerant.matches(404));
        assert!(!tolerant.matches(500));
    }

    #[test]
    fn test_exact_equivalent_to_singleton_one_of() {
        let exact = StatusExpectation::exact(204);
        let one_of = StatusExpectation::one_of([204]);
        for code in [100, 200, 204, 299, 404, 500] {
            assert_eq!(exact.matches(code), one_of.matches(code), "code {code}");
        }
    }

    #[test]
    fn test_success_range_bounds_are_inclusive() {
        let any_2xx = StatusExpectation::success();
        assert!([200, 250, 299].iter().all(|&code| any_2xx.matches(code)));
        assert!([199, 300, 404].iter().all(|&code| !any_2xx.matches(code)));
    }

    #[test]
    fn test_expectation_description() {
        assert_eq!(
            Expectation::Status(StatusExpectation::one_of([200, 404])).description(),
            "Status code in [200, 404]"
        );
        assert_eq!(
            Expectation::JsonLike(json!({"name": "TestPet"})).description(),
            r#"JSON like {"name":"TestPet"}"#
        );
        assert_eq!(
            Expectation::predicate("has id", |_| Ok(())).description(),
            "Predicate 'has id'"
        );
    }

    #[test]
    fn test_expectation_set_builder_keeps_order() {
        let set = ExpectationSet::new()
            .status(200)
            .json_like(json!({"status": "available"}))
            .header("Content-Type");

        let kinds: Vec<_> = set.iter().map(Expectation::description).collect();
        assert_eq!(
            kinds,
            vec![
                "Status code = 200".to_string(),
                r#"JSON like {"status":"available"}"#.to_string(),
                "Header 'Content-Type' exists".to_string(),
            ]
        );
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_predicate_debug_hides_closure() {
        let expectation = Expectation::predicate("custom", |_| Ok(()));
        assert_eq!(format!("{expectation:?}"), r#"Predicate { name: "custom", .. }"#);
    }
}
