//! Query string parameters

use serde::{Deserialize, Serialize};

/// One `key=value` pair, unencoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    /// Parameter name.
    pub key: String,
    /// Parameter value.
    pub value: String,
}

impl QueryParam {
    /// Creates a query parameter.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Query parameters in the order they are appended to the URL.
///
/// Repeated keys are kept, so `?tag=a&tag=b` can be expressed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<QueryParam>);

impl QueryParams {
    /// Appends a parameter.
    pub fn add(&mut self, param: QueryParam) {
        self.0.push(param);
    }

    /// Iterates in append order.
    pub fn iter(&self) -> std::slice::Iter<'_, QueryParam> {
        self.0.iter()
    }

    /// Number of parameters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no parameter was added.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<QueryParam> for QueryParams {
    fn from_iter<T: IntoIterator<Item = QueryParam>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
