//! HTTP Header types

use serde::{Deserialize, Serialize};

/// One request header. Names compare case-insensitively in [`Headers`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header name as given by the caller.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl Header {
    /// Creates a new header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An ordered collection of HTTP headers.
///
/// Setting a header whose name is already present (case-insensitively)
/// replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers {
    items: Vec<Header>,
}

impl Headers {
    /// Creates an empty header collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Sets a header, replacing any existing header with the same name.
    pub fn set(&mut self, header: Header) {
        match self
            .items
            .iter_mut()
            .find(|h| h.name.eq_ignore_ascii_case(&header.name))
        {
            Some(existing) => *existing = header,
            None => self.items.push(header),
        }
    }

    /// Returns the value of a header (case-insensitive lookup).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Returns true if a header with this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates in the order names were first set.
    pub fn iter(&self) -> std::slice::Iter<'_, Header> {
        self.items.iter()
    }

    /// Number of distinct header names.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no header was set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Header> for Headers {
    fn from_iter<T: IntoIterator<Item = Header>>(iter: T) -> Self {
        let mut headers = Self::new();
        for header in iter {
            headers.set(header);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_replaces_case_insensitively() {
        let mut headers = Headers::new();
        headers.set(Header::new("Accept", "text/plain"));
        headers.set(Header::new("accept", "application/json"));

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("ACCEPT"), Some("application/json"));
    }

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let headers: Headers = [
            Header::new("X-First", "1"),
            Header::new("X-Second", "2"),
        ]
        .into_iter()
        .collect();

        let names: Vec<_> = headers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["X-First", "X-Second"]);
    }
}
