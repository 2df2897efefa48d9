//! Fluent request builder

use std::time::Duration;

use serde::Serialize;

use super::{Header, Headers, HttpMethod, QueryParam, QueryParams, RequestBody, RequestDescriptor};
use crate::error::{DomainError, DomainResult};

/// Accumulates the parts of a request and produces a [`RequestDescriptor`].
///
/// Setters never fail; everything is validated once in [`build`](Self::build).
///
/// # Example
///
/// ```
/// use covenant_domain::RequestBuilder;
/// use serde_json::json;
///
/// let request = RequestBuilder::post("https://petstore.example/v2/pet")
///     .header("Content-Type", "application/json")
///     .json(&json!({"name": "TestPet"}))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.method().as_str(), "POST");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    method: Option<HttpMethod>,
    url: Option<String>,
    headers: Headers,
    query: QueryParams,
    body: Option<Result<RequestBody, String>>,
    timeout: Option<Duration>,
}

impl RequestBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new().method(HttpMethod::Get, url)
    }

    /// Starts a POST request.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new().method(HttpMethod::Post, url)
    }

    /// Starts a PUT request.
    #[must_use]
    pub fn put(url: impl Into<String>) -> Self {
        Self::new().method(HttpMethod::Put, url)
    }

    /// Starts a DELETE request.
    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new().method(HttpMethod::Delete, url)
    }

    /// Sets the method and URL.
    #[must_use]
    pub fn method(mut self, method: HttpMethod, url: impl Into<String>) -> Self {
        self.method = Some(method);
        self.url = Some(url.into());
        self
    }

    /// Sets a header, replacing an earlier header of the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(Header::new(name, value));
        self
    }

    /// Sets several headers at once.
    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.headers.set(Header::new(name, value));
        }
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.add(QueryParam::new(key, value));
        self
    }

    /// Sets a JSON body from any serializable value.
    ///
    /// Serialization errors are reported by [`build`](Self::build).
    #[must_use]
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.body = Some(
            serde_json::to_value(body)
                .map(RequestBody::json)
                .map_err(|e| e.to_string()),
        );
        self
    }

    /// Sets a plain text body.
    #[must_use]
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.body = Some(Ok(RequestBody::text(content)));
        self
    }

    /// Sets an already-built body.
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(Ok(body));
        self
    }

    /// Overrides the default timeout for this request only.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validates the accumulated parts and produces the descriptor.
    ///
    /// # Errors
    ///
    /// - [`DomainError::MissingMethod`] if no method was set
    /// - [`DomainError::MissingUrl`] if the URL is missing or blank
    /// - [`DomainError::InvalidBody`] if the JSON body could not be serialized
    pub fn build(self) -> DomainResult<RequestDescriptor> {
        let method = self.method.ok_or(DomainError::MissingMethod)?;
        let url = self
            .url
            .filter(|url| !url.trim().is_empty())
            .ok_or(DomainError::MissingUrl)?;
        let body = self
            .body
            .transpose()
            .map_err(DomainError::InvalidBody)?;

        Ok(RequestDescriptor::from_parts(
            method,
            url,
            self.headers,
            self.query,
            body,
            self.timeout,
        ))
    }
}
