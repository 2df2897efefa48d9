//! Request descriptor type

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{Headers, HttpMethod, QueryParams, RequestBody, RequestBuilder};

/// Complete, immutable description of one HTTP request.
///
/// Produced by [`RequestBuilder::build`]; method and URL are always present.
/// The URL is not validated until the request is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    method: HttpMethod,
    url: String,
    #[serde(default)]
    headers: Headers,
    #[serde(default)]
    query: QueryParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body: Option<RequestBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout: Option<Duration>,
}

impl RequestDescriptor {
    pub(crate) const fn from_parts(
        method: HttpMethod,
        url: String,
        headers: Headers,
        query: QueryParams,
        body: Option<RequestBody>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            method,
            url,
            headers,
            query,
            body,
            timeout,
        }
    }

    /// Starts building a new request.
    #[must_use]
    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Target URL as given, without the query parameters.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Query parameters appended at execution time.
    #[must_use]
    pub const fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Request body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Per-request timeout override.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Parses the URL and appends the query parameters.
    ///
    /// Parameters already present in the URL are kept; the descriptor's
    /// parameters are appended after them.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed.
    pub fn full_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.url)?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in self.query.iter() {
                pairs.append_pair(&param.key, &param.value);
            }
        }
        Ok(url)
    }

    /// Short `METHOD url` label used in logs and reports.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}
