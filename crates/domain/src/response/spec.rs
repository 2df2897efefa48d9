//! Response type
//!
//! Contains types for representing HTTP responses as seen by the matcher:
//! status code, headers, decoded body, and timing information.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Reason phrase for the codes the pet store and its proxies return.
    #[must_use]
    pub const fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            415 => "Unsupported Media Type",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// Decoded response body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResponseBody {
    /// No body bytes were received.
    #[default]
    Empty,
    /// The body parsed as JSON.
    Json(serde_json::Value),
    /// The body was not JSON; kept as (lossy) UTF-8 text.
    Text(String),
}

impl ResponseBody {
    /// Decodes raw body bytes, preferring JSON.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::Empty;
        }
        serde_json::from_slice(bytes).map_or_else(
            |_| Self::Text(String::from_utf8_lossy(bytes).into_owned()),
            Self::Json,
        )
    }

    /// Returns the JSON value if the body is JSON.
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Empty | Self::Text(_) => None,
        }
    }

    /// Returns true if no body was received.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Short rendering of the body for failure messages.
    #[must_use]
    pub fn preview(&self) -> String {
        const LIMIT: usize = 200;
        let text = match self {
            Self::Empty => return "<empty>".to_string(),
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        };
        if text.chars().count() > LIMIT {
            let cut: String = text.chars().take(LIMIT).collect();
            format!("{cut}...")
        } else {
            text
        }
    }
}

/// HTTP response as captured by a transport.
///
/// Read-only to the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Decoded response body.
    pub body: ResponseBody,
    /// Time from dispatch until the body was fully read.
    pub duration: Duration,
}

impl Response {
    /// Creates a new `Response` from raw response data.
    #[must_use]
    pub fn new(
        status: impl Into<StatusCode>,
        headers: HashMap<String, String>,
        body: &[u8],
        duration: Duration,
    ) -> Self {
        Self {
            status: status.into().as_u16(),
            headers,
            body: ResponseBody::decode(body),
            duration,
        }
    }

    /// Creates a response with a JSON body and no headers.
    #[must_use]
    pub fn json(status: impl Into<StatusCode>, body: serde_json::Value) -> Self {
        Self {
            status: status.into().as_u16(),
            headers: HashMap::new(),
            body: ResponseBody::Json(body),
            duration: Duration::ZERO,
        }
    }

    /// Creates a response with an empty body and no headers.
    #[must_use]
    pub fn empty(status: impl Into<StatusCode>) -> Self {
        Self {
            status: status.into().as_u16(),
            headers: HashMap::new(),
            body: ResponseBody::Empty,
            duration: Duration::ZERO,
        }
    }

    /// Returns the status as a `StatusCode` struct.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::new(self.status)
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the JSON body, if the body is JSON.
    #[must_use]
    pub const fn json_body(&self) -> Option<&serde_json::Value> {
        self.body.as_json()
    }
}
