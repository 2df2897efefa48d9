//! Transport implementation using reqwest.
//!
//! This adapter implements the `Transport` port on top of a shared
//! `reqwest::Client`. It handles all HTTP communication for the harness.

use std::collections::HashMap;
use std::error::Error as _;
use std::future::Future;
use std::time::{Duration, Instant};

use covenant_application::{Transport, TransportError};
use covenant_domain::{HttpMethod, RequestDescriptor, Response};
use reqwest::{Client, Method};
use tracing::trace;

/// Maximum number of redirects followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// HTTP transport backed by reqwest.
///
/// The inner client pools connections, so one instance should be shared
/// (behind an `Arc`) by every executor in a run.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with default settings.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: "Covenant/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("Covenant/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Flattens the error and its sources into one message.
    fn describe(error: &reqwest::Error) -> String {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }

    fn host_of(error: &reqwest::Error) -> String {
        error
            .url()
            .and_then(|u| u.host_str())
            .unwrap_or("unknown")
            .to_string()
    }

    /// Maps reqwest errors to [`TransportError`].
    fn map_error(error: &reqwest::Error, timeout: Duration) -> TransportError {
        if error.is_timeout() {
            return TransportError::timeout(timeout);
        }

        let message = Self::describe(error);

        if error.is_connect() {
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return TransportError::DnsError {
                    host: Self::host_of(error),
                    message,
                };
            }
            if lower.contains("refused") {
                return TransportError::ConnectionRefused {
                    host: Self::host_of(error),
                    port: error
                        .url()
                        .and_then(reqwest::Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return TransportError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return TransportError::Other(format!("more than {MAX_REDIRECTS} redirects"));
        }

        if error.is_body() || error.is_decode() {
            return TransportError::Body(message);
        }

        TransportError::Other(message)
    }

    fn prepare(
        &self,
        request: &RequestDescriptor,
        timeout: Duration,
    ) -> Result<reqwest::RequestBuilder, TransportError> {
        let url = request
            .full_url()
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {}", request.url())))?;

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method()), url)
            .timeout(timeout);

        for header in request.headers().iter() {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }

        if let Some(body) = request.body() {
            // An explicit Content-Type header wins over the body's own.
            if !request.headers().contains("content-type") {
                builder = builder.header("Content-Type", body.content_type());
            }
            builder = builder.body(body.to_bytes());
        }

        Ok(builder)
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        request: &RequestDescriptor,
        timeout: Duration,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send {
        let prepared = self.prepare(request, timeout);
        let label = request.label();

        async move {
            let builder = prepared?;
            let start = Instant::now();

            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, timeout))?;

            let status = response.status().as_u16();
            let headers: HashMap<String, String> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();

            let body = response
                .bytes()
                .await
                .map_err(|e| TransportError::Body(Self::describe(&e)))?;

            let duration = start.elapsed();
            trace!(request = %label, status, bytes = body.len(), "transport exchange complete");

            Ok(Response::new(status, headers, &body, duration))
        }
    }
}
