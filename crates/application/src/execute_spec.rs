//! Execute Spec Use Case
//!
//! Sends one request, waits for the response within a bounded time, and
//! checks it against an expectation set.

use std::sync::Arc;
use std::time::Duration;

use covenant_domain::{ExpectationSet, RequestDescriptor, ResponseMatcher};
use tracing::{debug, warn};

use crate::error::{ExecuteResult, ExecutionError};
use crate::ports::{Transport, TransportError};
use crate::settings;

/// Use case for executing one contract step.
///
/// Exactly one request is issued per call; nothing is retried.
///
/// # Example
///
/// ```ignore
/// let executor = SpecExecutor::new(Arc::new(ReqwestTransport::new()?));
///
/// let request = RequestBuilder::get("https://petstore.swagger.io/v2/pet/1").build()?;
/// let expectations = ExpectationSet::new().status_one_of([200, 404]);
/// let response = executor.execute(&request, &expectations).await?;
/// ```
pub struct SpecExecutor<T: Transport> {
    transport: Arc<T>,
    matcher: ResponseMatcher,
    default_timeout: Option<Duration>,
}

impl<T: Transport> SpecExecutor<T> {
    /// Creates an executor that uses the process-wide default timeout.
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            matcher: ResponseMatcher::new(),
            default_timeout: None,
        }
    }

    /// Overrides the default timeout for this executor.
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// The timeout applied when a request carries none.
    ///
    /// Without an override this is the process-wide default at call time.
    #[must_use]
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout.unwrap_or_else(settings::default_timeout)
    }

    /// The timeout that [`execute`](Self::execute) applies to `request`.
    #[must_use]
    pub fn timeout_for(&self, request: &RequestDescriptor) -> Duration {
        request.timeout().unwrap_or_else(|| self.default_timeout())
    }

    /// Executes the request with its own timeout, or the executor default.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub async fn execute(
        &self,
        request: &RequestDescriptor,
        expectations: &ExpectationSet,
    ) -> ExecuteResult {
        self.run(request, expectations, self.timeout_for(request)).await
    }

    /// Executes the request, bounded by `timeout`, and matches the response.
    ///
    /// # Validation
    ///
    /// - URL must parse
    /// - URL must use http:// or https://
    ///
    /// # Errors
    ///
    /// - [`ExecutionError::Transport`] on an invalid URL, a transport failure,
    ///   or when `timeout` expires
    /// - [`ExecutionError::Mismatch`] when the response fails an expectation
    pub async fn run(
        &self,
        request: &RequestDescriptor,
        expectations: &ExpectationSet,
        timeout: Duration,
    ) -> ExecuteResult {
        Self::validate(request)?;

        debug!(
            method = %request.method(),
            url = %request.url(),
            timeout_ms = %timeout.as_millis(),
            "sending request"
        );

        let response = tokio::time::timeout(timeout, self.transport.send(request, timeout))
            .await
            .map_err(|_| TransportError::timeout(timeout))??;

        debug!(
            status = response.status,
            elapsed_ms = %response.duration.as_millis(),
            "response received"
        );

        if let Err(mismatch) = self.matcher.check(&response, expectations) {
            warn!(request = %request.label(), %mismatch, "response did not match");
            return Err(ExecutionError::Mismatch(mismatch));
        }

        Ok(response)
    }

    /// Validates the request before it reaches the transport.
    fn validate(request: &RequestDescriptor) -> Result<(), TransportError> {
        let url = request
            .full_url()
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {}", request.url())))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransportError::InvalidUrl(
                "URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ports::mock_transport::MockTransport;
    use covenant_domain::{RequestBuilder, Response};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn executor(transport: MockTransport) -> (Arc<MockTransport>, SpecExecutor<MockTransport>) {
        let transport = Arc::new(transport);
        let executor =
            SpecExecutor::new(Arc::clone(&transport)).with_default_timeout(Duration::from_secs(5));
        (transport, executor)
    }

    #[tokio::test]
    async fn test_execute_success() {
        let (transport, executor) = executor(MockTransport::responding([Response::json(
            200u16,
            json!({"id": 9999, "name": "TestPet", "status": "available"}),
        )]));

        let request = RequestBuilder::post("https://petstore.example/v2/pet")
            .json(&json!({"id": 9999, "name": "TestPet", "status": "available"}))
            .build()
            .unwrap();
        let expectations = ExpectationSet::new()
            .status(200)
            .json_like(json!({"name": "TestPet", "status": "available"}));

        let response = executor.execute(&request, &expectations).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(transport.sent(), vec!["POST https://petstore.example/v2/pet"]);
    }

    #[tokio::test]
    async fn test_query_params_reach_transport() {
        let (transport, executor) =
            executor(MockTransport::responding([Response::json(200u16, json!([]))]));

        let request = RequestBuilder::get("https://petstore.example/v2/pet/findByStatus")
            .query("status", "banana")
            .build()
            .unwrap();

        executor
            .execute(&request, &ExpectationSet::new().status(200).json(json!([])))
            .await
            .unwrap();
        assert_eq!(
            transport.sent(),
            vec!["GET https://petstore.example/v2/pet/findByStatus?status=banana"]
        );
    }

    #[tokio::test]
    async fn test_mismatch_is_reported() {
        let (_, executor) = executor(MockTransport::responding([Response::empty(404u16)]));
        let request = RequestBuilder::get("https://petstore.example/v2/pet/1")
            .build()
            .unwrap();

        let error = executor
            .execute(&request, &ExpectationSet::new().status(200))
            .await
            .unwrap_err();

        let mismatch = error.as_mismatch().unwrap();
        assert_eq!(mismatch.actual.as_deref(), Some("404"));
        assert!(!error.is_transport());
    }

    #[tokio::test]
    async fn test_transport_error_is_not_retried() {
        let (transport, executor) = executor(MockTransport::new([
            Err(TransportError::ConnectionFailed("reset".to_string())),
            Ok(Response::empty(200u16)),
        ]));
        let request = RequestBuilder::get("https://petstore.example/v2/pet/1")
            .build()
            .unwrap();

        let error = executor
            .execute(&request, &ExpectationSet::new().status(200))
            .await
            .unwrap_err();

        assert_eq!(
            error,
            ExecutionError::Transport(TransportError::ConnectionFailed("reset".to_string()))
        );
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_expiry_is_transport_error() {
        let (_, executor) = executor(
            MockTransport::responding([Response::empty(200u16)])
                .with_delay(Duration::from_millis(500)),
        );
        let request = RequestBuilder::get("https://petstore.example/v2/pet/1")
            .build()
            .unwrap();

        let error = executor
            .run(&request, &ExpectationSet::new(), Duration::from_millis(20))
            .await
            .unwrap_err();

        assert_eq!(
            error,
            ExecutionError::Transport(TransportError::Timeout { timeout_ms: 20 })
        );
    }

    #[tokio::test]
    async fn test_request_timeout_overrides_default() {
        let (_, executor) = executor(MockTransport::empty());
        let request = RequestBuilder::get("https://petstore.example/v2/pet/1")
            .timeout(Duration::from_millis(250))
            .build()
            .unwrap();
        let plain = RequestBuilder::get("https://petstore.example/v2/pet/1")
            .build()
            .unwrap();

        assert_eq!(executor.timeout_for(&request), Duration::from_millis(250));
        assert_eq!(executor.timeout_for(&plain), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_invalid_url_surfaces_at_execution() {
        let (transport, executor) = executor(MockTransport::empty());
        let request = RequestBuilder::get("not-a-valid-url").build().unwrap();

        let error = executor
            .execute(&request, &ExpectationSet::new())
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            ExecutionError::Transport(TransportError::InvalidUrl(_))
        ));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let (_, executor) = executor(MockTransport::empty());
        let request = RequestBuilder::get("ftp://petstore.example/pet").build().unwrap();

        let error = executor
            .execute(&request, &ExpectationSet::new())
            .await
            .unwrap_err();

        assert_eq!(
            error,
            ExecutionError::Transport(TransportError::InvalidUrl(
                "URL must start with http:// or https://".to_string()
            ))
        );
    }
}
