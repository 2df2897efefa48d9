//! Scripted transport for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use covenant_domain::{RequestDescriptor, Response};

use super::{Transport, TransportError};

/// Replays scripted results in order and records every request it sees.
pub struct MockTransport {
    results: Mutex<VecDeque<Result<Response, TransportError>>>,
    sent: Mutex<Vec<String>>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTransport {
    pub fn new(results: impl IntoIterator<Item = Result<Response, TransportError>>) -> Self {
        Self {
            results: Mutex::new(results.into_iter().collect()),
            sent: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::<Result<Response, TransportError>>::new())
    }

    pub fn responding(responses: impl IntoIterator<Item = Response>) -> Self {
        Self::new(responses.into_iter().map(Ok))
    }

    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// `METHOD full-url` of every request, in send order.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn send(
        &self,
        request: &RequestDescriptor,
        _timeout: Duration,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send {
        let label = request.full_url().map_or_else(
            |_| request.label(),
            |url| format!("{} {url}", request.method()),
        );

        async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.sent.lock().unwrap().push(label);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            let next = self.results.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Err(TransportError::Other("no scripted response left".to_string())))
        }
    }
}
