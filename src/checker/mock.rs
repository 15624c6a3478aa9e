// src/checker/mock.rs
// =============================================================================
// A scripted Transport for tests.
//
// Each URL is mapped to a canned reply. The mock also records how many
// requests were in flight at the same time, which lets the dispatcher tests
// check the worker-pool bound.
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::transport::{Method, Transport, TransportError};

#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16),
    Timeout,
    Connect,
    Other(&'static str),
}

#[derive(Default)]
pub struct MockTransport {
    head: HashMap<String, Reply>,
    get: HashMap<String, Reply>,
    latency: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<(Method, String)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    // Same reply for HEAD and GET
    pub fn route(mut self, url: &str, reply: Reply) -> Self {
        self.head.insert(url.to_string(), reply.clone());
        self.get.insert(url.to_string(), reply);
        self
    }

    // Overrides the GET reply only
    pub fn route_get(mut self, url: &str, reply: Reply) -> Self {
        self.get.insert(url.to_string(), reply);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<(Method, String)> {
        self.calls.lock().unwrap().clone()
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn status(
        &self,
        method: Method,
        url: &str,
        _timeout: Duration,
    ) -> Result<u16, TransportError> {
        self.calls.lock().unwrap().push((method, url.to_string()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        // Decrements on completion and when the future is dropped mid-sleep
        let _guard = InFlightGuard(&self.in_flight);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let table = match method {
            Method::Head => &self.head,
            Method::Get => &self.get,
        };
        let reply = table.get(url).cloned().unwrap_or(Reply::Connect);

        match reply {
            Reply::Status(code) => Ok(code),
            Reply::Timeout => Err(TransportError::Timeout),
            Reply::Connect => Err(TransportError::Connect("connection refused".to_string())),
            Reply::Other(message) => Err(TransportError::Other(message.to_string())),
        }
    }
}
