// src/checker/transport.rs
// =============================================================================
// This module is the network seam of the checker.
//
// The probe never talks to reqwest directly. It asks a `Transport` for the
// HTTP status of a URL, and the transport reports either a status code or
// one of three failure kinds (timeout, connect, other).
//
// - ReqwestTransport: the real implementation, one shared Client
// - Tests plug in their own Transport to simulate servers and latency
//
// Rust concepts:
// - Traits: an interface that several types can implement
// - async-trait: lets traits have async methods usable as `dyn Transport`
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

/// Redirects followed before a request fails, same as python-requests.
pub const MAX_REDIRECTS: usize = 30;

// Which HTTP method the probe wants to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Head,
    Get,
}

// Why a request did not produce a status code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and returns the final HTTP status code.
    async fn status(&self, method: Method, url: &str, timeout: Duration)
        -> Result<u16, TransportError>;
}

// The production transport
//
// Client is cheap to clone (it's a reference counter internally) and keeps a
// connection pool, so every worker shares the same one.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    // Builds a client that follows up to MAX_REDIRECTS redirects
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(concat!("link-sweep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn status(
        &self,
        method: Method,
        url: &str,
        timeout: Duration,
    ) -> Result<u16, TransportError> {
        let request = match method {
            Method::Head => self.client.head(url),
            Method::Get => self.client.get(url),
        };

        // The timeout is applied per request so the caller can change it
        // without rebuilding the client
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(categorize_error)?;

        Ok(response.status().as_u16())
    }
}

// Categorizes reqwest errors into the three failure kinds
//
// Timeout is checked first: a connect that times out reports both flags.
fn categorize_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}
