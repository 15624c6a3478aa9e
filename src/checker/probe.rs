// src/checker/probe.rs
// =============================================================================
// This module checks if a single URL is alive.
//
// Key functionality:
// - Makes an HTTP HEAD request (lightweight, no body download)
// - Falls back to GET when the server refuses HEAD (405 / 501)
// - Turns every outcome into a Classification value, never an error
//
// Rust concepts:
// - Enums: To represent the different outcomes of a check
// - Trait objects: `&dyn Transport` so tests can swap the network out
// =============================================================================

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::transport::{Method, Transport, TransportError};

/// Per-request timeout used when the caller does not pick one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// The outcome of checking one link
//
// #[serde(tag = "status")] writes the variant name into a "status" field,
// so NotFound becomes {"status": "not_found"}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Classification {
    /// Status below 400
    Ok,
    /// HTTP 404
    NotFound,
    /// Any other status of 400 or above
    ClientOrServerError { code: u16 },
    /// The request did not finish within the timeout
    Timeout,
    /// The connection could not be established (DNS, refused, ...)
    ConnectionFailure,
    /// Anything else that went wrong
    OtherError { message: String },
}

impl Classification {
    pub fn is_ok(&self) -> bool {
        matches!(self, Classification::Ok)
    }

    pub fn is_broken(&self) -> bool {
        !self.is_ok()
    }
}

// Display gives the text used in the "Error" column of reports
impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Ok => write!(f, "OK"),
            Classification::NotFound => write!(f, "404 Not Found"),
            Classification::ClientOrServerError { code } => write!(f, "Error {}", code),
            Classification::Timeout => write!(f, "Timeout"),
            Classification::ConnectionFailure => write!(f, "Connection Error"),
            Classification::OtherError { message } => write!(f, "{}", message),
        }
    }
}

// The result of checking one line of the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// 1-based line number in the input file
    pub line: usize,
    /// The trimmed URL that was checked
    pub link: String,
    #[serde(flatten)]
    pub classification: Classification,
}

impl CheckResult {
    pub fn is_broken(&self) -> bool {
        self.classification.is_broken()
    }
}

// Checks a single link
//
// Parameters:
//   transport: what actually performs the request
//   url: the URL to check (already trimmed)
//   timeout: upper bound for each request
//
// Returns: a Classification, whatever happens
pub async fn probe(transport: &dyn Transport, url: &str, timeout: Duration) -> Classification {
    if let Err(message) = validate_url(url) {
        debug!(url, %message, "skipping request for invalid url");
        return Classification::OtherError { message };
    }

    let mut result = transport.status(Method::Head, url, timeout).await;

    // Some servers don't implement HEAD, ask again with GET
    if let Ok(405 | 501) = result {
        debug!(url, "HEAD refused, falling back to GET");
        result = transport.status(Method::Get, url, timeout).await;
    }

    let classification = match result {
        Ok(code) => classify_status(code),
        Err(error) => classify_error(error),
    };
    debug!(url, outcome = %classification, "probe finished");
    classification
}

// HTTP status codes:
// - below 400: fine (redirects were already followed by the client)
// - 404: not found
// - 400 and above: client or server error
pub fn classify_status(code: u16) -> Classification {
    match code {
        404 => Classification::NotFound,
        c if c >= 400 => Classification::ClientOrServerError { code: c },
        _ => Classification::Ok,
    }
}

fn classify_error(error: TransportError) -> Classification {
    match error {
        TransportError::Timeout => Classification::Timeout,
        TransportError::Connect(_) => Classification::ConnectionFailure,
        TransportError::Other(message) => Classification::OtherError { message },
    }
}

// Only absolute http(s) URLs are sent to the network
fn validate_url(url: &str) -> Result<(), String> {
    let parsed = Url::parse(url).map_err(|e| format!("invalid URL '{}': {}", url, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("invalid URL '{}': unsupported scheme '{}'", url, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::mock::{MockTransport, Reply};

    #[test]
    fn test_classify_status_codes() {
        assert_eq!(classify_status(200), Classification::Ok);
        assert_eq!(classify_status(301), Classification::Ok);
        assert_eq!(classify_status(404), Classification::NotFound);
        assert_eq!(
            classify_status(410),
            Classification::ClientOrServerError { code: 410 }
        );
        assert_eq!(
            classify_status(503),
            Classification::ClientOrServerError { code: 503 }
        );
    }

    #[tokio::test]
    async fn test_transport_failures_become_classifications() {
        let transport = MockTransport::new()
            .route("https://slow.test/", Reply::Timeout)
            .route("https://down.test/", Reply::Connect)
            .route("https://odd.test/", Reply::Other("body decode failed"));

        assert_eq!(
            probe(&transport, "https://slow.test/", DEFAULT_TIMEOUT).await,
            Classification::Timeout
        );
        assert_eq!(
            probe(&transport, "https://down.test/", DEFAULT_TIMEOUT).await,
            Classification::ConnectionFailure
        );
        assert_eq!(
            probe(&transport, "https://odd.test/", DEFAULT_TIMEOUT).await,
            Classification::OtherError {
                message: "body decode failed".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_head_is_preferred() {
        let transport = MockTransport::new().route("https://good.test/", Reply::Status(200));

        let outcome = probe(&transport, "https://good.test/", DEFAULT_TIMEOUT).await;

        assert_eq!(outcome, Classification::Ok);
        assert_eq!(
            transport.calls(),
            vec![(Method::Head, "https://good.test/".to_string())]
        );
    }

    #[tokio::test]
    async fn test_falls_back_to_get_when_head_not_allowed() {
        let transport = MockTransport::new()
            .route("https://nohead.test/", Reply::Status(405))
            .route_get("https://nohead.test/", Reply::Status(404));

        let outcome = probe(&transport, "https://nohead.test/", DEFAULT_TIMEOUT).await;

        assert_eq!(outcome, Classification::NotFound);
        assert_eq!(transport.calls().len(), 2);
        assert_eq!(transport.calls()[1].0, Method::Get);
    }

    #[tokio::test]
    async fn test_invalid_url_skips_network() {
        let transport = MockTransport::new();

        let outcome = probe(&transport, "not a url", DEFAULT_TIMEOUT).await;
        assert!(matches!(outcome, Classification::OtherError { .. }));

        let outcome = probe(&transport, "ftp://files.test/a", DEFAULT_TIMEOUT).await;
        assert!(matches!(outcome, Classification::OtherError { .. }));

        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_probe_is_deterministic() {
        let transport = MockTransport::new().route("https://err.test/", Reply::Status(500));

        let first = probe(&transport, "https://err.test/", DEFAULT_TIMEOUT).await;
        let second = probe(&transport, "https://err.test/", DEFAULT_TIMEOUT).await;

        assert_eq!(first, second);
        assert_eq!(first, Classification::ClientOrServerError { code: 500 });
    }

    #[test]
    fn test_display_matches_report_text() {
        assert_eq!(Classification::NotFound.to_string(), "404 Not Found");
        assert_eq!(
            Classification::ClientOrServerError { code: 500 }.to_string(),
            "Error 500"
        );
        assert_eq!(Classification::ConnectionFailure.to_string(), "Connection Error");
    }

    #[test]
    fn test_result_serializes_flat() {
        let result = CheckResult {
            line: 3,
            link: "https://404.test".to_string(),
            classification: Classification::NotFound,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "not_found");
        assert_eq!(json["line"], 3);
        assert_eq!(json["link"], "https://404.test");
    }
}
