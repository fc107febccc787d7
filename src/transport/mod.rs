//! Transport seam: the fetch-compatible primitive the client depends on.
//!
//! The client never talks to the network directly. It builds a
//! [`TransportRequest`], hands it to a [`Transport`], and receives a
//! [`RawResponse`] back. [`HttpTransport`] is the reqwest-backed default;
//! tests and embedders can substitute their own.

pub mod http;
#[cfg(any(test, feature = "test-support"))]
pub mod recording;

pub use http::HttpTransport;
#[cfg(any(test, feature = "test-support"))]
pub use recording::RecordingTransport;

use crate::types::{HttpMethod, RequestBody};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

/// One outbound call, fully resolved: absolute URL, merged headers, final body.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
}

/// A response as the transport saw it, before any decoding.
///
/// The body is either the bytes read off the wire or the reason reading them
/// failed. A failed read is not a transport error: the status line arrived,
/// so the normalizer reports it as a decode failure instead.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    body: std::result::Result<Bytes, String>,
}

impl RawResponse {
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: Ok(body.into()),
        }
    }

    /// A response whose status and headers arrived but whose body could not be read.
    pub fn unreadable(status: u16, headers: HeaderMap, reason: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: Err(reason.into()),
        }
    }

    /// Convenience for a response with a JSON content type.
    pub fn json(status: u16, body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self::new(status, headers, body)
    }

    /// Convenience for a `text/plain` response.
    pub fn text(status: u16, body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        Self::new(status, headers, body)
    }

    /// Adds a header, silently skipping names or values that are not valid HTTP.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// True iff the status is in `200..=299`.
    pub fn ok(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn bytes(&self) -> std::result::Result<&Bytes, &str> {
        self.body.as_ref().map_err(|e| e.as_str())
    }

    /// Lossy text view of the body; empty when the body could not be read.
    pub fn text_lossy(&self) -> String {
        match &self.body {
            Ok(b) => String::from_utf8_lossy(b).into_owned(),
            Err(_) => String::new(),
        }
    }
}

/// Fetch-compatible transport.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> std::result::Result<RawResponse, TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
