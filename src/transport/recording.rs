//! Scripted in-memory transport for tests.

use super::{RawResponse, Transport, TransportError, TransportRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

enum Scripted {
    Response(RawResponse),
    Failure(String),
}

/// Records every request and replays queued responses in order.
///
/// When the queue is empty it answers `200 application/json {}`.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<TransportRequest>>,
    script: Mutex<VecDeque<Scripted>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(self, response: RawResponse) -> Self {
        self.push_response(response);
        self
    }

    pub fn fail_with(self, reason: impl Into<String>) -> Self {
        self.push_failure(reason);
        self
    }

    pub fn push_response(&self, response: RawResponse) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Response(response));
    }

    pub fn push_failure(&self, reason: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Failure(reason.into()));
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<TransportRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: TransportRequest) -> std::result::Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Response(resp)) => Ok(resp),
            Some(Scripted::Failure(reason)) => Err(TransportError::Other(reason)),
            None => Ok(RawResponse::json(200, "{}")),
        }
    }
}
