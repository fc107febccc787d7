//! Per-call options accepted by [`RequestClient::request_with`](crate::client::RequestClient::request_with).
//!
//! Only `headers` reach the transport. The remaining keys are library flags
//! and are consumed by the client itself; there is no way to smuggle a method
//! or body override through here.

/// Ordered header pairs. Later entries win over earlier ones with the same name.
pub type HeaderList = Vec<(String, String)>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: HeaderList,
    /// Overrides the client's logging flag for this call.
    pub log: Option<bool>,
    /// Correlation tag attached to log events.
    pub form_id: Option<String>,
    /// Toast shown on the client's presenter when the call succeeds.
    pub success_message: Option<String>,
    /// Toast shown on the client's presenter when the call fails.
    pub error_message: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers(mut self, headers: HeaderList) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn log(mut self, enable: bool) -> Self {
        self.log = Some(enable);
        self
    }

    pub fn form_id(mut self, id: impl Into<String>) -> Self {
        self.form_id = Some(id.into());
        self
    }

    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

impl From<HeaderList> for RequestOptions {
    fn from(headers: HeaderList) -> Self {
        Self {
            headers,
            ..Self::default()
        }
    }
}
