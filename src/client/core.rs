use super::builder::RequestClientBuilder;
use super::contract::{FlatMerge, ResponseContract, ResponseMode};
use super::headers::{merge_headers, prepare_body, HeaderPairs};
use super::normalize::{normalize, Normalized};
use crate::notify::{NotificationOptions, NotificationPresenter};
use crate::transport::{Transport, TransportRequest};
use crate::types::{HeaderList, HttpMethod, RequestBody, RequestOptions};
use crate::Result;
use arc_swap::ArcSwapOption;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// HTTP client bound to one base URL.
///
/// Base URL and default headers are fixed at construction. The bearer token
/// is the only mutable field: [`set_token`](Self::set_token) affects calls
/// issued after it returns, never calls already in flight. Each call merges
/// its headers and body fresh, so one instance can be shared freely across
/// concurrent tasks.
pub struct RequestClient<M: ResponseContract = FlatMerge> {
    pub(crate) base_url: String,
    pub(crate) default_headers: Arc<HeaderPairs>,
    pub(crate) token: ArcSwapOption<String>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) log_requests: bool,
    pub(crate) presenter: Option<Arc<NotificationPresenter>>,
    pub(crate) _contract: PhantomData<fn() -> M>,
}

impl<M: ResponseContract> RequestClient<M> {
    /// Client with no default headers and the reqwest transport.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        RequestClientBuilder::new(base_url).build()
    }

    pub fn builder(base_url: impl Into<String>) -> RequestClientBuilder<M> {
        RequestClientBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn mode(&self) -> ResponseMode {
        M::MODE
    }

    /// Whether calls log by default; `RequestOptions::log` overrides per call.
    pub fn logging_enabled(&self) -> bool {
        self.log_requests
    }

    /// Use `token` as `Authorization: Bearer <token>` on every later call.
    pub fn set_token(&self, token: impl Into<String>) {
        self.token.store(Some(Arc::new(token.into())));
    }

    /// Stop sending an Authorization header on later calls.
    pub fn clear_token(&self) {
        self.token.store(None);
    }

    pub fn token(&self) -> Option<String> {
        self.token.load_full().map(|t| t.as_ref().clone())
    }

    /// Issue one call. `endpoint` is appended verbatim to the base URL.
    pub async fn request(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<RequestBody>,
        headers: HeaderList,
    ) -> M::Output {
        self.request_with(endpoint, method, body, RequestOptions::from(headers))
            .await
    }

    /// Issue one call with the full option set.
    pub async fn request_with(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<RequestBody>,
        options: RequestOptions,
    ) -> M::Output {
        let request_id = Uuid::new_v4().to_string();
        let outcome = self
            .execute(endpoint, method, body, &options.headers)
            .await;

        if options.log.unwrap_or(self.log_requests) {
            self.log_outcome(&request_id, endpoint, method, options.form_id.as_deref(), &outcome);
        }
        self.notify_outcome(&options, &outcome);

        M::shape(outcome)
    }

    async fn execute(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<RequestBody>,
        per_call: &[(String, String)],
    ) -> Result<Normalized> {
        let token = self.token.load_full();
        let builtin_content_type = !body.as_ref().is_some_and(RequestBody::is_multipart);
        let headers = merge_headers(
            builtin_content_type,
            &self.default_headers,
            token.as_deref().map(String::as_str),
            per_call,
        )?;
        let body = prepare_body(method, body, &headers)?;

        let request = TransportRequest {
            method,
            url: format!("{}{}", self.base_url, endpoint),
            headers,
            body,
        };
        let raw = self.transport.send(request).await?;
        normalize(&raw)
    }

    fn log_outcome(
        &self,
        request_id: &str,
        endpoint: &str,
        method: HttpMethod,
        form_id: Option<&str>,
        outcome: &Result<Normalized>,
    ) {
        if let Ok(n) = outcome {
            info!(
                request_id,
                method = %method,
                endpoint,
                status = n.status,
                body = %n.body,
                form_id,
                "request completed"
            );
        }
        if let Some(message) = M::failure_message(outcome) {
            error!(
                request_id,
                endpoint,
                method = %method,
                error = %message,
                form_id,
                "request failed"
            );
        }
    }

    fn notify_outcome(&self, options: &RequestOptions, outcome: &Result<Normalized>) {
        let Some(presenter) = &self.presenter else {
            return;
        };
        let succeeded = matches!(outcome, Ok(n) if n.ok);
        let toast = if succeeded {
            options.success_message.as_ref().map(NotificationOptions::success)
        } else {
            options.error_message.as_ref().map(NotificationOptions::error)
        };
        if let Some(toast) = toast {
            presenter.show(toast);
        }
    }

    pub async fn get(&self, endpoint: &str) -> M::Output {
        self.request(endpoint, HttpMethod::Get, None, Vec::new()).await
    }

    pub async fn head(&self, endpoint: &str) -> M::Output {
        self.request(endpoint, HttpMethod::Head, None, Vec::new()).await
    }

    pub async fn post(&self, endpoint: &str, body: impl Into<RequestBody>) -> M::Output {
        self.request(endpoint, HttpMethod::Post, Some(body.into()), Vec::new())
            .await
    }

    pub async fn put(&self, endpoint: &str, body: impl Into<RequestBody>) -> M::Output {
        self.request(endpoint, HttpMethod::Put, Some(body.into()), Vec::new())
            .await
    }

    pub async fn patch(&self, endpoint: &str, body: impl Into<RequestBody>) -> M::Output {
        self.request(endpoint, HttpMethod::Patch, Some(body.into()), Vec::new())
            .await
    }

    pub async fn delete(&self, endpoint: &str) -> M::Output {
        self.request(endpoint, HttpMethod::Delete, None, Vec::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::contract::Wrapped;
    use crate::logging::LogBuffer;
    use crate::transport::{RawResponse, RecordingTransport};
    use crate::types::MultipartField;
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
    use serde_json::json;

    fn flat(transport: Arc<RecordingTransport>) -> RequestClient<FlatMerge> {
        RequestClient::builder("https://api.test")
            .transport(transport)
            .build()
            .unwrap()
    }

    fn wrapped(transport: Arc<RecordingTransport>) -> RequestClient<Wrapped> {
        RequestClient::<Wrapped>::builder("https://api.test")
            .transport(transport)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn endpoint_is_appended_verbatim() {
        let transport = Arc::new(RecordingTransport::new());
        let client = flat(transport.clone());
        client.get("/users?q=a b").await.unwrap();
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://api.test/users?q=a b"
        );
    }

    #[tokio::test]
    async fn get_and_head_never_send_a_body() {
        let transport = Arc::new(RecordingTransport::new());
        let client = flat(transport.clone());
        for method in [HttpMethod::Get, HttpMethod::Head] {
            client
                .request("/x", method, Some(json!({"a": 1}).into()), Vec::new())
                .await
                .unwrap();
            assert!(transport.last_request().unwrap().body.is_none());
        }
    }

    #[tokio::test]
    async fn json_body_is_serialized_for_json_content_type() {
        let transport = Arc::new(RecordingTransport::new());
        let client = flat(transport.clone());
        let body = json!({"title": "Buy milk", "done": false});
        client.post("/todos", body.clone()).await.unwrap();
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(
            sent.body,
            Some(RequestBody::Text(serde_json::to_string(&body).unwrap()))
        );
    }

    #[tokio::test]
    async fn per_call_content_type_overrides_default_and_disables_serialization() {
        let transport = Arc::new(RecordingTransport::new());
        let client = flat(transport.clone());
        client
            .request(
                "/raw",
                HttpMethod::Put,
                Some(json!({"a": 1}).into()),
                vec![("Content-Type".into(), "text/plain".into())],
            )
            .await
            .unwrap();
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.headers.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(sent.body, Some(RequestBody::Json(json!({"a": 1}))));
    }

    #[tokio::test]
    async fn multipart_body_is_left_for_the_transport() {
        let transport = Arc::new(RecordingTransport::new());
        let client = flat(transport.clone());
        let fields = vec![MultipartField::text("name", "x")];
        client.post("/upload", fields.clone()).await.unwrap();
        let sent = transport.last_request().unwrap();
        assert!(sent.headers.get(CONTENT_TYPE).is_none());
        assert_eq!(sent.body, Some(RequestBody::Multipart(fields)));
    }

    #[tokio::test]
    async fn token_is_added_once_and_cleared() {
        let transport = Arc::new(RecordingTransport::new());
        let client = flat(transport.clone());

        client.get("/a").await.unwrap();
        assert!(transport.last_request().unwrap().headers.get(AUTHORIZATION).is_none());

        client.set_token("abc");
        client.get("/b").await.unwrap();
        let sent = transport.last_request().unwrap();
        let auth: Vec<_> = sent.headers.get_all(AUTHORIZATION).iter().collect();
        assert_eq!(auth.len(), 1);
        assert_eq!(auth[0], "Bearer abc");

        client.clear_token();
        client.get("/c").await.unwrap();
        assert!(transport.last_request().unwrap().headers.get(AUTHORIZATION).is_none());
        assert_eq!(client.token(), None);
    }

    #[tokio::test]
    async fn default_headers_apply_to_every_call() {
        let transport = Arc::new(RecordingTransport::new());
        let client: RequestClient = RequestClient::builder("https://api.test")
            .default_header("X-App", "demo")
            .transport(transport.clone())
            .build()
            .unwrap();
        client.get("/a").await.unwrap();
        client.delete("/b").await.unwrap();
        for req in transport.requests() {
            assert_eq!(req.headers.get("x-app").unwrap(), "demo");
        }
    }

    #[tokio::test]
    async fn flat_merge_resolves_http_errors() {
        let transport = Arc::new(
            RecordingTransport::new().respond_with(RawResponse::json(404, r#"{"message":"not found"}"#)),
        );
        let resp = flat(transport).get("/missing").await.unwrap();
        assert_eq!(resp.status(), 404);
        assert!(!resp.ok());
        assert_eq!(resp.get("message"), Some(&json!("not found")));
    }

    #[tokio::test]
    async fn flat_merge_rejects_transport_and_decode_failures() {
        let transport = Arc::new(
            RecordingTransport::new()
                .fail_with("connection refused")
                .respond_with(RawResponse::json(200, "{oops")),
        );
        let client = flat(transport);
        assert!(client.get("/a").await.unwrap_err().is_transport());
        let err = client.get("/b").await.unwrap_err();
        assert!(err.is_decode());
        assert_eq!(err.raw_body(), Some("{oops"));
    }

    #[tokio::test]
    async fn wrapped_never_fails() {
        let transport = Arc::new(
            RecordingTransport::new()
                .respond_with(RawResponse::json(404, r#"{"message":"not found"}"#))
                .respond_with(RawResponse::json(200, "{oops"))
                .fail_with("dns failure")
                .respond_with(RawResponse::text(200, "plain text")),
        );
        let client = wrapped(transport);
        assert_eq!(client.mode(), ResponseMode::Wrapped);

        let not_found = client.get("/a").await;
        assert_eq!(not_found.status, 404);
        assert!(!not_found.ok);
        assert_eq!(not_found.data, Some(json!({"message": "not found"})));

        let malformed = client.get("/b").await;
        assert!(!malformed.ok);
        assert!(malformed.error.is_some());

        let offline = client.get("/c").await;
        assert_eq!(offline.status, 0);
        assert!(offline.error.unwrap().contains("dns failure"));

        let text = client.get("/d").await;
        assert!(text.ok);
        assert_eq!(text.data, Some(json!("plain text")));
        assert_eq!(text.error, None);
    }

    #[tokio::test]
    async fn invalid_per_call_header_is_reported_not_sent() {
        let transport = Arc::new(RecordingTransport::new());
        let client = flat(transport.clone());
        let err = client
            .request("/a", HttpMethod::Get, None, vec![("bad header".into(), "v".into())])
            .await
            .unwrap_err();
        assert!(err.context().is_some());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn options_drive_toasts_but_never_reach_transport() {
        let transport = Arc::new(
            RecordingTransport::new()
                .respond_with(RawResponse::json(200, "{}"))
                .respond_with(RawResponse::json(500, "{}")),
        );
        let presenter = Arc::new(NotificationPresenter::new());
        let client: RequestClient = RequestClient::builder("https://api.test")
            .transport(transport.clone())
            .presenter(presenter.clone())
            .build()
            .unwrap();

        let options = RequestOptions::new()
            .header("X-Trace", "1")
            .log(true)
            .form_id("signup")
            .success_message("Saved")
            .error_message("Could not save");
        client
            .request_with("/save", HttpMethod::Post, Some(json!({}).into()), options.clone())
            .await
            .unwrap();
        client
            .request_with("/save", HttpMethod::Post, Some(json!({}).into()), options)
            .await
            .unwrap();

        let messages: Vec<_> = presenter.active().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["Saved".to_string(), "Could not save".to_string()]);

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.headers.get("x-trace").unwrap(), "1");
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.headers.len(), 2);
    }

    fn logged(transport: Arc<RecordingTransport>) -> RequestClient<FlatMerge> {
        RequestClient::builder("https://api.test")
            .transport(transport)
            .logging(true)
            .build()
            .unwrap()
    }

    #[test]
    fn logs_one_info_line_per_completed_call_and_error_on_failure() {
        let transport = Arc::new(
            RecordingTransport::new()
                .respond_with(RawResponse::json(404, r#"{"message":"nf"}"#))
                .fail_with("refused"),
        );
        let client = logged(transport);
        let logs = LogBuffer::default();

        tracing::subscriber::with_default(logs.subscriber(), || {
            tokio_test::block_on(async {
                client.get("/a").await.unwrap();
                client.get("/b").await.unwrap_err();
            })
        });

        let lines = logs.lines();
        assert_eq!(lines.len(), 2, "{lines:#?}");

        let completed = &lines[0];
        assert!(completed.contains("INFO"));
        assert!(completed.contains("request completed"));
        assert!(completed.contains("request_id="));
        assert!(completed.contains("method=GET"));
        assert!(completed.contains(r#"endpoint="/a""#));
        assert!(completed.contains("status=404"));
        assert!(completed.contains(r#"body={"message":"nf"}"#));

        let failed = &lines[1];
        assert!(failed.contains("ERROR"));
        assert!(failed.contains("request failed"));
        assert!(failed.contains(r#"endpoint="/b""#));
        assert!(failed.contains("refused"));
    }

    #[test]
    fn wrapped_logs_http_errors_as_failures_too() {
        let transport = Arc::new(
            RecordingTransport::new().respond_with(RawResponse::json(500, r#"{"e":1}"#)),
        );
        let client = RequestClient::<Wrapped>::builder("https://api.test")
            .transport(transport)
            .logging(true)
            .build()
            .unwrap();
        let logs = LogBuffer::default();

        tracing::subscriber::with_default(logs.subscriber(), || {
            tokio_test::block_on(client.get("/boom"));
        });

        let lines = logs.lines();
        assert_eq!(lines.len(), 2, "{lines:#?}");
        assert!(lines[0].contains("request completed") && lines[0].contains("status=500"));
        assert!(lines[1].contains("ERROR"));
        assert!(lines[1].contains("HTTP 500 Internal Server Error"));
    }

    #[test]
    fn per_call_log_flag_overrides_client_setting() {
        let transport = Arc::new(RecordingTransport::new());
        let quiet: RequestClient = RequestClient::builder("https://api.test")
            .transport(transport.clone())
            .logging(false)
            .build()
            .unwrap();
        let loud = logged(transport);
        let logs = LogBuffer::default();

        tracing::subscriber::with_default(logs.subscriber(), || {
            tokio_test::block_on(async {
                quiet.get("/silent").await.unwrap();
                loud.request_with("/muted", HttpMethod::Get, None, RequestOptions::new().log(false))
                    .await
                    .unwrap();
            })
        });
        assert!(logs.lines().is_empty(), "{:#?}", logs.lines());

        tracing::subscriber::with_default(logs.subscriber(), || {
            tokio_test::block_on(quiet.request_with(
                "/opt-in",
                HttpMethod::Get,
                None,
                RequestOptions::new().log(true).form_id("signup"),
            ))
            .unwrap();
        });
        let lines = logs.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(r#"endpoint="/opt-in""#));
        assert!(lines[0].contains(r#"form_id="signup""#));
    }
}
