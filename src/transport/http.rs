use super::{RawResponse, Transport, TransportError, TransportRequest};
use crate::types::{MultipartValue, RequestBody};
use crate::Result;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Proxy;
use std::env;

/// Default transport backed by `reqwest`.
///
/// No request timeout is configured: a call that never completes never
/// resolves. Set `FORMFETCH_PROXY_URL` to route everything through a proxy.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let mut builder = reqwest::Client::builder();

        if let Ok(proxy_url) = env::var("FORMFETCH_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client })
    }

    /// Wrap an already configured `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn multipart_form(fields: Vec<crate::types::MultipartField>) -> std::result::Result<Form, TransportError> {
        let mut form = Form::new();
        for field in fields {
            form = match field.value {
                MultipartValue::Text(value) => form.text(field.name, value),
                MultipartValue::File {
                    file_name,
                    content_type,
                    data,
                } => {
                    let mut part = Part::bytes(data.to_vec()).file_name(file_name);
                    if let Some(ct) = content_type {
                        part = part.mime_str(&ct)?;
                    }
                    form.part(field.name, part)
                }
            };
        }
        Ok(form)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> std::result::Result<RawResponse, TransportError> {
        let req = self.client.request(request.method.into(), request.url.as_str());

        // Body first: `multipart` appends its own Content-Type, and `headers`
        // replaces per name, so a caller-supplied Content-Type still wins.
        let req = match request.body {
            None => req,
            Some(RequestBody::Json(value)) => req.body(value.to_string()),
            Some(RequestBody::Text(text)) => req.body(text),
            Some(RequestBody::Bytes(bytes)) => req.body(bytes),
            Some(RequestBody::Multipart(fields)) => req.multipart(Self::multipart_form(fields)?),
        }
        .headers(request.headers);

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();

        Ok(match resp.bytes().await {
            Ok(body) => RawResponse::new(status, headers, body),
            Err(e) => RawResponse::unreadable(status, headers, e.to_string()),
        })
    }
}
