//! Response normalization: pick a decoder from the declared content type and
//! pair the decoded body with the transport status.

use crate::transport::RawResponse;
use crate::{Error, Result};
use serde_json::Value;

/// How the body was decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Text,
}

/// A decoded response. Non-2xx statuses land here too, with `ok == false`.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub status: u16,
    pub ok: bool,
    pub kind: ContentKind,
    /// Structured data for JSON bodies, `Value::String` for text bodies.
    pub body: Value,
}

/// True for `application/json` and structured-syntax suffixes such as
/// `application/problem+json`. Parameters (`; charset=...`) are ignored.
pub fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Decode a raw response.
///
/// An empty body decodes to `null` for JSON and `""` for text. A JSON body
/// that fails to parse, or a body that could not be read at all, yields
/// [`Error::ResponseDecode`] carrying the recoverable raw text.
pub fn normalize(raw: &RawResponse) -> Result<Normalized> {
    let status = raw.status;
    let ok = raw.ok();
    let kind = match raw.content_type() {
        Some(ct) if is_json_media_type(ct) => ContentKind::Json,
        _ => ContentKind::Text,
    };

    let bytes = raw
        .bytes()
        .map_err(|reason| Error::decode(status, reason, raw.text_lossy()))?;

    let body = match kind {
        ContentKind::Json if bytes.is_empty() => Value::Null,
        ContentKind::Json => serde_json::from_slice(bytes)
            .map_err(|e| Error::decode(status, e.to_string(), raw.text_lossy()))?,
        ContentKind::Text => Value::String(String::from_utf8_lossy(bytes).into_owned()),
    };

    Ok(Normalized {
        status,
        ok,
        kind,
        body,
    })
}
