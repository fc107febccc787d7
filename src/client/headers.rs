//! Header merge and body preparation for one call.

use crate::types::{HttpMethod, RequestBody};
use crate::error::HeaderLayer;
use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Validated header pairs kept by a client across calls.
pub(crate) type HeaderPairs = Vec<(HeaderName, HeaderValue)>;

pub(crate) fn parse_header(
    name: &str,
    value: &str,
    layer: HeaderLayer,
) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::invalid_header("invalid header name", name, layer, e))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|e| Error::invalid_header("invalid header value", name, layer, e))?;
    Ok((header_name, header_value))
}

pub(crate) fn parse_headers(pairs: &[(String, String)], layer: HeaderLayer) -> Result<HeaderPairs> {
    pairs.iter().map(|(k, v)| parse_header(k, v, layer)).collect()
}

/// Merge headers for one call. Later layers replace earlier ones by name:
///
/// 1. built-in `Content-Type: application/json` (skipped for multipart bodies)
/// 2. instance defaults
/// 3. `Authorization: Bearer <token>` when a token is set
/// 4. per-call headers
pub(crate) fn merge_headers(
    builtin_content_type: bool,
    defaults: &[(HeaderName, HeaderValue)],
    token: Option<&str>,
    per_call: &[(String, String)],
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if builtin_content_type {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    }
    for (name, value) in defaults {
        headers.insert(name.clone(), value.clone());
    }
    if let Some(token) = token {
        let (_, value) = parse_header(
            AUTHORIZATION.as_str(),
            &format!("Bearer {token}"),
            HeaderLayer::Token,
        )?;
        headers.insert(AUTHORIZATION, value);
    }
    for (name, value) in parse_headers(per_call, HeaderLayer::PerCall)? {
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Decide what body, if any, reaches the transport.
///
/// `GET`/`HEAD` drop the body. A `Json` body is serialized to JSON text only
/// when the effective Content-Type is exactly `application/json`; everything
/// else passes through unmodified.
pub(crate) fn prepare_body(
    method: HttpMethod,
    body: Option<RequestBody>,
    headers: &HeaderMap,
) -> Result<Option<RequestBody>> {
    let body = match body {
        Some(body) if method.allows_body() => body,
        _ => return Ok(None),
    };

    let json_declared = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.trim().eq_ignore_ascii_case(JSON_CONTENT_TYPE))
        .unwrap_or(false);

    match body {
        RequestBody::Json(value) if json_declared => {
            Ok(Some(RequestBody::Text(serde_json::to_string(&value)?)))
        }
        other => Ok(Some(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MultipartField;
    use serde_json::json;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn builtin_content_type_is_json() {
        let h = merge_headers(true, &[], None, &[]).unwrap();
        assert_eq!(h.get(CONTENT_TYPE).unwrap(), JSON_CONTENT_TYPE);
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn later_layers_win() {
        let defaults = parse_headers(&pairs(&[
            ("Content-Type", "text/plain"),
            ("X-App", "demo"),
        ]), HeaderLayer::Default)
        .unwrap();
        let h = merge_headers(
            true,
            &defaults,
            Some("t0k"),
            &pairs(&[("content-type", "application/xml"), ("authorization", "Basic abc")]),
        )
        .unwrap();
        assert_eq!(h.get(CONTENT_TYPE).unwrap(), "application/xml");
        assert_eq!(h.get("x-app").unwrap(), "demo");
        assert_eq!(h.get(AUTHORIZATION).unwrap(), "Basic abc");
        assert_eq!(h.get_all(CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn token_becomes_single_bearer_header() {
        let h = merge_headers(true, &[], Some("abc"), &[]).unwrap();
        let values: Vec<_> = h.get_all(AUTHORIZATION).iter().collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0], "Bearer abc");
    }

    #[test]
    fn multipart_skips_builtin_content_type() {
        let h = merge_headers(false, &[], None, &[]).unwrap();
        assert!(h.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn invalid_header_name_is_a_configuration_error() {
        let err = merge_headers(true, &[], None, &pairs(&[("bad name", "x")])).unwrap_err();
        let ctx = err.context().unwrap();
        assert_eq!(ctx.name, "bad name");
        assert_eq!(ctx.layer, HeaderLayer::PerCall);
    }

    #[test]
    fn get_and_head_drop_body() {
        let h = merge_headers(true, &[], None, &[]).unwrap();
        for m in [HttpMethod::Get, HttpMethod::Head] {
            let out = prepare_body(m, Some(json!({"a": 1}).into()), &h).unwrap();
            assert!(out.is_none(), "{m} must not carry a body");
        }
    }

    #[test]
    fn json_body_serialized_when_content_type_is_json() {
        let h = merge_headers(true, &[], None, &[]).unwrap();
        let value = json!({"name": "x", "n": [1, 2]});
        let out = prepare_body(HttpMethod::Post, Some(value.clone().into()), &h).unwrap();
        assert_eq!(
            out,
            Some(RequestBody::Text(serde_json::to_string(&value).unwrap()))
        );
    }

    #[test]
    fn json_body_passes_through_for_other_content_types() {
        let h = merge_headers(true, &[], None, &pairs(&[("Content-Type", "text/plain")])).unwrap();
        let out = prepare_body(HttpMethod::Put, Some(json!({"a": 1}).into()), &h).unwrap();
        assert_eq!(out, Some(RequestBody::Json(json!({"a": 1}))));
    }

    #[test]
    fn opaque_bodies_pass_through() {
        let h = merge_headers(false, &[], None, &[]).unwrap();
        let fields = vec![MultipartField::text("a", "1")];
        let out = prepare_body(HttpMethod::Post, Some(fields.clone().into()), &h).unwrap();
        assert_eq!(out, Some(RequestBody::Multipart(fields)));

        let h = merge_headers(true, &[], None, &[]).unwrap();
        let out = prepare_body(HttpMethod::Patch, Some("raw".into()), &h).unwrap();
        assert_eq!(out, Some(RequestBody::Text("raw".into())));
    }
}
