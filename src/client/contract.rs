//! Response contracts.
//!
//! Two result shapes exist for the same request pipeline. A client picks one
//! at the type level (`RequestClient<FlatMerge>` or `RequestClient<Wrapped>`),
//! so a single client type can never hand back both.
//!
//! - [`FlatMerge`]: `Result<FlatResponse>`. Transport and decode failures are
//!   `Err`; every decoded response, including 4xx/5xx, is `Ok` with the body
//!   fields merged next to `_status` and `_ok`.
//! - [`Wrapped`]: [`WrappedResponse`], never an error. Failures of any kind,
//!   non-2xx included, come back with `ok == false` and an `error` message.

use super::normalize::Normalized;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const STATUS_KEY: &str = "_status";
pub const OK_KEY: &str = "_ok";
/// Holds a decoded body that is not a JSON object (text, arrays, scalars).
pub const BODY_KEY: &str = "_body";

/// Runtime view of the contract a client was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    FlatMerge,
    Wrapped,
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseMode::FlatMerge => f.write_str("flat_merge"),
            ResponseMode::Wrapped => f.write_str("wrapped"),
        }
    }
}

/// Shapes the outcome of one request attempt into the caller-facing result.
pub trait ResponseContract: Send + Sync + 'static {
    type Output: Send;

    const MODE: ResponseMode;

    fn shape(outcome: Result<Normalized>) -> Self::Output;

    /// The message logged at error level for this outcome, if it counts as
    /// a failure under this contract.
    fn failure_message(outcome: &Result<Normalized>) -> Option<String>;
}

/// Throwing contract marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatMerge;

/// Never-failing contract marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wrapped;

impl ResponseContract for FlatMerge {
    type Output = Result<FlatResponse>;

    const MODE: ResponseMode = ResponseMode::FlatMerge;

    fn shape(outcome: Result<Normalized>) -> Self::Output {
        outcome.map(FlatResponse::from)
    }

    fn failure_message(outcome: &Result<Normalized>) -> Option<String> {
        outcome.as_ref().err().map(|e| e.to_string())
    }
}

impl ResponseContract for Wrapped {
    type Output = WrappedResponse;

    const MODE: ResponseMode = ResponseMode::Wrapped;

    fn shape(outcome: Result<Normalized>) -> Self::Output {
        match outcome {
            Ok(n) if n.ok => WrappedResponse {
                status: n.status,
                ok: true,
                data: Some(n.body),
                error: None,
            },
            Ok(n) => WrappedResponse {
                status: n.status,
                ok: false,
                error: Some(http_error_message(n.status)),
                data: Some(n.body),
            },
            Err(e) => WrappedResponse {
                status: e.status().unwrap_or(0),
                ok: false,
                data: None,
                error: Some(e.to_string()),
            },
        }
    }

    fn failure_message(outcome: &Result<Normalized>) -> Option<String> {
        match outcome {
            Ok(n) if n.ok => None,
            Ok(n) => Some(http_error_message(n.status)),
            Err(e) => Some(e.to_string()),
        }
    }
}

/// `"HTTP 404 Not Found"`, or `"HTTP 599"` for codes without a canonical reason.
pub fn http_error_message(status: u16) -> String {
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason());
    match reason {
        Some(reason) => format!("HTTP {status} {reason}"),
        None => format!("HTTP {status}"),
    }
}

/// Decoded body fields merged with `_status` and `_ok`.
///
/// The reserved keys always win over body fields of the same name. A body
/// that is not a JSON object is stored under `_body`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatResponse {
    fields: Map<String, Value>,
}

impl FlatResponse {
    pub fn status(&self) -> u16 {
        self.fields
            .get(STATUS_KEY)
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or(0)
    }

    pub fn ok(&self) -> bool {
        self.fields
            .get(OK_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl From<Normalized> for FlatResponse {
    fn from(n: Normalized) -> Self {
        let mut fields = match n.body {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert(BODY_KEY.to_string(), other);
                map
            }
        };
        fields.insert(STATUS_KEY.to_string(), Value::from(n.status));
        fields.insert(OK_KEY.to_string(), Value::Bool(n.ok));
        Self { fields }
    }
}

/// `{status, ok, data, error}` record returned by the wrapped contract.
///
/// `status` is `0` when no response arrived at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedResponse {
    pub status: u16,
    pub ok: bool,
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
