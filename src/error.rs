use crate::transport::TransportError;
use std::fmt;
use thiserror::Error;

/// Merge layer a rejected header belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLayer {
    /// Instance-level defaults given to the builder.
    Default,
    /// The `Authorization: Bearer` header built from the token.
    Token,
    /// Headers passed to a single call.
    PerCall,
}

impl fmt::Display for HeaderLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HeaderLayer::Default => "default headers",
            HeaderLayer::Token => "bearer token",
            HeaderLayer::PerCall => "per-call headers",
        })
    }
}

/// Which header was rejected, where it came from, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderContext {
    /// Header name exactly as the caller wrote it.
    pub name: String,
    pub layer: HeaderLayer,
    /// Parser message from `http`.
    pub reason: String,
}

/// Unified error type for formfetch.
///
/// HTTP statuses outside 2xx are not errors: they come back as ordinary
/// normalized responses. Only the transport itself, the body decoder, and
/// construction-time lookups fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    /// The body could not be decoded for its declared content type.
    /// `raw` holds whatever text could be recovered from the payload.
    #[error("Response decode error (HTTP {status}): {message}")]
    ResponseDecode {
        status: u16,
        message: String,
        raw: String,
    },

    #[error("Element not found: no form with id '{id}'")]
    ElementNotFound { id: String },

    /// A header could not be turned into a valid HTTP header. Nothing is sent.
    #[error(
        "Configuration error: {message} '{}' in {}: {}",
        .context.name,
        .context.layer,
        .context.reason
    )]
    Configuration {
        message: String,
        context: HeaderContext,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_header(
        message: impl Into<String>,
        name: &str,
        layer: HeaderLayer,
        reason: impl ToString,
    ) -> Self {
        Error::Configuration {
            message: message.into(),
            context: HeaderContext {
                name: name.to_string(),
                layer,
                reason: reason.to_string(),
            },
        }
    }

    pub fn decode(status: u16, message: impl Into<String>, raw: impl Into<String>) -> Self {
        Error::ResponseDecode {
            status,
            message: message.into(),
            raw: raw.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Error::ResponseDecode { .. })
    }

    /// Raw response text recovered while decoding failed.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Error::ResponseDecode { raw, .. } => Some(raw.as_str()),
            _ => None,
        }
    }

    /// HTTP status of the response, when one was received before failing.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::ResponseDecode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The rejected header, for configuration errors.
    pub fn context(&self) -> Option<&HeaderContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_header_names_the_layer() {
        let err = Error::invalid_header(
            "invalid header name",
            "bad name",
            HeaderLayer::PerCall,
            "invalid HTTP header name",
        );
        assert_eq!(
            err.to_string(),
            "Configuration error: invalid header name 'bad name' in per-call headers: invalid HTTP header name"
        );
        assert_eq!(err.context().map(|c| c.layer), Some(HeaderLayer::PerCall));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn decode_error_keeps_raw_text() {
        let err = Error::decode(502, "expected value at line 1 column 1", "<html>oops</html>");
        assert!(err.is_decode());
        assert_eq!(err.status(), Some(502));
        assert!(!err.is_transport());
        assert_eq!(err.raw_body(), Some("<html>oops</html>"));
    }

    #[test]
    fn transport_error_converts() {
        let err: Error = TransportError::Other("connection refused".into()).into();
        assert!(err.is_transport());
        assert_eq!(
            err.to_string(),
            "Network transport error: Transport error: connection refused"
        );
    }
}
