//! Classified failures surfaced by the response pipeline.
//!
//! # Design
//! Every way an execution can fail ends up as exactly one `HttpError`
//! variant, so callers never see a raw transport or serde error. Status-based
//! variants carry only the code; transport and decoding variants wrap the
//! underlying cause, reachable through `source()`.
//!
//! Two errors are equal when their descriptions are equal. The wrapped cause
//! does not take part in the comparison.

use std::error::Error;
use std::sync::Arc;

use crate::http::Cause;

#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    /// The transport produced something without a status code.
    #[error("response is not an HTTP response")]
    NonHttpResponse,

    /// A bearer token was required but none was available.
    #[error("missing authentication token")]
    MissingToken,

    /// 4xx other than the auth-failure codes.
    #[error("request failed with status code {0}")]
    RequestFailed(u16),

    /// 5xx.
    #[error("server error with status code {0}")]
    ServerError(u16),

    /// The exchange failed before any HTTP response was obtained.
    #[error("network error: {0}")]
    Network(#[source] Cause),

    /// 401/403, or any other configured auth-failure code.
    #[error("authentication failed with status code {0}")]
    Auth(u16),

    /// The body did not match the requested shape.
    #[error("decoding error: {0}")]
    Decoding(#[source] Cause),

    /// A status code outside every known range (1xx, 3xx, 600+).
    #[error("unhandled response with status code {0}")]
    UnhandledResponse(u16),

    /// Escape hatch for failures specific to a collaborator.
    #[error("{label}")]
    Custom {
        label: String,
        #[source]
        cause: Option<Cause>,
    },
}

impl HttpError {
    pub fn network<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        HttpError::Network(Arc::new(error))
    }

    pub fn decoding<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        HttpError::Decoding(Arc::new(error))
    }

    pub fn custom(label: impl Into<String>) -> Self {
        HttpError::Custom {
            label: label.into(),
            cause: None,
        }
    }

    pub fn custom_with_cause<E>(label: impl Into<String>, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        HttpError::Custom {
            label: label.into(),
            cause: Some(Arc::new(cause)),
        }
    }

    /// Status code for the status-classified variants.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            HttpError::RequestFailed(code)
            | HttpError::ServerError(code)
            | HttpError::Auth(code)
            | HttpError::UnhandledResponse(code) => Some(*code),
            _ => None,
        }
    }

    /// The wrapped underlying error, if this kind carries one.
    pub fn cause(&self) -> Option<&Cause> {
        match self {
            HttpError::Network(cause) | HttpError::Decoding(cause) => Some(cause),
            HttpError::Custom { cause, .. } => cause.as_ref(),
            _ => None,
        }
    }

    /// Short kind name, used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            HttpError::NonHttpResponse => "non_http_response",
            HttpError::MissingToken => "missing_token",
            HttpError::RequestFailed(_) => "request_failed",
            HttpError::ServerError(_) => "server_error",
            HttpError::Network(_) => "network_error",
            HttpError::Auth(_) => "auth_error",
            HttpError::Decoding(_) => "decoding_error",
            HttpError::UnhandledResponse(_) => "unhandled_response",
            HttpError::Custom { .. } => "custom",
        }
    }
}

impl PartialEq for HttpError {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for HttpError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection reset")]
    struct Reset;

    #[derive(Debug, thiserror::Error)]
    #[error("connection reset")]
    struct OtherReset;

    #[test]
    fn descriptions() {
        assert_eq!(
            HttpError::RequestFailed(404).to_string(),
            "request failed with status code 404"
        );
        assert_eq!(HttpError::Auth(401).to_string(), "authentication failed with status code 401");
        assert_eq!(HttpError::network(Reset).to_string(), "network error: connection reset");
        assert_eq!(HttpError::custom("quota exhausted").to_string(), "quota exhausted");
    }

    #[test]
    fn equality_ignores_cause_identity() {
        assert_eq!(HttpError::network(Reset), HttpError::network(OtherReset));
        assert_eq!(HttpError::ServerError(503), HttpError::ServerError(503));
        assert_ne!(HttpError::ServerError(503), HttpError::ServerError(500));
        assert_ne!(HttpError::Auth(401), HttpError::RequestFailed(401));
    }

    #[test]
    fn source_exposes_wrapped_cause() {
        let err = HttpError::network(Reset);
        assert_eq!(err.source().unwrap().to_string(), "connection reset");
        assert!(err.cause().is_some());

        assert!(HttpError::custom("x").source().is_none());
        assert!(HttpError::custom_with_cause("x", Reset).source().is_some());
        assert!(HttpError::ServerError(500).source().is_none());
    }

    #[test]
    fn status_code_accessor() {
        assert_eq!(HttpError::UnhandledResponse(999).status_code(), Some(999));
        assert_eq!(HttpError::MissingToken.status_code(), None);
        assert_eq!(HttpError::decoding(Reset).status_code(), None);
    }
}
