//! Wire-level HTTP types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests, responses and transport outcomes as
//! plain data. The core crate materializes `HttpRequest` values and classifies
//! `TransportOutcome` values; moving bytes over a socket belongs to whatever
//! `Transport` the caller plugs in.

use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;
use url::Url;

/// Shared, type-erased error used as the wrapped cause of a failure.
pub type Cause = Arc<dyn Error + Send + Sync + 'static>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Returns `true` for the methods whose payload is sent as a request body.
    ///
    /// DELETE belongs to the body family: its payload bytes are attached and
    /// query data is ignored, exactly like POST/PUT/PATCH.
    pub fn carries_body(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unsupported method name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// A fully resolved request, ready for a transport.
///
/// Headers keep their assembly order: caller headers first, then
/// `Content-Type`, then `Authorization`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Case-insensitive lookup of the last header named `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// What a transport hands back for one request.
#[derive(Debug, Clone)]
pub enum TransportOutcome {
    /// An HTTP response with a status line was received.
    Http(HttpResponse),
    /// Something came back, but it carries no HTTP semantics (no status code).
    NonHttp,
    /// The exchange failed before any response: connectivity, timeout,
    /// cancellation, TLS and so on.
    Failed(Cause),
}

impl TransportOutcome {
    pub fn failed<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        TransportOutcome::Failed(Arc::new(error))
    }
}

impl From<HttpResponse> for TransportOutcome {
    fn from(response: HttpResponse) -> Self {
        TransportOutcome::Http(response)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .rev()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
