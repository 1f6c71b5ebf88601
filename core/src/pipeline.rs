//! Response classification and decoding.
//!
//! # Design
//! A transport outcome goes through four stages, in order, and the first one
//! to fail decides the error:
//!
//! 1. `validate_transport`: transport failure or non-HTTP outcome.
//! 2. `classify_status`: everything outside 2xx.
//! 3. `extract_body`: hands the bytes through untouched.
//! 4. `decode`: structural decoding into the caller's type.
//!
//! Status classification runs before decoding, so a 500 with an HTML body is
//! reported as a server error and never as a decoding error.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::codec::{Decoder, JsonDecoder};
use crate::error::HttpError;
use crate::http::{HttpResponse, TransportOutcome};

/// Status codes classified as authentication failures unless configured otherwise.
pub const DEFAULT_AUTH_FAILURE_CODES: [u16; 2] = [401, 403];

/// Stage 1: keep only outcomes that are real HTTP responses.
pub fn validate_transport(outcome: TransportOutcome) -> Result<HttpResponse, HttpError> {
    match outcome {
        TransportOutcome::Http(response) => Ok(response),
        TransportOutcome::NonHttp => Err(HttpError::NonHttpResponse),
        TransportOutcome::Failed(cause) => Err(HttpError::Network(cause)),
    }
}

/// Stage 2: map the status code onto the error taxonomy.
pub fn classify_status(
    response: HttpResponse,
    auth_failure_codes: &[u16],
) -> Result<HttpResponse, HttpError> {
    match response.status {
        200..=299 => Ok(response),
        code if auth_failure_codes.contains(&code) => Err(HttpError::Auth(code)),
        code @ 400..=499 => Err(HttpError::RequestFailed(code)),
        code @ 500..=599 => Err(HttpError::ServerError(code)),
        code => Err(HttpError::UnhandledResponse(code)),
    }
}

/// Stage 3: the raw body, possibly empty.
pub fn extract_body(response: HttpResponse) -> Bytes {
    response.body
}

/// Stage 4: structural decoding.
pub fn decode<T, D>(decoder: &D, body: &[u8]) -> Result<T, HttpError>
where
    T: DeserializeOwned,
    D: Decoder,
{
    decoder.decode(body).map_err(HttpError::decoding)
}

/// The configured pipeline: a decoder plus the auth-failure status codes.
#[derive(Debug, Clone)]
pub struct ResponsePipeline<D = JsonDecoder> {
    decoder: D,
    auth_failure_codes: Vec<u16>,
}

impl Default for ResponsePipeline<JsonDecoder> {
    fn default() -> Self {
        Self::new(JsonDecoder)
    }
}

impl<D: Decoder> ResponsePipeline<D> {
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            auth_failure_codes: DEFAULT_AUTH_FAILURE_CODES.to_vec(),
        }
    }

    /// Replaces the status codes reported as [`HttpError::Auth`].
    pub fn auth_failure_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.auth_failure_codes = codes.into_iter().collect();
        self
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Runs every stage over `outcome`.
    pub fn process<T: DeserializeOwned>(&self, outcome: TransportOutcome) -> Result<T, HttpError> {
        let result = validate_transport(outcome)
            .and_then(|response| classify_status(response, &self.auth_failure_codes))
            .map(extract_body)
            .and_then(|body| decode(&self.decoder, &body));

        if let Err(err) = &result {
            tracing::warn!(
                kind = err.kind(),
                status = err.status_code(),
                error = %err,
                "request failed"
            );
        }
        result
    }
}
