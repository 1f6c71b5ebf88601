//! Structured encoders and decoders for request and response bodies.
//!
//! Timestamps travel as RFC 3339 text (`2024-05-01T12:30:00Z`). That is the
//! representation `chrono`'s serde support reads and writes, so a response
//! type with `DateTime<Utc>` fields decodes through `JsonDecoder` without
//! extra configuration.

use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
#[error("encoding failed: {0}")]
pub struct EncodeError(#[from] pub serde_json::Error);

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct DecodeError(#[from] pub serde_json::Error);

/// Turns a typed value into request body bytes.
pub trait Encoder {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, EncodeError>;
}

/// Turns response body bytes into a typed value.
pub trait Decoder {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DecodeError>;
}

/// Compact JSON encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl Encoder for JsonEncoder {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, EncodeError> {
        Ok(serde_json::to_vec(value)?)
    }
}

/// JSON decoder with RFC 3339 timestamps.
///
/// An empty (or all-whitespace) body decodes as JSON `null`, so `()` and
/// `Option<T>` targets accept `204 No Content`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_slice(b"null")?);
        }
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Event {
        name: String,
        at: DateTime<Utc>,
    }

    #[test]
    fn decodes_rfc3339_timestamps() {
        let body = br#"{"name":"launch","at":"2024-05-01T12:30:00Z"}"#;
        let event: Event = JsonDecoder.decode(body).unwrap();
        assert_eq!(event.at, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn encodes_timestamps_as_rfc3339() {
        let event = Event {
            name: "launch".to_string(),
            at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        };
        let bytes = JsonEncoder.encode(&event).unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            r#"{"name":"launch","at":"2024-05-01T12:30:00Z"}"#
        );
    }

    #[test]
    fn empty_body_decodes_as_null() {
        JsonDecoder.decode::<()>(b"").unwrap();
        let missing: Option<Event> = JsonDecoder.decode(b"  \n").unwrap();
        assert!(missing.is_none());
        assert!(JsonDecoder.decode::<Event>(b"").is_err());
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let result: Result<Event, _> = JsonDecoder.decode(br#"{"name":42}"#);
        assert!(result.is_err());
    }
}
