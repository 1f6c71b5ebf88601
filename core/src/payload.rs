//! Request payload descriptions.
//!
//! # Design
//! A `Payload` says where a request's content comes from: query data that
//! ends up in the URL, or bytes that end up in the body. Which of the two a
//! request actually honors is decided by its method when the wire request is
//! materialized (see `request`), not here.
//!
//! Serialization happens when the payload is constructed. A value that cannot
//! be serialized is a static mismatch between a type and its schema, so the
//! unchecked constructors treat it as a programmer error: the failure is
//! logged, a debug assertion trips, and release builds fall back to an empty
//! body. Callers that would rather handle it use the `try_*` constructors.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::codec::{EncodeError, Encoder};

/// Formatting options for [`Payload::parameters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonOptions {
    pub pretty: bool,
}

/// Where a request's content comes from. At most one representation is active.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    #[default]
    None,
    /// Ordered `name=value` pairs appended to the URL.
    QueryItems(Vec<(String, String)>),
    /// Untyped values appended to the URL, stringified, in key order.
    QueryParams(BTreeMap<String, Value>),
    /// Pre-serialized body bytes.
    Body(Bytes),
}

impl Payload {
    pub fn query_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Payload::QueryItems(
            items
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn query_params<I, K>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Payload::QueryParams(params.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Body bytes produced by `encoder` for `value`.
    pub fn encodable<T, E>(value: &T, encoder: &E) -> Self
    where
        T: Serialize + ?Sized,
        E: Encoder,
    {
        Self::try_encodable(value, encoder).unwrap_or_else(encoding_bug)
    }

    pub fn try_encodable<T, E>(value: &T, encoder: &E) -> Result<Self, EncodeError>
    where
        T: Serialize + ?Sized,
        E: Encoder,
    {
        Ok(Payload::Body(Bytes::from(encoder.encode(value)?)))
    }

    /// Body bytes produced by plain JSON serialization of `value`.
    pub fn parameters<T>(value: &T, options: JsonOptions) -> Self
    where
        T: Serialize + ?Sized,
    {
        Self::try_parameters(value, options).unwrap_or_else(encoding_bug)
    }

    pub fn try_parameters<T>(value: &T, options: JsonOptions) -> Result<Self, EncodeError>
    where
        T: Serialize + ?Sized,
    {
        let bytes = if options.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(Payload::Body(Bytes::from(bytes)))
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn form<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in items {
            serializer.append_pair(k.as_ref(), v.as_ref());
        }
        Payload::Body(Bytes::from(serializer.finish()))
    }

    pub fn raw(bytes: impl Into<Bytes>) -> Self {
        Payload::Body(bytes.into())
    }

    /// Query pairs this payload contributes to a URL, in order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        match self {
            Payload::QueryItems(items) => items.clone(),
            Payload::QueryParams(params) => params
                .iter()
                .map(|(k, v)| (k.clone(), stringify(v)))
                .collect(),
            Payload::None | Payload::Body(_) => Vec::new(),
        }
    }

    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Payload::Body(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn has_query(&self) -> bool {
        matches!(self, Payload::QueryItems(_) | Payload::QueryParams(_))
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn encoding_bug(err: EncodeError) -> Payload {
    tracing::error!(error = %err, "payload serialization failed, sending an empty body");
    debug_assert!(false, "payload serialization failed: {err}");
    Payload::Body(Bytes::new())
}
