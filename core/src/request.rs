//! Immutable request descriptions and their lazily materialized wire form.
//!
//! # Design
//! `RequestBuilder` collects the facets of a request and `build()` freezes
//! them into a `RequestDescriptor`. Building does no work beyond moving the
//! inputs: the wire request is derived on first use and memoized, so a
//! descriptor can be built, compared and logged without side effects and
//! re-sent on retry without rebuilding anything.
//!
//! Method dispatch when materializing:
//! - GET: payload query data plus the builder's extra query items go to the
//!   URL. No body, even if the payload carries bytes.
//! - POST, PUT, PATCH, DELETE: payload bytes become the body. Query data is
//!   not applied.
//!
//! Headers are assembled as caller headers, then `Content-Type`, then
//! `Authorization`. The derived headers replace any caller header with the
//! same name (case-insensitive), so the last write wins.

use std::sync::OnceLock;

use url::Url;

use crate::auth::AuthType;
use crate::content_type::ContentType;
use crate::http::{HttpMethod, HttpRequest};
use crate::payload::Payload;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const AUTHORIZATION: &str = "Authorization";

/// Collects request facets. Finish with [`RequestBuilder::build`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: Url,
    method: HttpMethod,
    path: String,
    headers: Vec<(String, String)>,
    auth: AuthType,
    content_type: ContentType,
    payload: Payload,
    query_items: Vec<(String, String)>,
}

impl RequestBuilder {
    pub fn new(base_url: Url, method: HttpMethod) -> Self {
        Self {
            base_url,
            method,
            path: String::new(),
            headers: Vec::new(),
            auth: AuthType::None,
            content_type: ContentType::default(),
            payload: Payload::None,
            query_items: Vec::new(),
        }
    }

    /// Path appended to the base URL, one segment per `/`-separated part.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn auth(mut self, auth: AuthType) -> Self {
        self.auth = auth;
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Extra query items, applied after the payload's query data (GET only).
    pub fn query_items<I, K, V>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query_items
            .extend(items.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn build(self) -> RequestDescriptor {
        RequestDescriptor {
            base_url: self.base_url,
            method: self.method,
            path: self.path,
            headers: self.headers,
            auth: self.auth,
            content_type: self.content_type,
            payload: self.payload,
            query_items: self.query_items,
            wire: OnceLock::new(),
        }
    }
}

/// A frozen request description. Holds no network resources.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    base_url: Url,
    method: HttpMethod,
    path: String,
    headers: Vec<(String, String)>,
    auth: AuthType,
    content_type: ContentType,
    payload: Payload,
    query_items: Vec<(String, String)>,
    wire: OnceLock<HttpRequest>,
}

impl RequestDescriptor {
    pub fn builder(base_url: Url, method: HttpMethod) -> RequestBuilder {
        RequestBuilder::new(base_url, method)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn auth(&self) -> &AuthType {
        &self.auth
    }

    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn query_items(&self) -> &[(String, String)] {
        &self.query_items
    }

    /// The wire request, materialized on first call and reused afterwards.
    pub fn wire_request(&self) -> &HttpRequest {
        self.wire.get_or_init(|| self.materialize())
    }

    /// Derives a fresh wire request from the descriptor's fields.
    pub fn materialize(&self) -> HttpRequest {
        let mut url = join_path(&self.base_url, &self.path);

        let body = if self.method.carries_body() {
            if self.payload.has_query() || !self.query_items.is_empty() {
                tracing::debug!(
                    method = %self.method,
                    path = %self.path,
                    "query data ignored for body-bearing method"
                );
            }
            self.payload.body().cloned()
        } else {
            let pairs = self.payload.query_pairs();
            if !pairs.is_empty() || !self.query_items.is_empty() {
                url.query_pairs_mut()
                    .extend_pairs(pairs.iter().chain(self.query_items.iter()));
            }
            None
        };

        let mut headers = self.headers.clone();
        set_header(&mut headers, CONTENT_TYPE, self.content_type.as_str());
        if let Some(value) = self.auth.header_value() {
            set_header(&mut headers, AUTHORIZATION, &value);
        }

        tracing::debug!(method = %self.method, url = %url, "materialized wire request");
        HttpRequest {
            method: self.method,
            url,
            headers,
            body,
        }
    }
}

impl PartialEq for RequestDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url
            && self.method == other.method
            && self.path == other.path
            && self.headers == other.headers
            && self.auth == other.auth
            && self.content_type == other.content_type
            && self.payload == other.payload
            && self.query_items == other.query_items
    }
}

fn join_path(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return url;
    }
    match url.path_segments_mut() {
        Ok(mut existing) => {
            existing.pop_if_empty().extend(segments);
        }
        Err(()) => {
            tracing::warn!(base = %base, path, "base URL cannot take path segments");
        }
    }
    url
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    headers.push((name.to_string(), value.to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://api.example.com/v1").unwrap()
    }

    fn query_payload() -> Payload {
        Payload::query_items([("page", "2"), ("sort", "name")])
    }

    #[test]
    fn path_is_appended_as_segments() {
        let req = RequestBuilder::new(base(), HttpMethod::Get)
            .path("/users//42/")
            .build();
        assert_eq!(req.wire_request().url.as_str(), "https://api.example.com/v1/users/42");

        let trailing = Url::parse("https://api.example.com/v1/").unwrap();
        let req = RequestBuilder::new(trailing, HttpMethod::Get).path("users").build();
        assert_eq!(req.wire_request().url.as_str(), "https://api.example.com/v1/users");
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        let req = RequestBuilder::new(base(), HttpMethod::Get)
            .path("files/a b")
            .build();
        assert_eq!(
            req.wire_request().url.as_str(),
            "https://api.example.com/v1/files/a%20b"
        );
    }

    #[test]
    fn get_applies_query_and_drops_body() {
        let req = RequestBuilder::new(base(), HttpMethod::Get)
            .path("users")
            .payload(query_payload())
            .query_items([("q", "a&b")])
            .build();
        let wire = req.wire_request();
        assert_eq!(
            wire.url.as_str(),
            "https://api.example.com/v1/users?page=2&sort=name&q=a%26b"
        );
        assert!(wire.body.is_none());

        let req = RequestBuilder::new(base(), HttpMethod::Get)
            .payload(Payload::raw(&b"ignored"[..]))
            .build();
        assert!(req.wire_request().body.is_none());
    }

    #[test]
    fn get_stringifies_query_params() {
        let req = RequestBuilder::new(base(), HttpMethod::Get)
            .payload(Payload::query_params([("limit", json!(5)), ("all", json!(false))]))
            .build();
        assert_eq!(
            req.wire_request().url.query(),
            Some("all=false&limit=5")
        );
    }

    #[test]
    fn body_methods_never_apply_query_data() {
        for method in [
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Patch,
            HttpMethod::Delete,
        ] {
            let req = RequestBuilder::new(base(), method)
                .path("users")
                .payload(query_payload())
                .query_items([("extra", "1")])
                .build();
            let wire = req.wire_request();
            assert_eq!(wire.url.query(), None, "{method}");
            assert!(wire.body.is_none(), "{method}");

            let params = RequestBuilder::new(base(), method)
                .payload(Payload::query_params([("limit", json!(5))]))
                .build();
            assert_eq!(params.wire_request().url.query(), None, "{method}");
        }
    }

    #[test]
    fn body_methods_attach_payload_bytes() {
        for method in [
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Patch,
            HttpMethod::Delete,
        ] {
            let req = RequestBuilder::new(base(), method)
                .payload(Payload::raw(&br#"{"a":1}"#[..]))
                .build();
            assert_eq!(
                req.wire_request().body.as_deref(),
                Some(&br#"{"a":1}"#[..]),
                "{method}"
            );
        }
    }

    #[test]
    fn header_order_is_caller_then_content_type_then_auth() {
        let req = RequestBuilder::new(base(), HttpMethod::Post)
            .header("X-Trace", "1")
            .auth(AuthType::bearer("tok"))
            .build();
        assert_eq!(
            req.wire_request().headers,
            vec![
                ("X-Trace".to_string(), "1".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), "Bearer tok".to_string()),
            ]
        );
    }

    #[test]
    fn derived_headers_win_over_caller_headers() {
        let req = RequestBuilder::new(base(), HttpMethod::Post)
            .header("content-type", "text/plain")
            .header("AUTHORIZATION", "Token legacy")
            .header("Accept", "application/json")
            .content_type(ContentType::JSON)
            .auth(AuthType::basic("u", "p"))
            .build();
        let wire = req.wire_request();
        assert_eq!(wire.header("Content-Type"), Some("application/json"));
        assert_eq!(wire.header("authorization"), Some("Basic dTpw"));
        assert_eq!(wire.header("Accept"), Some("application/json"));
        assert_eq!(wire.headers.len(), 3);
    }

    #[test]
    fn no_auth_means_no_authorization_header() {
        let req = RequestBuilder::new(base(), HttpMethod::Get).build();
        assert_eq!(req.wire_request().header(AUTHORIZATION), None);
    }

    #[test]
    fn materialization_is_idempotent() {
        let build = || {
            RequestBuilder::new(base(), HttpMethod::Put)
                .path("items/1")
                .header("X-A", "1")
                .auth(AuthType::bearer("t"))
                .payload(Payload::parameters(&json!({"b": 2, "a": 1}), Default::default()))
                .build()
        };
        let first = build();
        let second = build();
        assert_eq!(first, second);
        assert_eq!(first.materialize(), second.materialize());
        assert_eq!(first.materialize(), *first.wire_request());
        assert!(std::ptr::eq(first.wire_request(), first.wire_request()));
    }

    #[test]
    fn descriptors_compare_by_fields() {
        let a = RequestBuilder::new(base(), HttpMethod::Get).path("a").build();
        let _ = a.wire_request();
        let b = RequestBuilder::new(base(), HttpMethod::Get).path("a").build();
        let c = RequestBuilder::new(base(), HttpMethod::Get).path("c").build();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[tracing_test::traced_test]
    #[test]
    fn ignored_query_data_is_flagged_for_delete() {
        let req = RequestBuilder::new(base(), HttpMethod::Delete)
            .payload(query_payload())
            .build();
        let _ = req.wire_request();
        assert!(logs_contain("query data ignored for body-bearing method"));
    }
}
