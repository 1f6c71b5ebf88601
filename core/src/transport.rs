//! The seam to whatever actually moves bytes.
//!
//! The core never opens sockets. A `Transport` receives a materialized
//! `HttpRequest` and reports back a `TransportOutcome`. Connection pooling,
//! TLS, retries and caching all live behind this trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::http::{HttpRequest, TransportOutcome};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one exchange. Dropping the returned future must cancel it.
    async fn execute(&self, request: &HttpRequest) -> TransportOutcome;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: &HttpRequest) -> TransportOutcome {
        (**self).execute(request).await
    }
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use async_trait::async_trait;

    use super::Transport;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse, TransportOutcome};

    /// [`Transport`] backed by a shared `reqwest::Client`.
    ///
    /// Non-2xx statuses come back as data; only failures that prevent a
    /// response (connect, TLS, timeout, body read) become
    /// `TransportOutcome::Failed`.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    fn to_reqwest(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    #[async_trait]
    impl Transport for ReqwestTransport {
        async fn execute(&self, request: &HttpRequest) -> TransportOutcome {
            let mut builder = self
                .client
                .request(to_reqwest(request.method), request.url.clone());
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }

            let response = match builder.send().await {
                Ok(response) => response,
                Err(err) => return TransportOutcome::failed(err),
            };
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
                .collect();
            match response.bytes().await {
                Ok(body) => TransportOutcome::Http(HttpResponse {
                    status,
                    headers,
                    body,
                }),
                Err(err) => TransportOutcome::failed(err),
            }
        }
    }
}
