//! Convenience facade bundling the collaborators of an API.
//!
//! # Design
//! `ApiClient` holds the parts every request to one API shares: base URL,
//! default headers, auth, content type, transport, pipeline and delivery
//! context. It hands out pre-filled `RequestBuilder`s and runs descriptors
//! through `execute`/`dispatch`. It keeps no per-request state.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::AuthType;
use crate::content_type::ContentType;
use crate::context::DeliveryContext;
use crate::error::HttpError;
use crate::execute::{dispatch, execute, RequestHandle};
use crate::http::HttpMethod;
use crate::pipeline::ResponsePipeline;
use crate::request::{RequestBuilder, RequestDescriptor};
use crate::transport::Transport;

#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    default_headers: Vec<(String, String)>,
    auth: AuthType,
    content_type: ContentType,
    transport: Arc<dyn Transport>,
    pipeline: ResponsePipeline,
    context: Arc<dyn DeliveryContext>,
}

/// Builder for [`ApiClient`]. Transport and delivery context are required.
pub struct ApiClientBuilder {
    client: ApiClient,
}

impl ApiClientBuilder {
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.client
            .default_headers
            .push((name.into(), value.into()));
        self
    }

    pub fn auth(mut self, auth: AuthType) -> Self {
        self.client.auth = auth;
        self
    }

    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.client.content_type = content_type;
        self
    }

    pub fn pipeline(mut self, pipeline: ResponsePipeline) -> Self {
        self.client.pipeline = pipeline;
        self
    }

    pub fn build(self) -> ApiClient {
        self.client
    }
}

impl ApiClient {
    pub fn builder(
        base_url: Url,
        transport: Arc<dyn Transport>,
        context: Arc<dyn DeliveryContext>,
    ) -> ApiClientBuilder {
        ApiClientBuilder {
            client: ApiClient {
                base_url,
                default_headers: Vec::new(),
                auth: AuthType::None,
                content_type: ContentType::default(),
                transport,
                pipeline: ResponsePipeline::default(),
                context,
            },
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// A builder pre-filled with this client's defaults.
    pub fn request(&self, method: HttpMethod, path: &str) -> RequestBuilder {
        RequestBuilder::new(self.base_url.clone(), method)
            .path(path)
            .headers(self.default_headers.iter().cloned())
            .auth(self.auth.clone())
            .content_type(self.content_type.clone())
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(HttpMethod::Get, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(HttpMethod::Post, path)
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.request(HttpMethod::Put, path)
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.request(HttpMethod::Patch, path)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.request(HttpMethod::Delete, path)
    }

    /// Executes `descriptor` with this client's collaborators.
    pub async fn send<T>(&self, descriptor: &RequestDescriptor) -> Result<T, HttpError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        execute(descriptor, &*self.transport, &self.pipeline, &*self.context).await
    }

    /// Spawns `descriptor` and calls `on_complete` on this client's context.
    pub fn spawn<T, F>(&self, descriptor: RequestDescriptor, on_complete: F) -> RequestHandle
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(Result<T, HttpError>) + Send + 'static,
    {
        dispatch(
            descriptor,
            self.transport.clone(),
            self.pipeline.clone(),
            self.context.clone(),
            on_complete,
        )
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}
