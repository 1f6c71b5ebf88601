//! Declarative HTTP request building and response decoding.
//!
//! # Overview
//! Callers describe a request as an immutable `RequestDescriptor`, plug in
//! a `Transport` that performs the actual I/O, and get back either a typed
//! value or a classified `HttpError` on a `DeliveryContext` of their choice.
//! The core never touches the network itself (host-does-IO pattern), which
//! keeps request building and response classification deterministic and
//! testable without sockets.
//!
//! # Design
//! - Value types (`ContentType`, `AuthType`, `Payload`) are inert descriptions.
//! - `RequestDescriptor` materializes its wire request lazily and memoizes it.
//! - `ResponsePipeline` classifies transport outcomes in fixed, short-circuiting
//!   stages: transport, status, body, decode.
//! - `execute`/`dispatch` perform exactly one transport call per execution and
//!   hand the result to an explicitly named delivery context.
//!
//! ```no_run
//! # async fn demo() -> Result<(), wirekit_core::HttpError> {
//! use std::sync::Arc;
//! use wirekit_core::{execute, AuthType, HttpMethod, Immediate, Payload, RequestBuilder,
//!     ReqwestTransport, ResponsePipeline};
//!
//! #[derive(serde::Deserialize)]
//! struct User { id: u64, name: String }
//!
//! let descriptor = RequestBuilder::new("https://api.example.com".parse().unwrap(), HttpMethod::Get)
//!     .path("users")
//!     .auth(AuthType::bearer("token"))
//!     .payload(Payload::query_items([("page", "1")]))
//!     .build();
//! let transport = Arc::new(ReqwestTransport::default());
//! let users: Vec<User> =
//!     execute(&descriptor, &*transport, &ResponsePipeline::default(), &Immediate).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod codec;
pub mod content_type;
pub mod context;
pub mod error;
pub mod execute;
pub mod http;
pub mod payload;
pub mod pipeline;
pub mod request;
pub mod transport;

pub use auth::AuthType;
pub use client::{ApiClient, ApiClientBuilder};
pub use codec::{DecodeError, Decoder, EncodeError, Encoder, JsonDecoder, JsonEncoder};
pub use content_type::ContentType;
pub use context::{DeliveryContext, Immediate, Job, QueueDrain, SerialQueue, TokioContext};
pub use error::HttpError;
pub use execute::{dispatch, execute, RequestHandle};
pub use http::{Cause, HttpMethod, HttpRequest, HttpResponse, TransportOutcome};
pub use payload::{JsonOptions, Payload};
pub use pipeline::ResponsePipeline;
pub use request::{RequestBuilder, RequestDescriptor};
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use transport::Transport;
