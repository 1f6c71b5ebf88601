//! Running a descriptor end to end.
//!
//! # Design
//! One execution is one transport call followed by the synchronous pipeline
//! stages. The only suspension point is the transport await. Nothing is
//! retried and nothing is shared between executions.
//!
//! The result is always handed to a caller-named `DeliveryContext`.
//! `execute` is a cold future: it does nothing until polled, and dropping it
//! before the transport resolves cancels the exchange and delivers nothing.
//! `dispatch` spawns the same work and invokes a callback on the context;
//! `RequestHandle::cancel` suppresses that callback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use crate::codec::Decoder;
use crate::context::DeliveryContext;
use crate::error::HttpError;
use crate::pipeline::ResponsePipeline;
use crate::request::RequestDescriptor;
use crate::transport::Transport;

/// Executes `descriptor` and resolves once `context` has run the delivery.
///
/// A context that never runs its jobs (an undrained `SerialQueue`) keeps
/// this future pending.
pub async fn execute<T, D, X, C>(
    descriptor: &RequestDescriptor,
    transport: &X,
    pipeline: &ResponsePipeline<D>,
    context: &C,
) -> Result<T, HttpError>
where
    T: DeserializeOwned + Send + 'static,
    D: Decoder,
    X: Transport + ?Sized,
    C: DeliveryContext + ?Sized,
{
    let result = run(descriptor, transport, pipeline)
        .instrument(request_span(descriptor))
        .await;

    let (tx, rx) = oneshot::channel();
    context.post(Box::new(move || {
        let _ = tx.send(result);
    }));
    rx.await
        .unwrap_or_else(|_| Err(HttpError::custom("delivery context dropped the result")))
}

/// Spawns an execution on the current tokio runtime and calls `on_complete`
/// with the result on `context`.
///
/// # Panics
///
/// Panics when called outside a tokio runtime.
pub fn dispatch<T, D, X, C, F>(
    descriptor: RequestDescriptor,
    transport: Arc<X>,
    pipeline: ResponsePipeline<D>,
    context: C,
    on_complete: F,
) -> RequestHandle
where
    T: DeserializeOwned + Send + 'static,
    D: Decoder + Send + Sync + 'static,
    X: Transport + ?Sized + 'static,
    C: DeliveryContext + 'static,
    F: FnOnce(Result<T, HttpError>) + Send + 'static,
{
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();
    let span = request_span(&descriptor);

    let task = tokio::spawn(
        async move {
            let result = run(&descriptor, &*transport, &pipeline).await;
            context.post(Box::new(move || {
                if flag.load(Ordering::Acquire) {
                    tracing::debug!("request cancelled, result discarded");
                    return;
                }
                on_complete(result);
            }));
        }
        .instrument(span),
    );

    RequestHandle { task, cancelled }
}

/// Handle to a dispatched execution. Dropping it does not cancel.
#[derive(Debug)]
pub struct RequestHandle {
    task: JoinHandle<()>,
    cancelled: Arc<AtomicBool>,
}

impl RequestHandle {
    /// Aborts the pending transport call and suppresses delivery.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// `true` once the execution has posted its result or was aborted.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

async fn run<T, D, X>(
    descriptor: &RequestDescriptor,
    transport: &X,
    pipeline: &ResponsePipeline<D>,
) -> Result<T, HttpError>
where
    T: DeserializeOwned,
    D: Decoder,
    X: Transport + ?Sized,
{
    if descriptor.auth().is_missing_token() {
        tracing::warn!(kind = "missing_token", "bearer token missing, request not sent");
        return Err(HttpError::MissingToken);
    }
    let request = descriptor.wire_request();
    tracing::debug!(url = %request.url, "sending request");
    let outcome = transport.execute(request).await;
    pipeline.process(outcome)
}

fn request_span(descriptor: &RequestDescriptor) -> tracing::Span {
    tracing::debug_span!(
        "http_request",
        request_id = %Uuid::new_v4(),
        method = %descriptor.method(),
        path = descriptor.path(),
    )
}
