//! Execution contexts that final results are delivered on.
//!
//! # Design
//! Callers always name the context explicitly. `Immediate` runs the delivery
//! inline on whatever task finished the pipeline, `TokioContext` hops onto a
//! runtime, and `SerialQueue` hands jobs to a single owner (a UI thread, a
//! game loop) that drains them with `QueueDrain`.

use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// A unit of work posted to a context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

pub trait DeliveryContext: Send + Sync {
    /// Schedules `job` to run on this context.
    fn post(&self, job: Job);
}

impl<C: DeliveryContext + ?Sized> DeliveryContext for std::sync::Arc<C> {
    fn post(&self, job: Job) {
        (**self).post(job)
    }
}

/// Runs jobs on the calling thread, right away.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl DeliveryContext for Immediate {
    fn post(&self, job: Job) {
        job()
    }
}

/// Runs jobs as tasks on a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioContext {
    handle: Handle,
}

impl TokioContext {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Context for the runtime the caller is running on.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl DeliveryContext for TokioContext {
    fn post(&self, job: Job) {
        self.handle.spawn(async move { job() });
    }
}

/// Posting side of a serial queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SerialQueue {
    sender: mpsc::UnboundedSender<Job>,
}

/// Owning side of a serial queue; whoever holds it runs the jobs, in order.
#[derive(Debug)]
pub struct QueueDrain {
    receiver: mpsc::UnboundedReceiver<Job>,
}

impl SerialQueue {
    pub fn channel() -> (SerialQueue, QueueDrain) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (SerialQueue { sender }, QueueDrain { receiver })
    }
}

impl DeliveryContext for SerialQueue {
    fn post(&self, job: Job) {
        if self.sender.send(job).is_err() {
            tracing::warn!("delivery queue closed, dropping result");
        }
    }
}

impl QueueDrain {
    /// Runs every job queued so far without waiting. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Waits for the next job and runs it. `false` once every sender is gone.
    pub async fn run_next(&mut self) -> bool {
        match self.receiver.recv().await {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn immediate_runs_inline() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        Immediate.post(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn serial_queue_runs_in_order_on_drain() {
        let (queue, mut drain) = SerialQueue::channel();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let seen = seen.clone();
            queue.post(Box::new(move || seen.lock().unwrap().push(i)));
        }
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(drain.run_pending(), 3);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(drain.run_pending(), 0);
    }

    #[tokio::test]
    async fn run_next_ends_when_queue_is_dropped() {
        let (queue, mut drain) = SerialQueue::channel();
        queue.post(Box::new(|| {}));
        drop(queue);
        assert!(drain.run_next().await);
        assert!(!drain.run_next().await);
    }

    #[tokio::test]
    async fn tokio_context_spawns_job() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        TokioContext::current().post(Box::new(move || {
            let _ = tx.send(std::thread::current().id());
        }));
        assert!(rx.await.is_ok());
    }
}
