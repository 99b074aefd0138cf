//! RequestQueue - FIFO admission channel.
//!
//! Design intent:
//! - many producers (transport handlers), exactly one consumer (the worker)
//! - insertion order = arrival order; the mpsc channel preserves it
//! - bounded: admission past the configured depth is rejected instead of
//!   buffering unbounded latency behind a single expensive resource

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::RequestEnvelope;
use crate::error::GlanceError;

#[derive(Clone)]
pub struct RequestQueue {
    tx: mpsc::Sender<RequestEnvelope>,
}

impl RequestQueue {
    /// Create the queue and hand back the consumer half for the worker.
    pub fn new(depth: usize) -> (Self, mpsc::Receiver<RequestEnvelope>) {
        let (tx, rx) = mpsc::channel(depth);
        (Self { tx }, rx)
    }

    /// Append to the tail. Returns immediately: full queue and closed queue
    /// are both reported to the caller, never blocked on.
    pub fn enqueue(&self, envelope: RequestEnvelope) -> Result<(), GlanceError> {
        self.tx.try_send(envelope).map_err(|e| match e {
            TrySendError::Full(_) => GlanceError::QueueFull,
            TrySendError::Closed(_) => {
                GlanceError::Internal("request queue is closed".to_string())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompletionHandle, ImagePayload, Operation};

    fn envelope(op: &str) -> (RequestEnvelope, crate::domain::CompletionReceiver) {
        let (reply, rx) = CompletionHandle::channel();
        (
            RequestEnvelope::new(Operation::new(op), ImagePayload::new(vec![0]), reply),
            rx,
        )
    }

    #[tokio::test]
    async fn preserves_fifo_order() {
        let (queue, mut rx) = RequestQueue::new(8);
        let mut receivers = Vec::new();
        for op in ["a", "b", "c"] {
            let (env, reply_rx) = envelope(op);
            queue.enqueue(env).unwrap();
            receivers.push(reply_rx);
        }

        for expected in ["a", "b", "c"] {
            let env = rx.recv().await.unwrap();
            assert_eq!(env.operation().as_str(), expected);
        }
    }

    #[tokio::test]
    async fn rejects_admission_past_depth() {
        let (queue, _rx) = RequestQueue::new(2);
        let (e1, _r1) = envelope("a");
        let (e2, _r2) = envelope("b");
        let (e3, _r3) = envelope("c");

        queue.enqueue(e1).unwrap();
        queue.enqueue(e2).unwrap();
        let err = queue.enqueue(e3).unwrap_err();
        assert!(matches!(err, GlanceError::QueueFull));
    }

    #[tokio::test]
    async fn reports_closed_consumer() {
        let (queue, rx) = RequestQueue::new(2);
        drop(rx);
        let (env, _reply) = envelope("a");
        assert!(matches!(
            queue.enqueue(env).unwrap_err(),
            GlanceError::Internal(_)
        ));
    }
}
