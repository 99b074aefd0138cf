//! RequestEnvelope - 1リクエスト分の運搬用データ
//!
//! Design intent:
//! - validated operation + decoded payload + completion handle をまとめて運ぶ
//! - handle は move でしか resolve できないので「exactly once」が型で保証される

use tokio::sync::oneshot;
use tracing::debug;

use super::{ImagePayload, Operation};
use crate::error::GlanceError;

/// Receiver half the caller awaits after enqueue.
pub type CompletionReceiver = oneshot::Receiver<Result<String, GlanceError>>;

/// Single-assignment handle through which a queued request's result or
/// failure is delivered.
///
/// `resolve` consumes the handle, so a request can be completed at most
/// once. A send to a dropped receiver is not an error for the worker; it
/// just means the caller went away.
#[derive(Debug)]
pub struct CompletionHandle(oneshot::Sender<Result<String, GlanceError>>);

impl CompletionHandle {
    pub fn channel() -> (Self, CompletionReceiver) {
        let (tx, rx) = oneshot::channel();
        (Self(tx), rx)
    }

    /// Cancellation check: true when the caller dropped its receiver.
    /// The worker checks this before starting an invocation; there is no
    /// mid-invocation abort.
    pub fn is_abandoned(&self) -> bool {
        self.0.is_closed()
    }

    pub fn resolve(self, result: Result<String, GlanceError>) {
        if self.0.send(result).is_err() {
            debug!("caller gone before the result was delivered");
        }
    }
}

/// A pending request: what to run, on what, and where to report.
#[derive(Debug)]
pub struct RequestEnvelope {
    operation: Operation,
    image: ImagePayload,
    reply: CompletionHandle,
}

impl RequestEnvelope {
    pub fn new(operation: Operation, image: ImagePayload, reply: CompletionHandle) -> Self {
        Self {
            operation,
            image,
            reply,
        }
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn image(&self) -> &ImagePayload {
        &self.image
    }

    pub fn into_parts(self) -> (Operation, ImagePayload, CompletionHandle) {
        (self.operation, self.image, self.reply)
    }
}
