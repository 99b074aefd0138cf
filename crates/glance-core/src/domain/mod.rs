//! Domain model (operations, payloads, request envelopes).

pub mod envelope;
pub mod operation;
pub mod payload;

pub use envelope::{CompletionHandle, CompletionReceiver, RequestEnvelope};
pub use operation::{Operation, OperationSet};
pub use payload::ImagePayload;
