//! VisionEngine port - the expensive, stateful compute backend.
//!
//! Design intent:
//! - `load()` is the slow materialization step; the session it returns holds
//!   mutable execution state and is NOT safe to share across invocations.
//! - The manager serializes every `run` and `release` behind its lock, so a
//!   session never sees two calls at once.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ImagePayload, Operation};

/// Flat engine-side failure. The manager maps it onto the service taxonomy
/// depending on which call failed (load vs run vs release).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Factory side: identifies the model and materializes sessions.
#[async_trait]
pub trait VisionEngine: Send + Sync {
    /// Identifier of the configured model (the `GET /resource-info` payload).
    fn model_id(&self) -> &str;

    /// Materialize the model. Potentially slow; called under the manager's
    /// lock so at most one load runs at a time.
    async fn load(&self) -> Result<Box<dyn EngineSession>, EngineError>;
}

/// A loaded model instance. One invocation at a time.
#[async_trait]
pub trait EngineSession: Send {
    /// Run one opaque compute step.
    async fn run(
        &mut self,
        operation: &Operation,
        image: &ImagePayload,
    ) -> Result<String, EngineError>;

    /// Release underlying resources ahead of unload. On failure the manager
    /// keeps the session and stays Ready rather than guessing it is gone.
    async fn release(&mut self) -> Result<(), EngineError>;
}
