//! Error taxonomy for the service.
//!
//! One variant per fault class so the transport layer can map kinds to
//! status codes without inspecting message text:
//! - client fault: `InvalidOperation`, `InvalidPayload`
//! - server fault: `Initialization`, `Operation`, `Internal`
//! - admission control: `QueueFull`

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlanceError {
    /// Operation selector is not in the configured allow-list.
    #[error("invalid operation")]
    InvalidOperation,

    /// Payload failed to decode before touching the model.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The model failed to load. State stays Unloaded so a later request
    /// can retry the load.
    #[error("model initialization failed: {0}")]
    Initialization(String),

    /// The compute step failed after the model was acquired. The model
    /// stays loaded; failure does not force eviction.
    #[error("{0}")]
    Operation(String),

    /// Admission rejected: the request queue is at its configured depth.
    #[error("request queue is full")]
    QueueFull,

    /// Defensive category for failures that should never reach a caller
    /// through any other path (dropped reply channel, state out of sync).
    #[error("internal error: {0}")]
    Internal(String),
}

impl GlanceError {
    /// True when the fault is the caller's (maps to a 400-class response).
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::InvalidOperation | Self::InvalidPayload(_))
    }
}
