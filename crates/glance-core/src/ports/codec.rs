//! PayloadCodec port - encoded wire payload → usable input.
//!
//! Decode runs before the request is enqueued, so cheap validation failures
//! never contend with the serialized processing path.

use thiserror::Error;

use crate::domain::ImagePayload;

/// Decode failure. Always a client fault; the detail ends up in the
/// `invalid payload: <detail>` message.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DecodeError(pub String);

impl DecodeError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

pub trait PayloadCodec: Send + Sync {
    fn decode(&self, raw: &str) -> Result<ImagePayload, DecodeError>;
}
