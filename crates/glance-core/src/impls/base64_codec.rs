//! Base64 payload codec.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::domain::ImagePayload;
use crate::ports::{DecodeError, PayloadCodec};

/// Standard-alphabet base64 decode, rejecting empty results.
///
/// Image interpretation beyond "decodable, non-empty bytes" belongs to the
/// engine; this boundary only needs a success/failure contract.
#[derive(Debug, Default)]
pub struct Base64Codec;

impl PayloadCodec for Base64Codec {
    fn decode(&self, raw: &str) -> Result<ImagePayload, DecodeError> {
        let bytes = STANDARD
            .decode(raw.trim())
            .map_err(|e| DecodeError::new(format!("invalid base64 data: {e}")))?;
        if bytes.is_empty() {
            return Err(DecodeError::new("empty image data"));
        }
        Ok(ImagePayload::new(bytes))
    }
}
