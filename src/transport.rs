//! Transport decoding for provider audio payloads
//!
//! TTS providers hand back raw PCM as a base64 string so it survives JSON
//! transport. This module turns that text-safe blob back into bytes.

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;
use tracing::debug;

/// Errors produced while decoding a transport-encoded payload
#[derive(Error, Debug, Clone)]
pub enum DecodeError {
    #[error("Invalid base64 payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
}

/// Decode a standard base64 blob into raw bytes.
///
/// Surrounding ASCII whitespace is stripped first; blobs read from files
/// usually carry a trailing newline. Fails on characters outside the
/// standard alphabet and on invalid padding.
pub fn decode_blob(blob: &str) -> Result<Vec<u8>, DecodeError> {
    let bytes = general_purpose::STANDARD.decode(blob.trim())?;
    debug!(
        "Decoded transport blob: {} chars -> {} bytes",
        blob.len(),
        bytes.len()
    );
    Ok(bytes)
}
