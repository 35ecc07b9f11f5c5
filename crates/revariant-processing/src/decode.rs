//! Source image decoding.
//!
//! Payloads arrive base64-encoded. Decoding runs on the blocking pool and
//! is bounded by an explicit deadline; the upstream implementation awaited
//! a load event with no timeout, which hung the whole batch when the event
//! never fired.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use image::{DynamicImage, GenericImageView};

use revariant_core::{PipelineError, PipelineResult};

/// Decode a base64 payload into the original encoded image bytes.
///
/// The orchestrator keeps these around: the full-size primary attachment
/// reuses them verbatim instead of re-encoding.
pub fn payload_bytes(payload: &str) -> PipelineResult<Bytes> {
    STANDARD
        .decode(payload.trim())
        .map(Bytes::from)
        .map_err(|e| PipelineError::DecodeFailed(format!("invalid base64: {e}")))
}

/// Decode encoded image bytes into a pixel-addressable surface.
///
/// Fails with [`PipelineError::DecodeTimeout`] if decoding does not finish
/// within `deadline`, and [`PipelineError::DecodeFailed`] for an
/// undecodable image.
pub async fn decode_image(bytes: Bytes, deadline: Duration) -> PipelineResult<DynamicImage> {
    let decode = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes));

    match tokio::time::timeout(deadline, decode).await {
        Err(_) => Err(PipelineError::DecodeTimeout {
            seconds: deadline.as_secs(),
        }),
        Ok(Err(join_err)) => Err(PipelineError::DecodeFailed(join_err.to_string())),
        Ok(Ok(Err(img_err))) => Err(PipelineError::DecodeFailed(img_err.to_string())),
        Ok(Ok(Ok(img))) => {
            let (width, height) = img.dimensions();
            tracing::debug!(width, height, "decoded source image");
            Ok(img)
        }
    }
}

/// Decode a base64 image payload straight to a surface.
pub async fn decode_source(payload: &str, deadline: Duration) -> PipelineResult<DynamicImage> {
    decode_image(payload_bytes(payload)?, deadline).await
}
